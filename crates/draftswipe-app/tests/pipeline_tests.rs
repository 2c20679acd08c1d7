// Integration tests for the draft-prep pipeline.
//
// These drive the public API end to end from the fixture roster: loading,
// valuation, tiers, the round plan, analytics and the preference store.

use std::collections::HashSet;
use std::path::PathBuf;

use draftswipe_app::load_valued_roster;
use draftswipe_app::report::build_report;
use draftswipe_core::config::{Config, ScoringFormat};
use draftswipe_core::store::{PreferenceStore, PREFS_STORAGE_KEY};
use draftswipe_core::{Position, PreferenceMap, Rating, ALL_POSITIONS};
use draftswipe_football::analytics::analyze_preferences;
use draftswipe_football::draft_flow::generate_round_targets;
use draftswipe_football::tiers::build_tiers;
use draftswipe_football::player::by_vorp_desc;
use draftswipe_football::{revaluate, PlayerRecord};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn roster(config: &Config) -> Vec<PlayerRecord> {
    load_valued_roster(&fixture("roster.csv"), config).expect("fixture roster should load")
}

fn at(players: &[PlayerRecord], pos: Position) -> Vec<&PlayerRecord> {
    players.iter().filter(|p| p.position == pos).collect()
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("draftswipe-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

// ===========================================================================
// Loading and valuation
// ===========================================================================

#[test]
fn fixture_loads_and_skips_malformed_row() {
    let players = roster(&Config::default());
    assert_eq!(players.len(), 124);
    assert!(players.iter().all(|p| p.name != "Nameless Wonder"));
    for pos in ALL_POSITIONS {
        assert!(!at(&players, pos).is_empty(), "no players at {pos}");
    }
    let ids: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), players.len());
}

#[test]
fn every_player_has_a_dollar_value() {
    let config = Config::default();
    let players = roster(&config);
    assert!(players.iter().all(|p| p.auction >= 1));

    let positive: Vec<&PlayerRecord> = players.iter().filter(|p| p.vorp > 0.0).collect();
    let distributed: u32 = positive.iter().map(|p| p.auction).sum();
    let pool = config.league.league_size as f64
        * config.league.budget_per_team as f64
        * config.league.pool_fraction;
    assert!(distributed as f64 <= pool + positive.len() as f64);
}

#[test]
fn top_player_at_each_skill_position_beats_replacement() {
    let players = roster(&Config::default());
    for pos in [Position::Quarterback, Position::RunningBack, Position::WideReceiver, Position::TightEnd] {
        let best = at(&players, pos)
            .into_iter()
            .map(|p| p.vorp)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(best > 0.0, "{pos} top VORP {best}");
    }
}

#[test]
fn ppr_revaluation_rewards_receivers_only() {
    let half = roster(&Config::default());
    let mut ppr_config = Config::default();
    ppr_config.league.format = ScoringFormat::Ppr;
    let ppr = revaluate(&half, &ppr_config);

    for (h, p) in half.iter().zip(&ppr) {
        assert_eq!(h.id, p.id);
        match h.position {
            Position::Quarterback => assert_eq!(h.fantasy_pts, p.fantasy_pts),
            Position::WideReceiver | Position::TightEnd => assert!(p.fantasy_pts > h.fantasy_pts),
            _ => {}
        }
    }
}

#[test]
fn json_roster_values_like_csv() {
    let csv_path = temp_path("mini.csv");
    std::fs::write(
        &csv_path,
        "Player,Team,Pos,Rec,Rec_Yds,Rec_TD\nAlpha One,KC,WR,90,1200,8\nBeta Two,BUF,TE,70,800,6\n",
    )
    .unwrap();
    let json_path = temp_path("mini.json");
    std::fs::write(
        &json_path,
        r#"[
            {"name": "Alpha One", "team": "kc", "position": "WR", "receptions": 90, "rec_yds": 1200, "rec_td": 8},
            {"name": "Beta Two", "team": "BUF", "position": "TE", "receptions": 70, "rec_yds": 800, "rec_td": 6}
        ]"#,
    )
    .unwrap();

    let config = Config::default();
    let from_csv = load_valued_roster(&csv_path, &config).unwrap();
    let from_json = load_valued_roster(&json_path, &config).unwrap();
    assert_eq!(from_csv, from_json);
    assert_eq!(from_csv[0].id, "alpha-one-kc");
    assert!(approx_eq(from_csv[0].fantasy_pts, 213.0, 1e-9));
}

#[test]
fn roster_without_usable_rows_is_an_error() {
    let path = temp_path("empty.csv");
    std::fs::write(&path, "Player,Pos\n,QB\n").unwrap();
    assert!(load_valued_roster(&path, &Config::default()).is_err());
}

// ===========================================================================
// Tiers
// ===========================================================================

#[test]
fn tiers_partition_each_position() {
    let config = Config::default();
    let players = roster(&config);
    let tiers = build_tiers(&players, &PreferenceMap::new(), &config);

    for pos in ALL_POSITIONS {
        let group = &tiers[&pos];
        let count: usize = group.iter().map(|t| t.players.len()).sum();
        assert_eq!(count, at(&players, pos).len(), "{pos}");
        for pair in group.windows(2) {
            assert!(pair[0].min_vorp >= pair[1].max_vorp, "{pos} tiers overlap");
        }
        let mut expected = at(&players, pos);
        expected.sort_by(|a, b| by_vorp_desc(a, b));
        let expected: Vec<&str> = expected.iter().map(|p| p.id.as_str()).collect();
        let flattened: Vec<&str> = group
            .iter()
            .flat_map(|t| t.players.iter().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(flattened, expected, "{pos} tiers reorder players");

        for (i, tier) in group.iter().enumerate() {
            assert!(
                tier.players.windows(2).all(|w| w[0].vorp >= w[1].vorp),
                "{pos} tier {i} is not sorted by VORP"
            );
            assert_eq!(tier.index, i);
            assert!(!tier.label.is_empty());
            assert!(!tier.recommendation.timing.is_empty());
        }
    }
}

// ===========================================================================
// Round plan
// ===========================================================================

#[test]
fn empty_preferences_still_plan_sixteen_rounds() {
    let config = Config::default();
    let players = roster(&config);
    let prefs = PreferenceMap::new();
    let tiers = build_tiers(&players, &prefs, &config);
    let rounds = generate_round_targets(&players, &prefs, &tiers, &config);

    assert_eq!(rounds.len(), 16);
    for (i, round) in rounds.iter().enumerate() {
        assert_eq!(round.round as usize, i + 1);
        assert!(!round.strategy.trim().is_empty());
        assert!(round.recommendations.len() <= 4);
        for rec in &round.recommendations {
            assert!(rec.targets.len() <= 3);
            assert!(rec.targets.iter().all(|t| t.rating.is_none()));
        }
    }
    assert!(rounds.iter().any(|r| !r.recommendations.is_empty()));
}

#[test]
fn plan_respects_draft_slot() {
    let mut config = Config::default();
    config.league.draft_slot = 12;
    let players = roster(&config);
    let prefs = PreferenceMap::new();
    let tiers = build_tiers(&players, &prefs, &config);
    let rounds = generate_round_targets(&players, &prefs, &tiers, &config);
    let picks: Vec<usize> = rounds.iter().take(4).map(|r| r.pick_number).collect();
    assert_eq!(picks, vec![12, 13, 36, 37]);
}

#[test]
fn passed_players_never_targeted() {
    let config = Config::default();
    let players = roster(&config);
    let mut prefs = PreferenceMap::new();
    let passed: Vec<String> = at(&players, Position::WideReceiver)
        .iter()
        .take(5)
        .map(|p| p.id.clone())
        .collect();
    for id in &passed {
        prefs.set(id.clone(), Rating::Pass);
    }
    let tiers = build_tiers(&players, &prefs, &config);
    let rounds = generate_round_targets(&players, &prefs, &tiers, &config);
    for rec in rounds.iter().flat_map(|r| &r.recommendations) {
        for t in &rec.targets {
            assert!(!passed.contains(&t.id), "{} was passed but targeted", t.id);
        }
    }
}

// ===========================================================================
// Analytics
// ===========================================================================

#[test]
fn archetype_always_present_without_preferences() {
    let config = Config::default();
    let players = roster(&config);
    let prefs = PreferenceMap::new();

    let overall = analyze_preferences(&players, &prefs, None, &config.analytics, 3);
    assert_eq!(overall.archetype.name, "Balanced Builder");
    assert_eq!(overall.stats.distribution.love_pct, 0.0);
    assert_eq!(overall.stats.distribution.pass_pct, 0.0);

    for pos in ALL_POSITIONS {
        let scoped = analyze_preferences(&players, &prefs, Some(pos), &config.analytics, 3);
        assert!(!scoped.archetype.name.is_empty());
        assert!(scoped.narratives.len() <= 3);
    }
}

#[test]
fn distribution_sums_to_one_hundred() {
    let config = Config::default();
    let players = roster(&config);
    let mut prefs = PreferenceMap::new();
    let ratings = [Rating::Love, Rating::Like, Rating::Meh, Rating::Pass, Rating::Like, Rating::Meh, Rating::Love];
    for (p, r) in players.iter().zip(ratings.iter().cycle()).take(37) {
        prefs.set(p.id.clone(), *r);
    }

    let analysis = analyze_preferences(&players, &prefs, None, &config.analytics, 5);
    let d = &analysis.stats.distribution;
    assert_eq!(d.rated, 37);
    let sum = d.love_pct + d.like_pct + d.meh_pct + d.pass_pct;
    assert!(approx_eq(sum, 100.0, 0.1), "sum {sum}");
    assert!(analysis.narratives.len() <= 5);
}

// ===========================================================================
// Preference store feeding the pipeline
// ===========================================================================

#[test]
fn stored_preferences_drive_the_report() {
    let config = Config::default();
    let players = roster(&config);
    let store = PreferenceStore::open(":memory:", PREFS_STORAGE_KEY).unwrap();

    let favorite = at(&players, Position::WideReceiver)[0].id.clone();
    store.set_rating(&favorite, Some(Rating::Love)).unwrap();
    let prefs = store.load().unwrap();

    let report = build_report(&players, &prefs, &config);
    assert_eq!(report.rounds.len(), 16);
    assert_eq!(report.league.rated, 1);
    assert!(report
        .rounds
        .iter()
        .flat_map(|r| &r.recommendations)
        .flat_map(|rec| &rec.targets)
        .any(|t| t.id == favorite && t.rating == Some(Rating::Love)));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rounds"].as_array().map(Vec::len), Some(16));
}

#[test]
fn foreign_schema_reads_as_no_preferences() {
    let path = temp_path("prefs.db");
    let _ = std::fs::remove_file(&path);
    let path = path.to_string_lossy().to_string();

    let old = PreferenceStore::open(&path, "draftswipe.prefs.v2").unwrap();
    old.import_json(r#"{"someone-kc": 2}"#).unwrap();

    let current = PreferenceStore::open(&path, PREFS_STORAGE_KEY).unwrap();
    assert!(current.load().unwrap().is_empty());
}
