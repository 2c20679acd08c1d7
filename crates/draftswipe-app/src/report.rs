// Draft report assembly.
//
// Runs the whole pipeline over one roster and one preference map and bundles
// the results into a single serializable document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use draftswipe_core::config::{Config, ScoringFormat};
use draftswipe_core::{Position, PreferenceMap};
use draftswipe_football::analytics::{analyze_preferences, PreferenceAnalysis};
use draftswipe_football::draft_flow::{generate_round_targets, RoundTarget};
use draftswipe_football::tiers::{build_tiers, Tier};
use draftswipe_football::PlayerRecord;
use serde::Serialize;
use tracing::info;

/// League settings echoed into the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub name: String,
    pub league_size: usize,
    pub draft_slot: usize,
    pub format: ScoringFormat,
    pub budget_per_team: u32,
    pub rounds: u32,
    pub players: usize,
    pub rated: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftReport {
    pub generated_at: DateTime<Utc>,
    pub league: LeagueSummary,
    pub players: Vec<PlayerRecord>,
    pub tiers: BTreeMap<Position, Vec<Tier>>,
    pub rounds: Vec<RoundTarget>,
    pub analysis: PreferenceAnalysis,
}

/// Sort a valued roster for display: VORP descending, stable.
pub fn ranked(players: &[PlayerRecord]) -> Vec<PlayerRecord> {
    let mut out = players.to_vec();
    out.sort_by(draftswipe_football::player::by_vorp_desc);
    out
}

/// Build the full report from an already valued roster.
pub fn build_report(players: &[PlayerRecord], prefs: &PreferenceMap, config: &Config) -> DraftReport {
    let tiers = build_tiers(players, prefs, config);
    let rounds = generate_round_targets(players, prefs, &tiers, config);
    let analysis = analyze_preferences(
        players,
        prefs,
        None,
        &config.analytics,
        config.analytics.narrative_count,
    );

    info!(
        "Report built: {} players, {} tier groups, {} rounds, archetype {}",
        players.len(),
        tiers.len(),
        rounds.len(),
        analysis.archetype.name
    );

    let league = &config.league;
    DraftReport {
        generated_at: Utc::now(),
        league: LeagueSummary {
            name: league.name.clone(),
            league_size: league.league_size,
            draft_slot: league.draft_slot,
            format: league.format,
            budget_per_team: league.budget_per_team,
            rounds: league.rounds,
            players: players.len(),
            rated: analysis.stats.distribution.rated,
        },
        players: ranked(players),
        tiers,
        rounds,
        analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftswipe_core::Rating;

    fn player(id: &str, pos: Position, pts: f64) -> PlayerRecord {
        let mut p = PlayerRecord::shell(id.into(), id.into(), "TST".into(), pos);
        p.fantasy_pts = pts;
        p.vorp = pts - 50.0;
        p.auction = 1;
        p
    }

    #[test]
    fn report_covers_every_stage() {
        let players = vec![
            player("w", Position::WideReceiver, 150.0),
            player("r", Position::RunningBack, 180.0),
            player("k", Position::Kicker, 120.0),
        ];
        let mut prefs = PreferenceMap::new();
        prefs.set("w", Rating::Love);
        let report = build_report(&players, &prefs, &Config::default());

        assert_eq!(report.rounds.len(), 16);
        assert_eq!(report.tiers.len(), 3);
        assert_eq!(report.league.rated, 1);
        assert_eq!(report.players[0].id, "r");

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["tiers"]["WR"].is_array());
        assert_eq!(json["league"]["format"], "half");
        assert_eq!(json["analysis"]["archetype"]["name"], "Balanced Builder");
    }
}
