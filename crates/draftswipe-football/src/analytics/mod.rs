// Preference analytics.
//
// Turns a user's ratings into aggregate statistics, a GM archetype and a few
// narrative insights. Everything here is a pure function of the roster, the
// preference map and the analytics settings.

pub mod archetypes;
pub mod narratives;

use std::collections::{BTreeMap, HashMap};

use draftswipe_core::config::AnalyticsConfig;
use draftswipe_core::{PerPosition, Position, PreferenceMap, Rating, ALL_POSITIONS};
use serde::Serialize;

use crate::player::{by_points_desc, round2, PlayerRecord};

use self::archetypes::{classify, GmArchetype, OVERALL_ARCHETYPES, POSITION_ARCHETYPES};
use self::narratives::{generate_narratives, Narrative};

// ---------------------------------------------------------------------------
// Aggregate statistics
// ---------------------------------------------------------------------------

/// Counts and percentages over rated players only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub rated: usize,
    pub love: usize,
    pub like: usize,
    pub meh: usize,
    pub pass: usize,
    pub love_pct: f64,
    pub like_pct: f64,
    pub meh_pct: f64,
    pub pass_pct: f64,
}

impl RatingDistribution {
    fn from_ratings(ratings: impl Iterator<Item = Rating>) -> Self {
        let mut d = RatingDistribution::default();
        for r in ratings {
            d.rated += 1;
            match r {
                Rating::Love => d.love += 1,
                Rating::Like => d.like += 1,
                Rating::Meh => d.meh += 1,
                Rating::Pass => d.pass += 1,
            }
        }
        if d.rated > 0 {
            let pct = tenth_percentages(&[d.love, d.like, d.meh, d.pass], d.rated);
            d.love_pct = pct[0];
            d.like_pct = pct[1];
            d.meh_pct = pct[2];
            d.pass_pct = pct[3];
        }
        d
    }

    pub fn liked(&self) -> usize {
        self.love + self.like
    }
}

/// Percentages to one decimal place that always sum to exactly 100.0.
///
/// Works in tenths of a percent: each share is floored, then the leftover
/// tenths go to the largest remainders (earlier entries win ties).
fn tenth_percentages(counts: &[usize], total: usize) -> Vec<f64> {
    const UNITS: usize = 1000;
    let mut units: Vec<usize> = counts.iter().map(|c| c * UNITS / total).collect();
    let mut leftover = UNITS - units.iter().sum::<usize>();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(counts[i] * UNITS % total));
    for i in order {
        if leftover == 0 {
            break;
        }
        if counts[i] * UNITS % total > 0 {
            units[i] += 1;
            leftover -= 1;
        }
    }

    units.into_iter().map(|u| u as f64 / 10.0).collect()
}

/// A player mentioned in analytics output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRef {
    pub id: String,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub fantasy_pts: f64,
    pub auction: u32,
    pub rating: Option<Rating>,
}

impl PlayerRef {
    fn new(p: &PlayerRecord, prefs: &PreferenceMap) -> Self {
        PlayerRef {
            id: p.id.clone(),
            name: p.name.clone(),
            team: p.team.clone(),
            position: p.position,
            fantasy_pts: p.fantasy_pts,
            auction: p.auction,
            rating: prefs.get(&p.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAffinity {
    pub team: String,
    pub liked: usize,
}

/// Aggregate signals over one scope (all positions or one position).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub scope: Option<Position>,
    pub total_players: usize,
    pub distribution: RatingDistribution,
    pub liked_by_position: PerPosition<usize>,
    /// Liked players above their position's elite cutoff.
    pub elite_targets: PerPosition<usize>,
    pub elite_players: Vec<PlayerRef>,
    /// Liked players at or below `cheap_max_auction` dollars.
    pub cheap_likes: Vec<PlayerRef>,
    /// Liked players at or above `premium_min_auction` dollars.
    pub premium_likes: Vec<PlayerRef>,
    pub cheap_max_auction: u32,
    pub premium_min_auction: u32,
    pub loved: Vec<PlayerRef>,
    pub sleepers: Vec<PlayerRef>,
    pub rookie_likes: Vec<PlayerRef>,
    /// Elite-cutoff players the user passed on.
    pub passed_elites: Vec<PlayerRef>,
    pub top_team: Option<TeamAffinity>,
}

impl AggregateStats {
    pub fn elite_total(&self) -> usize {
        self.elite_targets.iter().map(|(_, n)| *n).sum()
    }
}

/// Compute aggregate statistics for the players in scope.
///
/// Ratings for ids that are not in the scoped roster are ignored. Player
/// lists are ordered by fantasy points, highest first.
pub fn aggregate_stats(
    players: &[PlayerRecord],
    prefs: &PreferenceMap,
    scope: Option<Position>,
    config: &AnalyticsConfig,
) -> AggregateStats {
    let mut in_scope: Vec<&PlayerRecord> = players
        .iter()
        .filter(|p| scope.map_or(true, |pos| p.position == pos))
        .collect();
    in_scope.sort_by(|a, b| by_points_desc(a, b));

    let rated: Vec<(&PlayerRecord, Rating)> = in_scope
        .iter()
        .filter_map(|p| prefs.get(&p.id).map(|r| (*p, r)))
        .collect();
    let liked: Vec<&PlayerRecord> = rated
        .iter()
        .filter(|(_, r)| r.is_positive())
        .map(|(p, _)| *p)
        .collect();

    let is_elite = |p: &PlayerRecord| p.fantasy_pts > *config.elite_points.get(p.position);

    let mut liked_by_position: PerPosition<usize> = PerPosition::default();
    let mut elite_targets: PerPosition<usize> = PerPosition::default();
    for &p in &liked {
        *liked_by_position.get_mut(p.position) += 1;
        if is_elite(p) {
            *elite_targets.get_mut(p.position) += 1;
        }
    }

    let loved_players: Vec<&PlayerRecord> = rated
        .iter()
        .filter(|(_, r)| *r == Rating::Love)
        .map(|(p, _)| *p)
        .collect();
    let sleepers = find_sleepers(&rated, &loved_players, config.sleeper_ratio);
    let passed_elites = rated
        .iter()
        .filter(|&&(p, r)| r == Rating::Pass && is_elite(p))
        .map(|(p, _)| *p);

    let liked_where = |keep: &dyn Fn(&PlayerRecord) -> bool| {
        to_refs(liked.iter().copied().filter(|&p| keep(p)), prefs)
    };

    AggregateStats {
        scope,
        total_players: in_scope.len(),
        distribution: RatingDistribution::from_ratings(rated.iter().map(|(_, r)| *r)),
        liked_by_position,
        elite_targets,
        elite_players: liked_where(&is_elite),
        cheap_likes: liked_where(&|p| p.auction <= config.cheap_max_auction),
        premium_likes: liked_where(&|p| p.auction >= config.premium_min_auction),
        cheap_max_auction: config.cheap_max_auction,
        premium_min_auction: config.premium_min_auction,
        loved: to_refs(loved_players.iter().copied(), prefs),
        sleepers: to_refs(sleepers, prefs),
        rookie_likes: liked_where(&|p| p.rookie),
        passed_elites: to_refs(passed_elites, prefs),
        top_team: most_liked_team(&liked),
    }
}

fn to_refs<'a>(
    players: impl IntoIterator<Item = &'a PlayerRecord>,
    prefs: &PreferenceMap,
) -> Vec<PlayerRef> {
    players.into_iter().map(|p| PlayerRef::new(p, prefs)).collect()
}

/// Loved players below `ratio` times their position's mean points among
/// rated players. Positions with no rated players contribute nothing.
fn find_sleepers<'a>(
    rated: &[(&'a PlayerRecord, Rating)],
    loved: &[&'a PlayerRecord],
    ratio: f64,
) -> Vec<&'a PlayerRecord> {
    let mut means: HashMap<Position, f64> = HashMap::new();
    for pos in ALL_POSITIONS {
        let pts: Vec<f64> = rated
            .iter()
            .filter(|(p, _)| p.position == pos)
            .map(|(p, _)| p.fantasy_pts)
            .collect();
        if !pts.is_empty() {
            means.insert(pos, pts.iter().sum::<f64>() / pts.len() as f64);
        }
    }

    loved
        .iter()
        .copied()
        .filter(|p| {
            means
                .get(&p.position)
                .is_some_and(|mean| p.fantasy_pts < ratio * mean)
        })
        .collect()
}

fn most_liked_team(liked: &[&PlayerRecord]) -> Option<TeamAffinity> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for p in liked {
        *counts.entry(p.team.as_str()).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (team, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((team, n));
        }
    }
    best.map(|(team, liked)| TeamAffinity {
        team: team.to_string(),
        liked,
    })
}

// ---------------------------------------------------------------------------
// Full analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceAnalysis {
    pub stats: AggregateStats,
    pub archetype: &'static GmArchetype,
    pub narratives: Vec<Narrative>,
    /// Share of the scoped roster the user has rated, in percent.
    pub coverage_pct: f64,
}

/// Analyze a user's ratings, optionally restricted to one position.
///
/// With a position filter the position archetype table is used, otherwise
/// the overall table. An archetype is always returned.
pub fn analyze_preferences(
    players: &[PlayerRecord],
    prefs: &PreferenceMap,
    position: Option<Position>,
    config: &AnalyticsConfig,
    narrative_count: usize,
) -> PreferenceAnalysis {
    let stats = aggregate_stats(players, prefs, position, config);
    let table = if position.is_some() {
        POSITION_ARCHETYPES
    } else {
        OVERALL_ARCHETYPES
    };
    let archetype = classify(table, &stats, players, prefs);
    let narratives = generate_narratives(&stats, archetype, narrative_count);

    let coverage_pct = if stats.total_players > 0 {
        round2(stats.distribution.rated as f64 * 100.0 / stats.total_players as f64)
    } else {
        0.0
    };

    PreferenceAnalysis {
        stats,
        archetype,
        narratives,
        coverage_pct,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
