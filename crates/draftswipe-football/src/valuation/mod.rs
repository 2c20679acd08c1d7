// Valuation engine: fantasy points, VORP, auction dollars.
//
// A valuation pass always produces brand-new records with all three derived
// fields computed together under one ruleset; nothing is updated in place.

pub mod auction;
pub mod scoring;
pub mod vorp;

use draftswipe_core::config::Config;
use tracing::debug;

use crate::normalize::{normalize_all, RawRow};
use crate::player::PlayerRecord;

use self::auction::AuctionPool;
use self::scoring::ScoringRules;
use self::vorp::{compute_vorp, determine_replacement_levels};

/// Normalize raw stat rows and value them.
///
/// Malformed rows are dropped (see `normalize_all`). Output order follows the
/// input order of the surviving rows. An empty roster gives an empty output.
pub fn valuate(rows: &[RawRow], config: &Config) -> Vec<PlayerRecord> {
    let roster = normalize_all(rows);
    revaluate(&roster.players, config)
}

/// Value (or re-value) players from their raw stats.
///
/// Any existing derived values on the input are ignored, so this is also how
/// a roster is switched to another scoring format or league size.
pub fn revaluate(players: &[PlayerRecord], config: &Config) -> Vec<PlayerRecord> {
    if players.is_empty() {
        return Vec::new();
    }

    let rules = ScoringRules::for_format(config.league.format);

    // 1. Fantasy points.
    let points: Vec<f64> = players
        .iter()
        .map(|p| rules.fantasy_points(&p.stats))
        .collect();

    // 2. Replacement levels and VORP.
    let ranked: Vec<_> = players
        .iter()
        .zip(&points)
        .map(|(p, pts)| (p.position, *pts))
        .collect();
    let levels =
        determine_replacement_levels(&ranked, &config.valuation, config.league.league_size);
    let vorps: Vec<f64> = players
        .iter()
        .zip(&points)
        .map(|(p, pts)| compute_vorp(*pts, p.position, &levels))
        .collect();

    // 3. Auction dollars from the shared pool.
    let pool = AuctionPool::new(&config.league, &vorps);

    debug!(
        "valued {} players ({} format): baselines QB {:.1} RB {:.1} WR {:.1} TE {:.1}, ${:.0} pool over {:.1} VORP",
        players.len(),
        config.league.format.label(),
        levels.qb,
        levels.rb,
        levels.wr,
        levels.te,
        pool.pool_dollars,
        pool.total_positive_vorp
    );

    players
        .iter()
        .zip(points)
        .zip(vorps)
        .map(|((player, fantasy_pts), vorp)| PlayerRecord {
            fantasy_pts,
            vorp,
            auction: pool.dollar_value(vorp),
            ..player.clone()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
