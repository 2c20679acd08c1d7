// Canonical player record carried through the pipeline.

use draftswipe_core::Position;
use serde::{Deserialize, Serialize};

/// Season statistics in canonical form. Missing stats are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStats {
    pub pass_yds: f64,
    pub pass_td: f64,
    pub pass_int: f64,
    pub rush_yds: f64,
    pub rush_td: f64,
    pub receptions: f64,
    pub rec_yds: f64,
    pub rec_td: f64,
    pub fumbles_lost: f64,
}

/// A player after normalization and (optionally) valuation.
///
/// `fantasy_pts`, `vorp` and `auction` are zero on a freshly normalized shell
/// and are only ever filled all at once by a single valuation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub rookie: bool,
    pub stats: RawStats,
    /// Consensus average draft position, when the source sheet had one.
    pub adp: Option<f64>,
    /// Overall (cross-position) rank, when the source sheet had one.
    pub overall_rank: Option<u32>,
    pub fantasy_pts: f64,
    pub vorp: f64,
    pub auction: u32,
}

impl PlayerRecord {
    /// A record with no derived values yet.
    pub fn shell(id: String, name: String, team: String, position: Position) -> Self {
        PlayerRecord {
            id,
            name,
            team,
            position,
            rookie: false,
            stats: RawStats::default(),
            adp: None,
            overall_rank: None,
            fantasy_pts: 0.0,
            vorp: 0.0,
            auction: 0,
        }
    }
}

/// Sort comparator: VORP descending. Ties keep their relative order under a
/// stable sort.
pub fn by_vorp_desc(a: &PlayerRecord, b: &PlayerRecord) -> std::cmp::Ordering {
    b.vorp
        .partial_cmp(&a.vorp)
        .unwrap_or(std::cmp::Ordering::Equal)
}

/// Sort comparator: fantasy points descending.
pub fn by_points_desc(a: &PlayerRecord, b: &PlayerRecord) -> std::cmp::Ordering {
    b.fantasy_pts
        .partial_cmp(&a.fantasy_pts)
        .unwrap_or(std::cmp::Ordering::Equal)
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
