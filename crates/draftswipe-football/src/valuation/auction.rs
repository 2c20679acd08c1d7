// Auction dollar value conversion.
//
// A fixed league-wide pool (`league_size * budget_per_team * pool_fraction`)
// is split across every player with positive VORP, in proportion to each
// player's share of the total positive VORP. The share is taken across the
// whole player pool, not per position.

use draftswipe_core::config::LeagueConfig;

/// Dollar value for players at or below replacement.
pub const FLOOR_VALUE: u32 = 1;

/// Pre-computed conversion factors for turning VORP into dollars.
#[derive(Debug, Clone, Copy)]
pub struct AuctionPool {
    /// Dollars handed out by VORP share.
    pub pool_dollars: f64,
    /// Sum of positive VORP across all players.
    pub total_positive_vorp: f64,
    /// Dollars per unit of VORP.
    pub dollars_per_vorp: f64,
}

impl AuctionPool {
    /// Derive the conversion from the league settings and the VORP of every
    /// player in the pool.
    ///
    /// If nobody has positive VORP the denominator is treated as 1, which
    /// leaves every player on the floor value.
    pub fn new(league: &LeagueConfig, vorps: &[f64]) -> Self {
        let pool_dollars =
            league.league_size as f64 * league.budget_per_team as f64 * league.pool_fraction;

        let total_positive_vorp: f64 = vorps.iter().filter(|v| **v > 0.0).sum();
        let denominator = if total_positive_vorp > 0.0 {
            total_positive_vorp
        } else {
            1.0
        };

        AuctionPool {
            pool_dollars,
            total_positive_vorp,
            dollars_per_vorp: pool_dollars / denominator,
        }
    }

    /// Whole-dollar value for a player.
    ///
    /// - Positive VORP: `round(vorp * dollars_per_vorp)`, never below the floor.
    /// - Zero or negative VORP: the floor value.
    pub fn dollar_value(&self, vorp: f64) -> u32 {
        if vorp <= 0.0 {
            return FLOOR_VALUE;
        }
        let raw = (vorp * self.dollars_per_vorp).round();
        (raw as u32).max(FLOOR_VALUE)
    }
}
