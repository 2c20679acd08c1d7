// Value Over Replacement Player (VORP).
//
// The replacement level at a position is the fantasy point total of the
// first player who would not start in a league of this size. VORP is a
// player's points minus that baseline.

use draftswipe_core::config::{ValuationConfig, BASE_LEAGUE_SIZE};
use draftswipe_core::{PerPosition, Position, ALL_POSITIONS};

use crate::player::round2;

// ---------------------------------------------------------------------------
// Replacement level computation
// ---------------------------------------------------------------------------

/// 0-based index of the replacement-level player at a position.
///
/// `slots_per_12` is the number of starters in a 12-team league; it is scaled
/// proportionally to `league_size` and rounded half up. Never decreases as
/// the league grows.
pub fn replacement_index(slots_per_12: usize, league_size: usize) -> usize {
    (slots_per_12 * league_size + BASE_LEAGUE_SIZE / 2) / BASE_LEAGUE_SIZE
}

/// Replacement-level fantasy points per position.
///
/// Algorithm, per position:
/// 1. Rank every player at the position by fantasy points, descending.
/// 2. The baseline is the points of the player at the replacement index.
/// 3. If the position is too shallow to reach that index, the baseline is 0.
pub fn determine_replacement_levels(
    players: &[(Position, f64)],
    valuation: &ValuationConfig,
    league_size: usize,
) -> PerPosition<f64> {
    let mut levels: PerPosition<f64> = PerPosition::default();

    for pos in ALL_POSITIONS {
        let mut points: Vec<f64> = players
            .iter()
            .filter(|(p, _)| *p == pos)
            .map(|(_, pts)| *pts)
            .collect();
        points.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let index = replacement_index(*valuation.replacement_slots.get(pos), league_size);
        *levels.get_mut(pos) = points.get(index).copied().unwrap_or(0.0);
    }

    levels
}

/// VORP for a single player, rounded to 2 decimal places.
pub fn compute_vorp(fantasy_pts: f64, position: Position, levels: &PerPosition<f64>) -> f64 {
    round2(fantasy_pts - levels.get(position))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn pool(pos: Position, points: &[f64]) -> Vec<(Position, f64)> {
        points.iter().map(|&p| (pos, p)).collect()
    }

    #[test]
    fn replacement_index_at_base_size() {
        assert_eq!(replacement_index(12, 12), 12);
        assert_eq!(replacement_index(30, 12), 30);
        assert_eq!(replacement_index(40, 12), 40);
    }

    #[test]
    fn replacement_index_scales_with_league_size() {
        // 30 * 10 / 12 = 25
        assert_eq!(replacement_index(30, 10), 25);
        // 40 * 10 / 12 = 33.3 -> 33
        assert_eq!(replacement_index(40, 10), 33);
        // 12 * 14 / 12 = 14
        assert_eq!(replacement_index(12, 14), 14);
        // 30 * 9 / 12 = 22.5 -> 23 (half up)
        assert_eq!(replacement_index(30, 9), 23);
    }

    #[test]
    fn replacement_index_is_monotonic_in_league_size() {
        for slots in [12, 30, 40] {
            let mut previous = 0;
            for size in 1..=32 {
                let idx = replacement_index(slots, size);
                assert!(idx >= previous, "slots {slots}: size {size} gave {idx} < {previous}");
                previous = idx;
            }
        }
    }

    #[test]
    fn baseline_is_player_at_index() {
        // 2-team league: QB index = round(12 * 2 / 12) = 2 -> third-best QB.
        let players = pool(Position::Quarterback, &[300.0, 250.0, 200.0, 150.0]);
        let levels = determine_replacement_levels(&players, &ValuationConfig::default(), 2);
        assert!(approx_eq(levels.qb, 200.0, 1e-9));
    }

    #[test]
    fn baseline_ignores_input_order() {
        let players = pool(Position::Quarterback, &[150.0, 300.0, 200.0, 250.0]);
        let levels = determine_replacement_levels(&players, &ValuationConfig::default(), 2);
        assert!(approx_eq(levels.qb, 200.0, 1e-9));
    }

    #[test]
    fn shallow_position_has_zero_baseline() {
        let players = pool(Position::Quarterback, &[320.0, 310.0, 150.0, 140.0]);
        let levels = determine_replacement_levels(&players, &ValuationConfig::default(), 12);
        assert_eq!(levels.qb, 0.0);
        assert_eq!(compute_vorp(320.0, Position::Quarterback, &levels), 320.0);
    }

    #[test]
    fn positions_are_independent() {
        let mut players = pool(Position::TightEnd, &[150.0, 120.0, 90.0]);
        players.extend(pool(Position::RunningBack, &[250.0, 220.0, 180.0, 170.0]));
        let levels = determine_replacement_levels(&players, &ValuationConfig::default(), 1);
        // TE index = round(12/12) = 1 ; RB index = round(30/12) = 3 (2.5 half up)
        assert!(approx_eq(levels.te, 120.0, 1e-9));
        assert!(approx_eq(levels.rb, 170.0, 1e-9));
        assert_eq!(levels.wr, 0.0);
    }

    #[test]
    fn vorp_rounded_and_can_be_negative() {
        let mut levels: PerPosition<f64> = PerPosition::default();
        levels.wr = 100.333;
        assert_eq!(compute_vorp(90.0, Position::WideReceiver, &levels), -10.33);
    }
}
