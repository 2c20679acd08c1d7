// Draft-round estimation.
//
// Each player gets an estimated round from the best signal available:
// consensus ADP, then an overall rank, then a position-rank lookup table that
// encodes typical draft patterns. Estimates are returned as views over the
// roster; the player records themselves are never touched.

use std::collections::HashMap;

use draftswipe_core::config::Config;
use draftswipe_core::{Position, ALL_POSITIONS};
use serde::Serialize;

use crate::player::{by_points_desc, PlayerRecord};

/// Which signal produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    Adp,
    OverallRank,
    PositionRank,
}

/// A player paired with an estimated draft round.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedPlayer<'a> {
    pub player: &'a PlayerRecord,
    /// 1-based round, within `1..=rounds`.
    pub estimated_round: u32,
    /// Overall pick number the estimate corresponds to.
    pub adp_equivalent: f64,
    /// 1-based rank by fantasy points within the player's position.
    pub position_rank: usize,
    pub source: EstimateSource,
}

/// Round for a given position rank using a ceiling table: the first round
/// whose ceiling is `>= rank`. Ranks past the table end land in the final
/// round.
pub fn round_for_position_rank(rank: usize, table: &[usize], rounds: u32) -> u32 {
    let round = table
        .iter()
        .position(|&ceiling| rank <= ceiling)
        .map(|i| i as u32 + 1)
        .unwrap_or(rounds);
    round.clamp(1, rounds.max(1))
}

/// Round in which an overall pick number falls.
pub fn round_for_pick(pick: f64, league_size: usize, rounds: u32) -> u32 {
    let size = league_size.max(1) as f64;
    let round = (pick / size).ceil().max(1.0) as u32;
    round.clamp(1, rounds.max(1))
}

/// Overall pick number for a round in a snake draft. Odd rounds run
/// 1..=league_size, even rounds run back.
pub fn snake_pick_number(round: u32, league_size: usize, draft_slot: usize) -> usize {
    let round = round.max(1) as usize;
    if round % 2 == 1 {
        (round - 1) * league_size + draft_slot
    } else {
        round * league_size + 1 - draft_slot
    }
}

/// 1-based position rank (by fantasy points) for every player id.
pub fn position_ranks(players: &[PlayerRecord]) -> HashMap<&str, usize> {
    let mut ranks = HashMap::with_capacity(players.len());
    for pos in ALL_POSITIONS {
        let mut at_pos: Vec<&PlayerRecord> =
            players.iter().filter(|p| p.position == pos).collect();
        at_pos.sort_by(|a, b| by_points_desc(a, b));
        for (i, p) in at_pos.into_iter().enumerate() {
            ranks.insert(p.id.as_str(), i + 1);
        }
    }
    ranks
}

/// Estimate a round for every player, in roster order.
pub fn estimate_rounds<'a>(players: &'a [PlayerRecord], config: &Config) -> Vec<EstimatedPlayer<'a>> {
    let league_size = config.league.league_size.max(1);
    let rounds = config.league.rounds;
    let draft = &config.draft;
    let ranks = position_ranks(players);

    players
        .iter()
        .map(|player| {
            let position_rank = ranks.get(player.id.as_str()).copied().unwrap_or(usize::MAX);
            let (mut round, adp_equivalent, source) = if let Some(adp) = player.adp {
                (round_for_pick(adp, league_size, rounds), adp, EstimateSource::Adp)
            } else if let Some(rank) = player.overall_rank {
                let pick = rank as f64;
                (round_for_pick(pick, league_size, rounds), pick, EstimateSource::OverallRank)
            } else {
                let table = draft.rank_rounds.get(player.position);
                let round = round_for_position_rank(position_rank, table, rounds);
                // Middle of the estimated round.
                let pick = (round as f64 - 1.0) * league_size as f64 + league_size as f64 / 2.0;
                (round, pick, EstimateSource::PositionRank)
            };

            if player.fantasy_pts > draft.clamp_points {
                round = round.min(draft.clamp_max_round);
            }

            EstimatedPlayer {
                player,
                estimated_round: round,
                adp_equivalent,
                position_rank,
                source,
            }
        })
        .collect()
}

/// Round-span hint for a block of position ranks, e.g. "Rounds 3-5".
pub fn round_span_label(
    position: Position,
    first_rank: usize,
    last_rank: usize,
    config: &Config,
) -> String {
    let table = config.draft.rank_rounds.get(position);
    let rounds = config.league.rounds;
    let first = round_for_position_rank(first_rank, table, rounds);
    let last = round_for_position_rank(last_rank, table, rounds);
    if first == last {
        format!("Round {first}")
    } else {
        format!("Rounds {first}-{last}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, pos: Position, pts: f64) -> PlayerRecord {
        let mut p = PlayerRecord::shell(id.into(), id.into(), "TST".into(), pos);
        p.fantasy_pts = pts;
        p.vorp = pts;
        p
    }

    #[test]
    fn rank_table_lookup() {
        let table = [5, 12, 18];
        assert_eq!(round_for_position_rank(1, &table, 16), 1);
        assert_eq!(round_for_position_rank(5, &table, 16), 1);
        assert_eq!(round_for_position_rank(6, &table, 16), 2);
        assert_eq!(round_for_position_rank(18, &table, 16), 3);
        assert_eq!(round_for_position_rank(19, &table, 16), 16);
    }

    #[test]
    fn zero_ceilings_skip_rounds() {
        // QB-style table: nobody in round 1.
        let table = [0, 1, 3];
        assert_eq!(round_for_position_rank(1, &table, 16), 2);
        assert_eq!(round_for_position_rank(2, &table, 16), 3);
    }

    #[test]
    fn pick_to_round() {
        assert_eq!(round_for_pick(1.0, 12, 16), 1);
        assert_eq!(round_for_pick(12.0, 12, 16), 1);
        assert_eq!(round_for_pick(12.5, 12, 16), 2);
        assert_eq!(round_for_pick(0.4, 12, 16), 1);
        assert_eq!(round_for_pick(400.0, 12, 16), 16);
    }

    #[test]
    fn snake_order() {
        assert_eq!(snake_pick_number(1, 12, 1), 1);
        assert_eq!(snake_pick_number(2, 12, 1), 24);
        assert_eq!(snake_pick_number(3, 12, 1), 25);
        assert_eq!(snake_pick_number(1, 12, 12), 12);
        assert_eq!(snake_pick_number(2, 12, 12), 13);
        assert_eq!(snake_pick_number(2, 10, 4), 17);
    }

    #[test]
    fn estimate_prefers_adp_then_rank_then_table() {
        let mut a = player("a", Position::RunningBack, 150.0);
        a.adp = Some(30.0);
        a.overall_rank = Some(2);
        let mut b = player("b", Position::RunningBack, 140.0);
        b.overall_rank = Some(50);
        let c = player("c", Position::RunningBack, 130.0);
        let players = vec![a, b, c];

        let est = estimate_rounds(&players, &Config::default());
        assert_eq!(est[0].source, EstimateSource::Adp);
        assert_eq!(est[0].estimated_round, 3);
        assert_eq!(est[1].source, EstimateSource::OverallRank);
        assert_eq!(est[1].estimated_round, 5);
        assert_eq!(est[2].source, EstimateSource::PositionRank);
        // Third RB by points: rank 3 <= 5 -> round 1.
        assert_eq!(est[2].position_rank, 3);
        assert_eq!(est[2].estimated_round, 1);
        assert_eq!(est[2].adp_equivalent, 6.0);
    }

    #[test]
    fn high_scorers_clamped_to_round_two() {
        let mut star = player("star", Position::WideReceiver, 260.0);
        star.adp = Some(70.0);
        let players = vec![star];
        let est = estimate_rounds(&players, &Config::default());
        assert_eq!(est[0].estimated_round, 2);
    }

    #[test]
    fn estimates_do_not_mutate_roster() {
        let players = vec![player("x", Position::TightEnd, 90.0)];
        let before = players.clone();
        let _ = estimate_rounds(&players, &Config::default());
        assert_eq!(players, before);
    }

    #[test]
    fn position_ranks_by_points() {
        let players = vec![
            player("low", Position::WideReceiver, 100.0),
            player("high", Position::WideReceiver, 200.0),
            player("qb", Position::Quarterback, 50.0),
        ];
        let ranks = position_ranks(&players);
        assert_eq!(ranks["high"], 1);
        assert_eq!(ranks["low"], 2);
        assert_eq!(ranks["qb"], 1);
    }

    #[test]
    fn span_label() {
        let config = Config::default();
        assert_eq!(round_span_label(Position::RunningBack, 1, 5, &config), "Round 1");
        assert_eq!(round_span_label(Position::RunningBack, 6, 20, &config), "Rounds 2-4");
    }
}
