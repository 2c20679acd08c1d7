// Fantasy point scoring rules.

use draftswipe_core::config::ScoringFormat;

use crate::player::{round2, RawStats};

/// Point values for one scoring format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub pass_yds_per_point: f64,
    pub pass_td: f64,
    pub pass_int: f64,
    pub rush_yds_per_point: f64,
    pub rush_td: f64,
    pub rec_yds_per_point: f64,
    pub rec_td: f64,
    pub reception: f64,
    pub fumble_lost: f64,
}

impl ScoringRules {
    /// Standard yardage/touchdown values with the format's reception credit.
    pub fn for_format(format: ScoringFormat) -> Self {
        ScoringRules {
            pass_yds_per_point: 25.0,
            pass_td: 4.0,
            pass_int: -2.0,
            rush_yds_per_point: 10.0,
            rush_td: 6.0,
            rec_yds_per_point: 10.0,
            rec_td: 6.0,
            reception: format.reception_credit(),
            fumble_lost: -2.0,
        }
    }

    /// Season fantasy points, rounded to 2 decimal places.
    pub fn fantasy_points(&self, s: &RawStats) -> f64 {
        let raw = s.pass_yds / self.pass_yds_per_point
            + s.pass_td * self.pass_td
            + s.pass_int * self.pass_int
            + s.rush_yds / self.rush_yds_per_point
            + s.rush_td * self.rush_td
            + s.rec_yds / self.rec_yds_per_point
            + s.rec_td * self.rec_td
            + s.receptions * self.reception
            + s.fumbles_lost * self.fumble_lost;
        round2(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn receiver_line() -> RawStats {
        RawStats {
            receptions: 100.0,
            rec_yds: 1200.0,
            rec_td: 8.0,
            rush_yds: 30.0,
            fumbles_lost: 1.0,
            ..RawStats::default()
        }
    }

    #[test]
    fn quarterback_line() {
        let stats = RawStats {
            pass_yds: 4306.0,
            pass_td: 29.0,
            pass_int: 18.0,
            rush_yds: 524.0,
            rush_td: 15.0,
            fumbles_lost: 4.0,
            ..RawStats::default()
        };
        // 172.24 + 116 - 36 + 52.4 + 90 - 8
        let pts = ScoringRules::for_format(ScoringFormat::Standard).fantasy_points(&stats);
        assert!(approx_eq(pts, 386.64, 1e-9), "got {pts}");
    }

    #[test]
    fn reception_credit_by_format() {
        let stats = receiver_line();
        // 120 + 48 + 3 - 2 = 169 before receptions
        let std = ScoringRules::for_format(ScoringFormat::Standard).fantasy_points(&stats);
        let half = ScoringRules::for_format(ScoringFormat::HalfPpr).fantasy_points(&stats);
        let ppr = ScoringRules::for_format(ScoringFormat::Ppr).fantasy_points(&stats);
        assert!(approx_eq(std, 169.0, 1e-9));
        assert!(approx_eq(half, 219.0, 1e-9));
        assert!(approx_eq(ppr, 269.0, 1e-9));
    }

    #[test]
    fn rounds_to_two_decimals() {
        let stats = RawStats {
            pass_yds: 1.0,
            ..RawStats::default()
        };
        // 1/25 = 0.04
        let pts = ScoringRules::for_format(ScoringFormat::Standard).fantasy_points(&stats);
        assert_eq!(pts, 0.04);

        let stats = RawStats {
            rush_yds: 1.234,
            ..RawStats::default()
        };
        let pts = ScoringRules::for_format(ScoringFormat::Standard).fantasy_points(&stats);
        assert_eq!(pts, 0.12);
    }

    #[test]
    fn empty_line_is_zero() {
        let pts = ScoringRules::for_format(ScoringFormat::Ppr).fantasy_points(&RawStats::default());
        assert_eq!(pts, 0.0);
    }
}
