// Fantasy football positions and per-position lookup tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fantasy football roster position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DST")]
    Defense,
}

/// Every position, in display order.
pub const ALL_POSITIONS: [Position; 6] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

/// Positions that carry weekly starting-lineup skill slots. The draft-flow
/// generator only recommends these.
pub const SKILL_POSITIONS: [Position; 4] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
];

impl Position {
    /// Parse a position string as it appears in stat sheets.
    ///
    /// Case-insensitive; accepts the common spellings for kickers and team
    /// defenses ("PK", "D/ST", "DEF").
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" | "HB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" | "D" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Short display string ("QB", "RB", ...).
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
        }
    }

    /// Whether this position is one of the four skill positions.
    pub fn is_skill(&self) -> bool {
        SKILL_POSITIONS.contains(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// PerPosition table
// ---------------------------------------------------------------------------

/// A value for each position. Used for every tunable per-position constant
/// (cliff thresholds, replacement slots, round tables, ...).
///
/// Serialized with upper-case keys so TOML tables read naturally:
///
/// ```toml
/// [tiers.cliff]
/// QB = 15.0
/// RB = 14.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerPosition<T> {
    #[serde(rename = "QB")]
    pub qb: T,
    #[serde(rename = "RB")]
    pub rb: T,
    #[serde(rename = "WR")]
    pub wr: T,
    #[serde(rename = "TE")]
    pub te: T,
    #[serde(rename = "K")]
    pub k: T,
    #[serde(rename = "DST")]
    pub dst: T,
}

impl<T> PerPosition<T> {
    pub fn get(&self, pos: Position) -> &T {
        match pos {
            Position::Quarterback => &self.qb,
            Position::RunningBack => &self.rb,
            Position::WideReceiver => &self.wr,
            Position::TightEnd => &self.te,
            Position::Kicker => &self.k,
            Position::Defense => &self.dst,
        }
    }

    pub fn get_mut(&mut self, pos: Position) -> &mut T {
        match pos {
            Position::Quarterback => &mut self.qb,
            Position::RunningBack => &mut self.rb,
            Position::WideReceiver => &mut self.wr,
            Position::TightEnd => &mut self.te,
            Position::Kicker => &mut self.k,
            Position::Defense => &mut self.dst,
        }
    }

    /// Iterate `(position, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        ALL_POSITIONS.iter().map(move |&pos| (pos, self.get(pos)))
    }
}

impl<T: Default> Default for PerPosition<T> {
    fn default() -> Self {
        PerPosition {
            qb: T::default(),
            rb: T::default(),
            wr: T::default(),
            te: T::default(),
            k: T::default(),
            dst: T::default(),
        }
    }
}
