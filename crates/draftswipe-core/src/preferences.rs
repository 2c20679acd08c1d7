// Swipe ratings and the read-only preference map consumed by the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single swipe rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Rating {
    Pass,
    Meh,
    Like,
    Love,
}

impl Rating {
    /// Numeric weight used by scoring formulas (-1, 0, 1, 2).
    pub fn value(&self) -> i64 {
        match self {
            Rating::Pass => -1,
            Rating::Meh => 0,
            Rating::Like => 1,
            Rating::Love => 2,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            -1 => Some(Rating::Pass),
            0 => Some(Rating::Meh),
            1 => Some(Rating::Like),
            2 => Some(Rating::Love),
            _ => None,
        }
    }

    /// Parse the word form used on the command line.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass" | "-1" => Some(Rating::Pass),
            "meh" | "0" => Some(Rating::Meh),
            "like" | "1" => Some(Rating::Like),
            "love" | "2" => Some(Rating::Love),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Pass => "pass",
            Rating::Meh => "meh",
            Rating::Like => "like",
            Rating::Love => "love",
        }
    }

    /// Like or love.
    pub fn is_positive(&self) -> bool {
        matches!(self, Rating::Like | Rating::Love)
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::from_value(value).ok_or_else(|| format!("rating out of range: {value}"))
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

// ---------------------------------------------------------------------------
// PreferenceMap
// ---------------------------------------------------------------------------

/// Player id -> rating. Absent ids are unrated.
///
/// The pipeline only ever reads this map; the persistence layer owns writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceMap {
    ratings: BTreeMap<String, Rating>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: &str) -> Option<Rating> {
        self.ratings.get(player_id).copied()
    }

    /// Rating weight for scoring: unrated players count as meh (0).
    pub fn weight(&self, player_id: &str) -> i64 {
        self.get(player_id).map(|r| r.value()).unwrap_or(0)
    }

    /// Whether the player is rated like or love.
    pub fn is_positive(&self, player_id: &str) -> bool {
        self.get(player_id).is_some_and(|r| r.is_positive())
    }

    pub fn set(&mut self, player_id: impl Into<String>, rating: Rating) {
        self.ratings.insert(player_id.into(), rating);
    }

    pub fn remove(&mut self, player_id: &str) -> Option<Rating> {
        self.ratings.remove(player_id)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rating)> {
        self.ratings.iter().map(|(id, r)| (id.as_str(), *r))
    }

    /// Build a map from a loose JSON object (`{ "id": 2, ... }`).
    ///
    /// Entries whose value is not an integer in {-1, 0, 1, 2} are dropped with
    /// a warning rather than failing the whole map.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut map = PreferenceMap::new();
        let Some(obj) = value.as_object() else {
            warn!("preference document is not a JSON object; treating as empty");
            return map;
        };
        for (id, raw) in obj {
            match raw.as_i64().and_then(Rating::from_value) {
                Some(rating) => map.set(id.clone(), rating),
                None => warn!("dropping invalid rating {} for player '{}'", raw, id),
            }
        }
        map
    }

    /// The `{ id: int }` JSON form used by the storage envelope.
    pub fn to_json_value(&self) -> serde_json::Value {
        let obj: serde_json::Map<String, serde_json::Value> = self
            .ratings
            .iter()
            .map(|(id, r)| (id.clone(), serde_json::Value::from(r.value())))
            .collect();
        serde_json::Value::Object(obj)
    }
}

impl FromIterator<(String, Rating)> for PreferenceMap {
    fn from_iter<I: IntoIterator<Item = (String, Rating)>>(iter: I) -> Self {
        PreferenceMap {
            ratings: iter.into_iter().collect(),
        }
    }
}
