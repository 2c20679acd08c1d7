// Stat sheet ingestion: raw header/value rows into canonical player records.
//
// Sources disagree on header names ("Pass_Yd" vs "Pass_Yds", "id" vs "ID"),
// so every field is looked up through an ordered synonym list. This is the
// only place header naming is tolerated; everything downstream sees
// `PlayerRecord`.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use draftswipe_core::Position;
use thiserror::Error;
use tracing::{debug, warn};

use crate::player::{PlayerRecord, RawStats};

/// One stat-sheet row: header -> cell text.
pub type RawRow = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Header synonyms
// ---------------------------------------------------------------------------

const ID_KEYS: &[&str] = &["id", "ID", "Id", "player_id", "PlayerID"];
const NAME_KEYS: &[&str] = &["Name", "Player", "name", "player", "PLAYER"];
const TEAM_KEYS: &[&str] = &["Team", "Tm", "team", "TEAM"];
const POS_KEYS: &[&str] = &["Pos", "Position", "FantPos", "pos", "position", "POS"];
const ROOKIE_KEYS: &[&str] = &["Rookie", "rookie", "ROOKIE", "Is_Rookie"];

const PASS_YDS_KEYS: &[&str] = &["Pass_Yds", "Pass_Yd", "PassYds", "pass_yds"];
const PASS_TD_KEYS: &[&str] = &["Pass_TD", "PassTD", "Pass_TDs", "pass_td"];
const PASS_INT_KEYS: &[&str] = &["Pass_Int", "Int", "INT", "pass_int"];
const RUSH_YDS_KEYS: &[&str] = &["Rush_Yds", "Rush_Yd", "RushYds", "rush_yds"];
const RUSH_TD_KEYS: &[&str] = &["Rush_TD", "RushTD", "Rush_TDs", "rush_td"];
const REC_KEYS: &[&str] = &["Rec", "Receptions", "rec", "receptions"];
const REC_YDS_KEYS: &[&str] = &["Rec_Yds", "Rec_Yd", "RecYds", "rec_yds"];
const REC_TD_KEYS: &[&str] = &["Rec_TD", "RecTD", "Rec_TDs", "rec_td"];
const FUMBLES_KEYS: &[&str] = &["Fumbles_Lost", "FL", "Fum_Lost", "fumbles_lost"];
const ADP_KEYS: &[&str] = &["ADP", "adp", "Avg_Pick"];
const RANK_KEYS: &[&str] = &["Rank", "Overall", "Ovr", "Rk", "rank", "overall_rank"];

/// Team code for players without one.
const FREE_AGENT: &str = "FA";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A row that cannot become a player. Excluded from the roster, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedRow {
    #[error("row {index}: missing player name")]
    MissingName { index: usize },

    #[error("row {index}: missing position")]
    MissingPosition { index: usize },

    #[error("row {index}: unrecognized position '{value}'")]
    UnknownPosition { index: usize, value: String },
}

/// A whole roster document that could not be read.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("roster JSON must be an array of objects")]
    NotAnArray,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// First synonym present with a non-empty value.
fn lookup<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

/// Lenient numeric parse: tolerates whitespace and thousands separators.
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number(row: &RawRow, keys: &[&str]) -> f64 {
    lookup(row, keys).and_then(parse_number).unwrap_or(0.0)
}

fn flag(row: &RawRow, keys: &[&str]) -> bool {
    lookup(row, keys).is_some_and(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "x" | "r" | "rookie"
        )
    })
}

/// Lower-case, dash-separated form of a name ("Ja'Marr Chase" -> "jamarr-chase").
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '.' {
            pending_dash = true;
        }
    }
    slug
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turn one raw row into a player shell with zeroed valuation fields.
///
/// Missing numbers default to 0 and missing flags to false; only a missing
/// name or position rejects the row.
pub fn normalize(row: &RawRow, index: usize) -> Result<PlayerRecord, MalformedRow> {
    let name = lookup(row, NAME_KEYS)
        .ok_or(MalformedRow::MissingName { index })?
        .to_string();

    let pos_text = lookup(row, POS_KEYS).ok_or(MalformedRow::MissingPosition { index })?;
    let position = Position::from_str_pos(pos_text).ok_or_else(|| MalformedRow::UnknownPosition {
        index,
        value: pos_text.to_string(),
    })?;

    let team = lookup(row, TEAM_KEYS)
        .map(|t| t.to_uppercase())
        .unwrap_or_else(|| FREE_AGENT.to_string());

    let id = match lookup(row, ID_KEYS) {
        Some(explicit) => explicit.to_string(),
        None => {
            let slug = slugify(&name);
            if slug.is_empty() {
                format!("player-{index}")
            } else {
                format!("{}-{}", slug, team.to_lowercase())
            }
        }
    };

    let mut player = PlayerRecord::shell(id, name, team, position);
    player.rookie = flag(row, ROOKIE_KEYS);
    player.stats = RawStats {
        pass_yds: number(row, PASS_YDS_KEYS),
        pass_td: number(row, PASS_TD_KEYS),
        pass_int: number(row, PASS_INT_KEYS),
        rush_yds: number(row, RUSH_YDS_KEYS),
        rush_td: number(row, RUSH_TD_KEYS),
        receptions: number(row, REC_KEYS),
        rec_yds: number(row, REC_YDS_KEYS),
        rec_td: number(row, REC_TD_KEYS),
        fumbles_lost: number(row, FUMBLES_KEYS),
    };
    player.adp = lookup(row, ADP_KEYS)
        .and_then(parse_number)
        .filter(|adp| *adp > 0.0);
    player.overall_rank = lookup(row, RANK_KEYS)
        .and_then(parse_number)
        .filter(|rank| *rank >= 1.0)
        .map(|rank| rank.round() as u32);

    Ok(player)
}

/// Result of normalizing a batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRoster {
    pub players: Vec<PlayerRecord>,
    pub skipped: Vec<MalformedRow>,
}

/// Normalize every row, skipping malformed ones and making ids unique
/// within the batch. Later duplicates get a `-{index}` suffix, extended with
/// a counter if that id is already taken.
pub fn normalize_all(rows: &[RawRow]) -> NormalizedRoster {
    let mut roster = NormalizedRoster::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        match normalize(row, index) {
            Ok(mut player) => {
                if !seen.insert(player.id.clone()) {
                    let mut unique = format!("{}-{}", player.id, index);
                    let mut attempt = 1;
                    while !seen.insert(unique.clone()) {
                        attempt += 1;
                        unique = format!("{}-{}-{}", player.id, index, attempt);
                    }
                    warn!("duplicate player id '{}', using '{}'", player.id, unique);
                    player.id = unique;
                }
                roster.players.push(player);
            }
            Err(e) => {
                warn!("skipping malformed row: {}", e);
                roster.skipped.push(e);
            }
        }
    }

    debug!(
        "normalized {} players ({} rows skipped)",
        roster.players.len(),
        roster.skipped.len()
    );
    roster
}

// ---------------------------------------------------------------------------
// Document readers
// ---------------------------------------------------------------------------

/// Read a headered CSV document into raw rows. Unreadable records are
/// skipped with a warning.
pub fn rows_from_csv<R: Read>(rdr: R) -> Result<Vec<RawRow>, RosterError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let row: RawRow = headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                rows.push(row);
            }
            Err(e) => {
                warn!("skipping unreadable CSV record: {}", e);
            }
        }
    }
    Ok(rows)
}

/// Read a JSON array of objects into raw rows. Scalar values are stringified;
/// nulls are treated as absent.
pub fn rows_from_json(text: &str) -> Result<Vec<RawRow>, RosterError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let items = value.as_array().ok_or(RosterError::NotAnArray)?;

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            warn!("skipping roster entry {}: not an object", index);
            continue;
        };
        let row: RawRow = obj
            .iter()
            .filter_map(|(k, v)| {
                let text = match v {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((k.clone(), text))
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
