// Configuration loading and parsing (draftswipe.toml).
//
// Every section is optional. Anything left out falls back to the reference
// configuration below, so an empty file (or no file at all) is a valid setup
// for a 12-team half-PPR league.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::{PerPosition, ALL_POSITIONS};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "draftswipe.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to encode reference configuration: {0}")]
    Reference(#[from] toml::ser::Error),
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub league: LeagueConfig,
    pub valuation: ValuationConfig,
    pub tiers: TierConfig,
    pub draft: DraftConfig,
    pub analytics: AnalyticsConfig,
    pub storage: StorageConfig,
}

// ---------------------------------------------------------------------------
// [league]
// ---------------------------------------------------------------------------

/// Reception credit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringFormat {
    #[serde(rename = "std")]
    Standard,
    #[serde(rename = "half")]
    HalfPpr,
    #[serde(rename = "ppr")]
    Ppr,
}

impl ScoringFormat {
    /// Points awarded per reception.
    pub fn reception_credit(&self) -> f64 {
        match self {
            ScoringFormat::Standard => 0.0,
            ScoringFormat::HalfPpr => 0.5,
            ScoringFormat::Ppr => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringFormat::Standard => "std",
            ScoringFormat::HalfPpr => "half",
            ScoringFormat::Ppr => "ppr",
        }
    }
}

impl FromStr for ScoringFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "std" | "standard" => Ok(ScoringFormat::Standard),
            "half" | "half-ppr" | "half_ppr" => Ok(ScoringFormat::HalfPpr),
            "ppr" | "full" => Ok(ScoringFormat::Ppr),
            other => Err(format!("unknown scoring format '{other}' (expected std, half or ppr)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub name: String,
    pub league_size: usize,
    /// The user's 1-based first-round pick.
    pub draft_slot: usize,
    pub format: ScoringFormat,
    pub budget_per_team: u32,
    /// Fraction of the league-wide budget handed out by VORP share.
    pub pool_fraction: f64,
    /// Rounds in the draft plan. Validation pins this to `PLAN_ROUNDS`; the
    /// round tables in `[draft]` are sized for it.
    pub rounds: u32,
}

/// Number of rounds every draft plan covers.
pub const PLAN_ROUNDS: u32 = 16;

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            name: "My League".into(),
            league_size: 12,
            draft_slot: 1,
            format: ScoringFormat::HalfPpr,
            budget_per_team: 200,
            pool_fraction: 0.85,
            rounds: PLAN_ROUNDS,
        }
    }
}

// ---------------------------------------------------------------------------
// [valuation]
// ---------------------------------------------------------------------------

/// League size the replacement slot counts are expressed against.
pub const BASE_LEAGUE_SIZE: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Starters per position in a 12-team league. Scaled by league size to
    /// find the replacement-level index.
    pub replacement_slots: PerPosition<usize>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            replacement_slots: PerPosition {
                qb: 12,
                rb: 30,
                wr: 40,
                te: 12,
                k: 12,
                dst: 12,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// [tiers]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// The first player at or below this VORP opens the terminal tier.
    pub basement_vorp: f64,
    pub min_size: PerPosition<usize>,
    pub max_size: PerPosition<usize>,
    /// VORP drop between neighbours that starts a new tier.
    pub cliff: PerPosition<f64>,
    /// Position-list indices where a new tier may start (after two tiers).
    pub natural_breaks: PerPosition<Vec<usize>>,
    /// A tier gap of at least `chasm_multiplier * cliff` is a chasm.
    pub chasm_multiplier: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        TierConfig {
            basement_vorp: -10.0,
            min_size: PerPosition {
                qb: 3,
                rb: 3,
                wr: 3,
                te: 3,
                k: 3,
                dst: 3,
            },
            max_size: PerPosition {
                qb: 7,
                rb: 12,
                wr: 15,
                te: 7,
                k: 8,
                dst: 8,
            },
            cliff: PerPosition {
                qb: 15.0,
                rb: 14.0,
                wr: 13.0,
                te: 10.0,
                k: 5.0,
                dst: 5.0,
            },
            natural_breaks: PerPosition {
                qb: vec![6, 12, 18],
                rb: vec![12, 24, 36],
                wr: vec![12, 24, 36, 48],
                te: vec![6, 12, 18],
                k: vec![],
                dst: vec![],
            },
            chasm_multiplier: 1.5,
        }
    }
}

// ---------------------------------------------------------------------------
// [draft]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Target pools smaller than this are backfilled with unrated players.
    pub min_target_pool: usize,
    /// Unrated players at or above these point totals are always planned for.
    pub elite_cutoffs: PerPosition<f64>,
    /// Players above this many points are never estimated later than
    /// `clamp_max_round`.
    pub clamp_points: f64,
    pub clamp_max_round: u32,
    /// Starting-lineup slots per position; below this count the position
    /// still has an unmet need.
    pub starter_needs: PerPosition<usize>,
    /// Position-rank ceilings per round: a player whose position rank is
    /// `<= table[r]` goes in round `r + 1`. Ranks past the table end land in
    /// the final round.
    pub rank_rounds: PerPosition<Vec<usize>>,
    /// Candidates are considered within this many rounds of their estimate.
    pub round_window: u32,
    pub weights: DraftWeights,
}

/// Score and priority weights for round-by-round recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftWeights {
    pub preference: f64,
    pub adp_value: f64,
    pub need_bonus: f64,
    pub elite_bonus: f64,
    pub elite_max_round: u32,
    pub elite_points: f64,
    pub late_penalty: f64,
    pub reach_penalty: f64,
    pub tier_break_bonus: f64,
    pub chasm_bonus: f64,
    /// Priority bonus when a position has at most 3 candidates in the window.
    pub scarce_bonus: f64,
    /// Priority bonus when a position has at most 6 candidates in the window.
    pub thin_bonus: f64,
}

impl Default for DraftWeights {
    fn default() -> Self {
        DraftWeights {
            preference: 100.0,
            adp_value: 20.0,
            need_bonus: 30.0,
            elite_bonus: 40.0,
            elite_max_round: 6,
            elite_points: 200.0,
            late_penalty: 50.0,
            reach_penalty: 10.0,
            tier_break_bonus: 25.0,
            chasm_bonus: 20.0,
            scarce_bonus: 15.0,
            thin_bonus: 5.0,
        }
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            min_target_pool: 60,
            elite_cutoffs: PerPosition {
                qb: 280.0,
                rb: 200.0,
                wr: 200.0,
                te: 150.0,
                k: 9999.0,
                dst: 9999.0,
            },
            clamp_points: 250.0,
            clamp_max_round: 2,
            starter_needs: PerPosition {
                qb: 1,
                rb: 2,
                wr: 3,
                te: 1,
                k: 1,
                dst: 1,
            },
            rank_rounds: PerPosition {
                qb: vec![0, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21, 23, 25, 27, 30],
                rb: vec![5, 12, 18, 24, 28, 32, 36, 40, 44, 48, 52, 56, 60, 64, 68, 72],
                wr: vec![5, 13, 20, 27, 33, 38, 43, 48, 53, 58, 63, 68, 72, 76, 80, 84],
                te: vec![0, 1, 2, 3, 5, 7, 9, 11, 12, 14, 16, 18, 20, 22, 24, 26],
                k: vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 3, 6, 12],
                dst: vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 4, 7, 12],
            },
            round_window: 1,
            weights: DraftWeights::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// [analytics]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Point totals above which a liked player counts as an elite target.
    pub elite_points: PerPosition<f64>,
    pub cheap_max_auction: u32,
    pub premium_min_auction: u32,
    /// Loved players below this fraction of their position's rated mean are
    /// sleepers.
    pub sleeper_ratio: f64,
    pub narrative_count: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            elite_points: PerPosition {
                qb: 280.0,
                rb: 200.0,
                wr: 200.0,
                te: 150.0,
                k: 9999.0,
                dst: 9999.0,
            },
            cheap_max_auction: 5,
            premium_min_auction: 20,
            sleeper_ratio: 0.8,
            narrative_count: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// [storage]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path. `None` uses the platform data directory.
    pub db_path: Option<String>,
    /// Versioned key the preference map is stored under.
    pub prefs_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            db_path: None,
            prefs_key: crate::store::PREFS_STORAGE_KEY.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate a config document. `path` is only used in errors.
///
/// The document is layered over the reference configuration, so a table may
/// set a single key (`[tiers.cliff]\nQB = 20.0`) and keep every other value.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let parse_error = |source: toml::de::Error| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    };
    let overrides: toml::Table = toml::from_str(text).map_err(parse_error)?;

    let mut merged = toml::Value::try_from(Config::default())?;
    if let toml::Value::Table(base) = &mut merged {
        merge_tables(base, overrides);
    }
    let config: Config = merged.try_into().map_err(parse_error)?;
    validate(&config)?;
    Ok(config)
}

/// Recursively overlay `overrides` onto `base`. Nested tables merge key by
/// key; any other value (arrays included) replaces the base value outright.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(nested) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, nested),
                _ => {
                    base.insert(key, toml::Value::Table(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Load and validate configuration from an explicit file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    parse_config(&text, path)
}

/// Resolve the configuration for the binary.
///
/// An explicit path must exist. Without one, `./draftswipe.toml` is used when
/// present and the built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }
    let config = Config::default();
    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

/// Check cross-field constraints. Also used after CLI overrides.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    if league.league_size == 0 {
        return Err(invalid("league.league_size", "must be greater than 0"));
    }
    if league.draft_slot == 0 || league.draft_slot > league.league_size {
        return Err(invalid(
            "league.draft_slot",
            format!(
                "must be between 1 and league_size ({}), got {}",
                league.league_size, league.draft_slot
            ),
        ));
    }
    if league.budget_per_team == 0 {
        return Err(invalid("league.budget_per_team", "must be greater than 0"));
    }
    if !(0.0..=1.0).contains(&league.pool_fraction) {
        return Err(invalid(
            "league.pool_fraction",
            format!("must be between 0.0 and 1.0 inclusive, got {}", league.pool_fraction),
        ));
    }
    if league.rounds != PLAN_ROUNDS {
        return Err(invalid(
            "league.rounds",
            format!("draft plans cover exactly {PLAN_ROUNDS} rounds, got {}", league.rounds),
        ));
    }

    let tiers = &config.tiers;
    for pos in ALL_POSITIONS {
        let min = *tiers.min_size.get(pos);
        let max = *tiers.max_size.get(pos);
        if min == 0 {
            return Err(invalid(format!("tiers.min_size.{pos}"), "must be > 0"));
        }
        if max < min {
            return Err(invalid(
                format!("tiers.max_size.{pos}"),
                format!("must be >= min_size ({min}), got {max}"),
            ));
        }
        let cliff = *tiers.cliff.get(pos);
        if cliff <= 0.0 {
            return Err(invalid(format!("tiers.cliff.{pos}"), format!("must be > 0, got {cliff}")));
        }
    }
    if tiers.chasm_multiplier < 1.0 {
        return Err(invalid(
            "tiers.chasm_multiplier",
            format!("must be >= 1.0, got {}", tiers.chasm_multiplier),
        ));
    }

    for (pos, table) in config.draft.rank_rounds.iter() {
        if table.windows(2).any(|w| w[1] < w[0]) {
            return Err(invalid(
                format!("draft.rank_rounds.{pos}"),
                "rank ceilings must be non-decreasing",
            ));
        }
    }
    if config.draft.clamp_max_round == 0 {
        return Err(invalid("draft.clamp_max_round", "must be greater than 0"));
    }

    let analytics = &config.analytics;
    if !(0.0..=1.0).contains(&analytics.sleeper_ratio) {
        return Err(invalid(
            "analytics.sleeper_ratio",
            format!("must be between 0.0 and 1.0 inclusive, got {}", analytics.sleeper_ratio),
        ));
    }

    if config.storage.prefs_key.trim().is_empty() {
        return Err(invalid("storage.prefs_key", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
