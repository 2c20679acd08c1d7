use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use draftswipe_core::config::{self, Config, ConfigError, ScoringFormat};
use draftswipe_core::{Position, Rating};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fantasy football draft prep: values, tiers, round plans and swipe insights")]
pub struct Cli {
    /// Config file (defaults to ./draftswipe.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Preference database (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

/// Roster input plus league overrides shared by the pipeline commands.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RosterArgs {
    /// Roster file (.csv or .json)
    #[arg(short, long)]
    pub roster: PathBuf,

    /// Scoring format: std, half or ppr
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<ScoringFormat>,

    /// Your draft slot (1-based)
    #[arg(short, long)]
    pub slot: Option<usize>,

    /// Number of teams in the league
    #[arg(short, long)]
    pub teams: Option<usize>,
}

impl RosterArgs {
    /// Apply the overrides to `config` and re-validate it.
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(format) = self.format {
            config.league.format = format;
        }
        if let Some(slot) = self.slot {
            config.league.draft_slot = slot;
        }
        if let Some(teams) = self.teams {
            config.league.league_size = teams;
        }
        config::validate(config)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Value every player: fantasy points, VORP and auction dollars
    Valuate(RosterArgs),
    /// Group players into tiers by position
    Tiers(RosterArgs),
    /// Round-by-round draft plan
    Plan(RosterArgs),
    /// Preference analytics and GM archetype
    Insights {
        #[command(flatten)]
        roster: RosterArgs,
        /// Restrict the analysis to one position
        #[arg(short, long, value_parser = parse_position)]
        position: Option<Position>,
        /// Number of narratives to return
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Everything above in one document
    Report(RosterArgs),
    /// Rate a player (or clear the rating)
    Rate {
        /// Player id as produced by `valuate`
        #[arg(short, long)]
        player: String,
        /// love, like, meh, pass or clear
        #[arg(short, long, value_parser = parse_rating)]
        rating: RatingChoice,
    },
    /// Merge a JSON object of player id to rating (-1..2) into the store
    ImportPrefs {
        file: PathBuf,
    },
}

/// A rating, or a request to remove one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingChoice {
    Set(Rating),
    Clear,
}

impl RatingChoice {
    pub fn rating(&self) -> Option<Rating> {
        match self {
            RatingChoice::Set(r) => Some(*r),
            RatingChoice::Clear => None,
        }
    }
}

fn parse_format(s: &str) -> Result<ScoringFormat, String> {
    s.parse()
}

fn parse_position(s: &str) -> Result<Position, String> {
    Position::from_str_pos(s).ok_or_else(|| format!("unknown position '{s}'"))
}

fn parse_rating(s: &str) -> Result<RatingChoice, String> {
    if s.eq_ignore_ascii_case("clear") {
        return Ok(RatingChoice::Clear);
    }
    Rating::from_label(s)
        .map(RatingChoice::Set)
        .ok_or_else(|| format!("unknown rating '{s}' (expected love, like, meh, pass or clear)"))
}
