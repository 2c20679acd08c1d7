// draftswipe entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only JSON)
// 2. Parse the command line
// 3. Load config and apply command-line overrides
// 4. Open the preference store
// 5. Run the subcommand and print its result as pretty JSON

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use draftswipe_app::cli::{Cli, Command, RosterArgs};
use draftswipe_app::report::{build_report, ranked};
use draftswipe_app::{load_valued_roster, read_text};
use draftswipe_core::config::{self, Config};
use draftswipe_core::store::{default_db_path, PreferenceStore};
use draftswipe_football::analytics::analyze_preferences;
use draftswipe_football::draft_flow::generate_round_targets;
use draftswipe_football::tiers::build_tiers;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let base_config = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    debug!("Config loaded: league={}", base_config.league.name);

    let store = open_store(cli.db.clone(), &base_config)?;

    match cli.command {
        Command::Valuate(args) => {
            let (config, players) = prepare(&args, &base_config)?;
            info!("Valuation complete for {} teams", config.league.league_size);
            emit(&ranked(&players))
        }
        Command::Tiers(args) => {
            let (config, players) = prepare(&args, &base_config)?;
            let prefs = store.load()?;
            emit(&build_tiers(&players, &prefs, &config))
        }
        Command::Plan(args) => {
            let (config, players) = prepare(&args, &base_config)?;
            let prefs = store.load()?;
            let tiers = build_tiers(&players, &prefs, &config);
            emit(&generate_round_targets(&players, &prefs, &tiers, &config))
        }
        Command::Insights {
            roster,
            position,
            count,
        } => {
            let (config, players) = prepare(&roster, &base_config)?;
            let prefs = store.load()?;
            let count = count.unwrap_or(config.analytics.narrative_count);
            emit(&analyze_preferences(&players, &prefs, position, &config.analytics, count))
        }
        Command::Report(args) => {
            let (config, players) = prepare(&args, &base_config)?;
            let prefs = store.load()?;
            emit(&build_report(&players, &prefs, &config))
        }
        Command::Rate { player, rating } => {
            let prefs = store.set_rating(&player, rating.rating())?;
            info!("Stored rating for {} ({} rated)", player, prefs.len());
            emit(&json!({
                "player": player,
                "rating": rating.rating(),
                "rated": prefs.len(),
            }))
        }
        Command::ImportPrefs { file } => {
            let text = read_text(&file)?;
            let prefs = store.import_json(&text)?;
            info!("Imported preferences from {}", file.display());
            emit(&json!({ "rated": prefs.len() }))
        }
    }
}

/// Apply roster overrides to a copy of the config and value the roster.
fn prepare(args: &RosterArgs, base: &Config) -> anyhow::Result<(Config, Vec<draftswipe_football::PlayerRecord>)> {
    let mut config = base.clone();
    args.apply(&mut config).context("invalid command-line override")?;
    let players = load_valued_roster(&args.roster, &config)?;
    Ok((config, players))
}

fn open_store(explicit: Option<PathBuf>, config: &Config) -> anyhow::Result<PreferenceStore> {
    let path = explicit
        .or_else(|| config.storage.db_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(default_db_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let store = PreferenceStore::open(&path.to_string_lossy(), &config.storage.prefs_key)?;
    debug!("Preference store opened at {}", path.display());
    Ok(store)
}

fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Initialize tracing on stderr. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftswipe=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
