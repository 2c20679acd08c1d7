// Library root for the draftswipe binary: roster loading, report assembly
// and the command line.

pub mod cli;
pub mod report;
pub mod roster;

use std::path::Path;

use anyhow::Context;
use draftswipe_core::config::Config;
use draftswipe_football::normalize::normalize_all;
use draftswipe_football::{revaluate, PlayerRecord};
use tracing::info;

/// Load a roster file, normalize it and value it under `config`.
pub fn load_valued_roster(path: &Path, config: &Config) -> anyhow::Result<Vec<PlayerRecord>> {
    let rows = roster::load_roster_rows(path)?;
    let normalized = normalize_all(&rows);
    if normalized.players.is_empty() {
        anyhow::bail!("roster {} has no usable players", path.display());
    }

    let players = revaluate(&normalized.players, config);
    info!(
        "Valued {} players ({} skipped) under {} scoring",
        players.len(),
        normalized.skipped.len(),
        config.league.format.label()
    );
    Ok(players)
}

/// Read a file to a string with the path in the error.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
