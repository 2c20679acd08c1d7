// Roster file loading.
//
// The file extension picks the reader: `.csv` for spreadsheet exports,
// `.json` for an array of row objects.

use std::path::{Path, PathBuf};

use draftswipe_football::normalize::{rows_from_csv, rows_from_json, RawRow, RosterError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RosterLoadError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported roster format {extension:?} for {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to parse roster {path}: {source}")]
    Parse {
        path: PathBuf,
        source: RosterError,
    },
}

/// Read raw stat rows from a roster file.
pub fn load_roster_rows(path: &Path) -> Result<Vec<RawRow>, RosterLoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let io_err = |source| RosterLoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parse_err = |source| RosterLoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let rows = match extension.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(io_err)?;
            rows_from_csv(file).map_err(parse_err)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).map_err(io_err)?;
            rows_from_json(&text).map_err(parse_err)?
        }
        _ => {
            return Err(RosterLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    info!("Read {} roster rows from {}", rows.len(), path.display());
    Ok(rows)
}
