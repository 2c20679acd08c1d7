// SQLite persistence for swipe preferences.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::preferences::{PreferenceMap, Rating};

/// Schema version of the stored preference envelope.
pub const PREFS_SCHEMA_VERSION: u32 = 3;

/// Storage key for the current schema. The version is part of the name so an
/// older client's data never gets read as the current shape.
pub const PREFS_STORAGE_KEY: &str = "draftswipe.prefs.v3";

/// Stored JSON shape.
#[derive(Debug, Serialize, Deserialize)]
struct PreferenceEnvelope {
    version: u32,
    ratings: serde_json::Value,
}

/// SQLite-backed key-value store for preference maps.
pub struct PreferenceStore {
    conn: Mutex<Connection>,
    key: String,
}

impl PreferenceStore {
    /// Open (or create) a database at `path` and ensure the table exists.
    /// Pass `":memory:"` for an ephemeral database (useful for tests).
    pub fn open(path: &str, key: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open preference database at {path}"))?;

        conn.execute_batch("PRAGMA busy_timeout = 5000;")
            .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )
        .context("failed to create preference schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
            key: key.to_string(),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("preference database mutex poisoned")
    }

    /// The storage key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the preference map.
    ///
    /// A missing key, unparseable JSON, or an envelope from another schema
    /// version all yield an empty map.
    pub fn load(&self) -> Result<PreferenceMap> {
        let raw: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query preferences")?;

        let Some(raw) = raw else {
            debug!("no stored preferences under '{}'", self.key);
            return Ok(PreferenceMap::new());
        };

        let envelope: PreferenceEnvelope = match serde_json::from_str(&raw) {
            Ok(env) => env,
            Err(e) => {
                warn!("stored preferences under '{}' are unreadable ({}); ignoring", self.key, e);
                return Ok(PreferenceMap::new());
            }
        };

        if envelope.version != PREFS_SCHEMA_VERSION {
            warn!(
                "stored preferences under '{}' have schema v{} (expected v{}); ignoring",
                self.key, envelope.version, PREFS_SCHEMA_VERSION
            );
            return Ok(PreferenceMap::new());
        }

        Ok(PreferenceMap::from_json_value(&envelope.ratings))
    }

    /// Replace the stored map.
    pub fn save(&self, prefs: &PreferenceMap) -> Result<()> {
        let envelope = PreferenceEnvelope {
            version: PREFS_SCHEMA_VERSION,
            ratings: prefs.to_json_value(),
        };
        let json_str =
            serde_json::to_string(&envelope).context("failed to serialize preferences")?;
        let now = chrono::Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![self.key, json_str, now],
            )
            .context("failed to save preferences")?;
        Ok(())
    }

    /// Set or clear (`None`) a single player's rating.
    pub fn set_rating(&self, player_id: &str, rating: Option<Rating>) -> Result<PreferenceMap> {
        let mut prefs = self.load()?;
        match rating {
            Some(r) => prefs.set(player_id, r),
            None => {
                prefs.remove(player_id);
            }
        }
        self.save(&prefs)?;
        Ok(prefs)
    }

    /// Merge a raw `{ "id": int }` JSON document into the stored map.
    /// Returns the merged map.
    pub fn import_json(&self, text: &str) -> Result<PreferenceMap> {
        let value: serde_json::Value =
            serde_json::from_str(text).context("preference import is not valid JSON")?;
        let incoming = PreferenceMap::from_json_value(&value);
        let mut prefs = self.load()?;
        for (id, rating) in incoming.iter() {
            prefs.set(id, rating);
        }
        self.save(&prefs)?;
        Ok(prefs)
    }

    /// Remove the stored map entirely.
    pub fn clear(&self) -> Result<()> {
        self.conn()
            .execute("DELETE FROM preferences WHERE key = ?1", params![self.key])
            .context("failed to clear preferences")?;
        Ok(())
    }

    /// Last write time of the stored map, if any.
    pub fn updated_at(&self) -> Result<Option<String>> {
        self.conn()
            .query_row(
                "SELECT updated_at FROM preferences WHERE key = ?1",
                params![self.key],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query preference timestamp")
    }
}

/// Default database location: the platform data directory, or the working
/// directory when no home directory can be resolved.
pub fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "draftswipe")
        .map(|dirs| dirs.data_dir().join("prefs.db"))
        .unwrap_or_else(|| PathBuf::from("draftswipe.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> PreferenceStore {
        PreferenceStore::open(":memory:", PREFS_STORAGE_KEY).expect("in-memory store should open")
    }

    fn write_raw(store: &PreferenceStore, key: &str, value: &str) {
        store
            .conn()
            .execute(
                "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?1, ?2, 'now')",
                params![key, value],
            )
            .unwrap();
    }

    #[test]
    fn load_empty_when_nothing_stored() {
        let store = test_store();
        assert!(store.load().unwrap().is_empty());
        assert!(store.updated_at().unwrap().is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let store = test_store();
        let mut prefs = PreferenceMap::new();
        prefs.set("a", Rating::Love);
        prefs.set("b", Rating::Pass);
        store.save(&prefs).unwrap();

        assert_eq!(store.load().unwrap(), prefs);
        assert!(store.updated_at().unwrap().is_some());
    }

    #[test]
    fn set_rating_and_clear_single_player() {
        let store = test_store();
        store.set_rating("a", Some(Rating::Like)).unwrap();
        store.set_rating("b", Some(Rating::Meh)).unwrap();
        let prefs = store.set_rating("a", None).unwrap();
        assert_eq!(prefs.get("a"), None);
        assert_eq!(prefs.get("b"), Some(Rating::Meh));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn schema_version_mismatch_is_no_preferences() {
        let store = test_store();
        write_raw(&store, PREFS_STORAGE_KEY, r#"{"version":2,"ratings":{"a":2}}"#);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn unreadable_value_is_no_preferences() {
        let store = test_store();
        write_raw(&store, PREFS_STORAGE_KEY, "{not json");
        assert!(store.load().unwrap().is_empty());

        write_raw(&store, PREFS_STORAGE_KEY, r#"{"a":2}"#);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn other_keys_are_not_read() {
        let store = test_store();
        write_raw(&store, "draftswipe.prefs.v2", r#"{"version":3,"ratings":{"a":2}}"#);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn invalid_ratings_are_dropped_on_load() {
        let store = test_store();
        write_raw(
            &store,
            PREFS_STORAGE_KEY,
            r#"{"version":3,"ratings":{"a":2,"b":9}}"#,
        );
        let prefs = store.load().unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs.get("a"), Some(Rating::Love));
    }

    #[test]
    fn import_merges_into_existing() {
        let store = test_store();
        store.set_rating("a", Some(Rating::Pass)).unwrap();
        let merged = store.import_json(r#"{"a": 2, "c": 1}"#).unwrap();
        assert_eq!(merged.get("a"), Some(Rating::Love));
        assert_eq!(merged.get("c"), Some(Rating::Like));
        assert_eq!(store.load().unwrap(), merged);
    }

    #[test]
    fn import_rejects_invalid_json() {
        let store = test_store();
        assert!(store.import_json("not json").is_err());
    }

    #[test]
    fn clear_removes_everything() {
        let store = test_store();
        store.set_rating("a", Some(Rating::Love)).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
