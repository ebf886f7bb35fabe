//! Durable storage for shortcut bindings.
//!
//! Persisted state is a JSON array of `{name, key, action, position}`
//! records in `shortcuts.json`. Absence of the file is not an error: it is
//! created empty on first load. Every save is a full-file overwrite made
//! durable by writing a temp file and renaming it over the target.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::binding::ShortcutRecord;

/// Error that can occur when reading or writing the shortcut store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable key-value/file storage boundary for the registry.
pub trait BindingStore: Send {
    fn load(&self) -> Result<Vec<ShortcutRecord>, StoreError>;
    fn save(&self, records: &[ShortcutRecord]) -> Result<(), StoreError>;
}

/// File-backed store for `shortcuts.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.keydeck/shortcuts.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".keydeck"))
            .unwrap_or_else(|| std::env::temp_dir().join("keydeck"))
            .join("shortcuts.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn seed_empty(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "could not create data directory");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, "[]") {
            warn!(path = %self.path.display(), error = %e, "could not seed empty shortcut file");
        } else {
            info!(path = %self.path.display(), "created empty shortcut file");
        }
    }
}

impl BindingStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ShortcutRecord>, StoreError> {
        if !self.path.exists() {
            self.seed_empty();
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let raw: Vec<serde_json::Value> = serde_json::from_str(&content)?;

        // Skip malformed records individually; one bad entry must not take
        // the rest of the collection down with it.
        let mut records = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<ShortcutRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "skipping malformed shortcut record");
                }
            }
        }
        Ok(records)
    }

    fn save(&self, records: &[ShortcutRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(records)?;

        // Write-temp-then-rename so a crash mid-write never leaves a
        // truncated shortcuts.json behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
