//! Preference storage
//!
//! Flat string key-value pairs, read on demand and written on save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistent string key-value storage
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);

    /// Persist pending writes
    fn flush(&mut self) -> SettingsResult<()>;
}

/// Preferences kept as a TOML table of strings
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();

        let values = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| SettingsError::Parse {
                path: path.clone(),
                error: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SettingsError::Io(e)),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string(&self.values)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = ?self.path, "Preferences saved");
        Ok(())
    }
}

/// Volatile store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> SettingsResult<()> {
        Ok(())
    }
}

/// Preference storage errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse preferences {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(String),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),
}

/// Result type alias for preference operations
pub type SettingsResult<T> = Result<T, SettingsError>;
