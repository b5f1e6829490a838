//! Flat key-value persistence for todos and the theme preference.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use webcli_types::error::{Result, WebCliError};

/// Key holding the todo list (JSON array of `{text, done}`).
pub const TODO_KEY: &str = "cli-todos";

/// Key holding the selected theme (JSON theme object).
pub const THEME_KEY: &str = "cli-theme";

/// String-to-string store keyed by fixed identifiers.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file, rewritten on every change.
///
/// A missing file opens as an empty store. A corrupt file is logged and
/// also treated as empty; the next write replaces it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("ignoring corrupt store {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("cannot read store {}: {e}", path.display());
                BTreeMap::new()
            },
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, text).map_err(|e| {
            log::warn!("cannot write store {}: {e}", self.path.display());
            WebCliError::Store(format!("{}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
