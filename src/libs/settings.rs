//! Key-value settings store holding the baby's profile.
//!
//! A small JSON object kept next to the database. Every change rewrites the
//! whole file through a temporary sibling that is renamed into place, so a
//! crash mid-write leaves either the old or the new file, never a torn one.

use crate::libs::data_storage::DataStorage;
use crate::libs::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const NAME_KEY: &str = "name";
/// Shown wherever the baby's name is needed but none was saved.
pub const DEFAULT_DISPLAY_NAME: &str = "Your baby";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl Settings {
    /// Opens the settings file in the default data directory.
    pub fn new() -> Result<Self> {
        let path = DataStorage::new().get_path(SETTINGS_FILE_NAME)?;
        Self::open(path)
    }

    /// Loads `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.values.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Stores `value` under `key`, overwriting any previous value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        self.persist()
    }

    /// Removes `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let existed = self.values.remove(key).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }

    pub fn name(&self) -> Option<String> {
        self.values
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("name cannot be empty"));
        }
        self.set(NAME_KEY, &name)
    }

    pub fn profile(&self) -> Option<Profile> {
        self.name().map(|name| Profile { name })
    }

    /// The saved name, or "Your baby".
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
