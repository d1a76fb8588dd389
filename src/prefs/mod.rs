/*
 * Durable device-scoped key-value store for the
 * display preferences. Only two keys are ever used.
 */

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use color_eyre::Result;
use eyre::{WrapErr, eyre};
use log::{debug, warn};

pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";

pub trait PreferenceStore: Send + Sync {
  // Reading never fails, a broken store is the same
  // thing as a store with nothing in it.
  fn get(&self, key: &str) -> Option<String>;
  fn set(&self, key: &str, value: &str) -> Result<()>;
}

// Preferences kept in a small JSON object on disk.
pub struct FilePreferences {
  path: PathBuf,
  values: RwLock<HashMap<String, String>>
}

impl FilePreferences {

  pub fn open(path: &str) -> Self {
    let path = PathBuf::from(path);
    let values = match fs::read_to_string(&path) {
      Ok(content) => serde_json::from_str::<HashMap<String, String>>(&content)
        .unwrap_or_else(|e| {
          warn!("Preferences file {} is not valid JSON, ignoring it - {}",
            path.display(), e);
          HashMap::new()
        }),
      Err(e) => {
        debug!("No preferences loaded from {} - {}", path.display(), e);
        HashMap::new()
      }
    };
    Self {
      path,
      values: RwLock::new(values)
    }
  }

}

impl PreferenceStore for FilePreferences {

  fn get(&self, key: &str) -> Option<String> {
    match self.values.read() {
      Ok(values) => values.get(key).cloned(),
      Err(_) => None
    }
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self.values.write()
      .map_err(|_| eyre!("Preferences lock is poisoned"))?;
    values.insert(key.to_string(), value.to_string());
    let json = serde_json::to_string_pretty(&*values)?;
    fs::write(&self.path, json)
      .with_context(|| format!("Writing preferences to {}", self.path.display()))
  }

}

#[derive(Default)]
pub struct MemoryPreferences {
  values: RwLock<HashMap<String, String>>
}

impl MemoryPreferences {
  pub fn new() -> Self {
    Self::default()
  }
}

impl PreferenceStore for MemoryPreferences {

  fn get(&self, key: &str) -> Option<String> {
    self.values.read().ok()
      .and_then(|values| values.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.values.write()
      .map_err(|_| eyre!("Preferences lock is poisoned"))?
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

}
