use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;

use super::{KeyValueStore, StoreError};

const STORE_FILE: &str = "best_times.json";

/// Key-value store persisted as a single JSON object on disk.
///
/// Every `set` rewrites the whole file through a `.tmp` sibling and a rename,
/// so a crash mid-write leaves the previous contents intact.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(base_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(base_dir)?;
        let path = base_dir.join(STORE_FILE);
        let entries = load_entries(&path);
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(&self.entries)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Missing file means empty; an unreadable one is logged and treated as empty.
fn load_entries(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring corrupt store {}: {e}", path.display());
            BTreeMap::new()
        }),
        Err(e) => {
            warn!("Cannot read store {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
