//! Persisted UI state: the last selected category and search text.
//!
//! The core cache never touches this. It exists so a collaborator can restore
//! the previous view after a restart, back-button style.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Key for the last selected category name.
pub const KEY_CATEGORY: &str = "categoryName";
/// Key for the last submitted search text.
pub const KEY_SEARCH: &str = "searchValue";

pub trait UiStateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Ephemeral store for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: HashMap<String, String>,
}

impl UiStateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// JSON map on disk. A missing or corrupt file starts empty; write failures
/// are logged and swallowed, never surfaced to the caller.
pub struct JsonFileStateStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStateStore {
    pub fn open(path: PathBuf) -> Self {
        let values = fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_vec_pretty(&self.values) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %err,
                        "session_write_failed"
                    );
                }
            }
            Err(err) => tracing::warn!(error = %err, "session_encode_failed"),
        }
    }
}

impl UiStateStore for JsonFileStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
        self.persist();
    }
}
