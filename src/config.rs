use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Prompt shown before any category has been selected.
pub const NO_CATEGORY_PLACEHOLDER: &str = "Select a category above ...";

/// Static configuration for one category, supplied once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDefinition {
    /// Unique category id; also names the remote index document.
    pub name: String,
    /// Filename prefix for the per-entry detail pages.
    pub display_prefix: String,
    /// Search box prompt; empty means derive one from the name.
    #[serde(default)]
    pub placeholder: String,
}

impl CategoryDefinition {
    pub fn new(name: &str, display_prefix: &str) -> Self {
        Self {
            name: name.to_owned(),
            display_prefix: display_prefix.to_owned(),
            placeholder: String::new(),
        }
    }

    /// The search box prompt for this category.
    pub fn placeholder(&self) -> String {
        if self.placeholder.is_empty() {
            format!("Search {} ...", self.name)
        } else {
            self.placeholder.clone()
        }
    }
}

/// The built-in category set for the competition results layout.
pub fn default_definitions() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::new("competitors", "c-"),
        CategoryDefinition::new("events", "e-"),
        CategoryDefinition::new("points", "p-"),
    ]
}

/// Load category definitions from a JSON file.
pub fn load_definitions(path: &Path) -> Result<Vec<CategoryDefinition>> {
    let bytes = fs::read(path)?;
    let definitions = serde_json::from_slice(&bytes)?;
    Ok(definitions)
}
