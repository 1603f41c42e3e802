use thiserror::Error;

/// A category's remote index failed to load.
///
/// Kept `Clone` so every caller waiting on one shared in-flight load can be
/// handed the outcome. Underlying causes are flattened to strings because
/// transport errors are not cloneable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Network failure or non-success status from the index host.
    #[error("fetch failed for category '{category}': {message}")]
    Fetch { category: String, message: String },

    /// The body was not the expected `{ "data": [...] }` document.
    #[error("index document for category '{category}' is malformed: {message}")]
    Malformed { category: String, message: String },
}

impl LoadError {
    pub fn fetch(category: &str, cause: impl ToString) -> Self {
        Self::Fetch {
            category: category.to_owned(),
            message: cause.to_string(),
        }
    }

    pub fn malformed(category: &str, cause: impl ToString) -> Self {
        Self::Malformed {
            category: category.to_owned(),
            message: cause.to_string(),
        }
    }
}

/// `filter`/`first_match` was called before the index finished loading.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("category '{category}' searched before its index loaded")]
pub struct NotLoadedError {
    pub category: String,
}

/// Errors surfaced by the catalog's name-routed operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    NotLoaded(#[from] NotLoadedError),
}
