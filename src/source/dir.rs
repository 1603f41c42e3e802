use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::LoadError;
use crate::model::IndexDocument;
use crate::source::IndexSource;

/// Reads `<root>/<category>.json` from a local directory.
///
/// The deployed site serves the same documents as static files, so a checkout
/// of its data directory works directly. Also the fixture backend for tests.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl IndexSource for DirSource {
    async fn fetch_index(&self, category: &str) -> Result<IndexDocument, LoadError> {
        let path = self.root.join(format!("{category}.json"));
        let bytes = fs::read(&path)
            .await
            .map_err(|err| LoadError::fetch(category, format!("read {}: {err}", path.display())))?;
        serde_json::from_slice(&bytes).map_err(|err| LoadError::malformed(category, &err))
    }
}
