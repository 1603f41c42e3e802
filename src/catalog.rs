//! The surface handed to the UI/manager layer: name-routed operations over
//! every configured category.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::CategoryDefinition;
use crate::error::CatalogError;
use crate::index::CategoryIndex;
use crate::model::IndexEntry;
use crate::source::IndexSource;

/// One [`CategoryIndex`] per configured category, all backed by the same
/// source. Indexes live for the life of the catalog; they are re-populated,
/// never destroyed.
pub struct Catalog {
    order: Vec<String>,
    indexes: HashMap<String, CategoryIndex>,
}

impl Catalog {
    pub fn new(definitions: Vec<CategoryDefinition>, source: Arc<dyn IndexSource>) -> Self {
        let mut order = Vec::with_capacity(definitions.len());
        let mut indexes = HashMap::new();
        for definition in definitions {
            order.push(definition.name.clone());
            indexes.insert(
                definition.name.clone(),
                CategoryIndex::new(definition, Arc::clone(&source)),
            );
        }
        Self { order, indexes }
    }

    /// Configured categories, in configuration order.
    pub fn definitions(&self) -> impl Iterator<Item = &CategoryDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.indexes.get(name))
            .map(CategoryIndex::definition)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryIndex> {
        self.indexes.get(name)
    }

    fn index(&self, name: &str) -> Result<&CategoryIndex, CatalogError> {
        self.indexes
            .get(name)
            .ok_or_else(|| CatalogError::UnknownCategory(name.to_owned()))
    }

    pub async fn ensure_loaded(&self, name: &str) -> Result<(), CatalogError> {
        Ok(self.index(name)?.ensure_loaded().await?)
    }

    pub fn filter(&self, name: &str, query: &str) -> Result<Vec<(IndexEntry, bool)>, CatalogError> {
        Ok(self.index(name)?.filter(query)?)
    }

    pub fn first_match(
        &self,
        name: &str,
        query: &str,
    ) -> Result<Option<IndexEntry>, CatalogError> {
        Ok(self.index(name)?.first_match(query)?)
    }

    /// Kick off background loads for every category except the active one.
    ///
    /// Fire-and-forget: failures are logged and swallowed, so a dead category
    /// never takes down its neighbours or the process.
    pub fn prewarm(&self, active: Option<&str>) {
        for (name, index) in &self.indexes {
            if Some(name.as_str()) == active {
                continue;
            }
            let index = index.clone();
            tokio::spawn(async move {
                if let Err(err) = index.ensure_loaded().await {
                    tracing::warn!(
                        category = %index.definition().name,
                        error = %err,
                        "prewarm_failed"
                    );
                }
            });
        }
    }
}
