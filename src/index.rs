//! Per-category index cache with lazy, de-duplicated loading.
//!
//! Each [`CategoryIndex`] moves through `Empty -> Loading -> Loaded`. The
//! load is started by the first caller; everyone else arriving while it is
//! in flight awaits the same shared future, so one category never has two
//! outstanding fetches and a slow stale response can never overwrite a
//! newer completed load.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use crate::config::CategoryDefinition;
use crate::error::{LoadError, NotLoadedError};
use crate::matcher;
use crate::model::{IndexEntry, IndexedEntry};
use crate::source::IndexSource;

type SharedLoad = Shared<BoxFuture<'static, Result<(), LoadError>>>;

enum LoadState {
    /// No entries, no request in flight.
    Empty,
    /// A fetch is outstanding; concurrent callers await this same handle.
    Loading(SharedLoad),
    /// Entries in source order, label tokens precomputed.
    Loaded(Arc<Vec<IndexedEntry>>),
}

/// One category's lazily loaded list of entries.
///
/// Cheap to clone; clones share the cache and its in-flight load.
#[derive(Clone)]
pub struct CategoryIndex {
    inner: Arc<Inner>,
}

struct Inner {
    definition: CategoryDefinition,
    source: Arc<dyn IndexSource>,
    state: Mutex<LoadState>,
}

impl CategoryIndex {
    pub fn new(definition: CategoryDefinition, source: Arc<dyn IndexSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                definition,
                source,
                state: Mutex::new(LoadState::Empty),
            }),
        }
    }

    pub fn definition(&self) -> &CategoryDefinition {
        &self.inner.definition
    }

    pub fn is_loaded(&self) -> bool {
        matches!(&*self.inner.state.lock().unwrap(), LoadState::Loaded(_))
    }

    /// Load the category's entries unless they are already cached.
    ///
    /// Concurrent callers coalesce onto a single fetch. A failed load leaves
    /// the index retriable. A load that yields zero entries resolves, but the
    /// index stays eligible for a re-fetch on the next call: an empty list is
    /// treated as never-loaded, not as a valid terminal state.
    pub async fn ensure_loaded(&self) -> Result<(), LoadError> {
        let pending = {
            let mut state = self.inner.state.lock().unwrap();
            match &*state {
                LoadState::Loaded(entries) if !entries.is_empty() => return Ok(()),
                LoadState::Loading(load) => load.clone(),
                LoadState::Empty | LoadState::Loaded(_) => {
                    let load = start_load(Arc::clone(&self.inner));
                    *state = LoadState::Loading(load.clone());
                    load
                }
            }
        };
        pending.await
    }

    /// Visibility of every entry, in source order, for the given query.
    ///
    /// Full re-scan on every call; entry lists are index-page-sized.
    pub fn filter(&self, query: &str) -> Result<Vec<(IndexEntry, bool)>, NotLoadedError> {
        let entries = self.loaded_entries()?;
        Ok(entries
            .iter()
            .map(|indexed| {
                (
                    indexed.entry.clone(),
                    matcher::matches(query, &indexed.tokens),
                )
            })
            .collect())
    }

    /// The earliest entry in source order matching the query, if any.
    pub fn first_match(&self, query: &str) -> Result<Option<IndexEntry>, NotLoadedError> {
        let entries = self.loaded_entries()?;
        Ok(entries
            .iter()
            .find(|indexed| matcher::matches(query, &indexed.tokens))
            .map(|indexed| indexed.entry.clone()))
    }

    fn loaded_entries(&self) -> Result<Arc<Vec<IndexedEntry>>, NotLoadedError> {
        match &*self.inner.state.lock().unwrap() {
            LoadState::Loaded(entries) => Ok(Arc::clone(entries)),
            _ => Err(NotLoadedError {
                category: self.inner.definition.name.clone(),
            }),
        }
    }
}

fn start_load(inner: Arc<Inner>) -> SharedLoad {
    async move {
        let result = fetch_entries(&inner).await;
        let mut state = inner.state.lock().unwrap();
        match result {
            Ok(entries) => {
                tracing::info!(
                    category = %inner.definition.name,
                    entries = entries.len(),
                    "index_load"
                );
                *state = LoadState::Loaded(entries);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    category = %inner.definition.name,
                    error = %err,
                    "index_load_failed"
                );
                *state = LoadState::Empty;
                Err(err)
            }
        }
    }
    .boxed()
    .shared()
}

async fn fetch_entries(inner: &Inner) -> Result<Arc<Vec<IndexedEntry>>, LoadError> {
    let document = inner.source.fetch_index(&inner.definition.name).await?;
    let entries = document
        .data
        .into_iter()
        .map(|row| IndexedEntry::new(&inner.definition, row))
        .collect();
    Ok(Arc::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::model::{IndexDocument, IndexRow};

    type Scripted = Result<Vec<(&'static str, &'static str)>, &'static str>;

    struct StubSource {
        responses: Mutex<VecDeque<Scripted>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubSource {
        fn new(responses: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }

        fn gated(responses: Vec<Scripted>, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IndexSource for StubSource {
        async fn fetch_index(&self, category: &str) -> Result<IndexDocument, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted response");
            match next {
                Ok(rows) => Ok(IndexDocument {
                    data: rows
                        .into_iter()
                        .map(|(k, v)| IndexRow {
                            k: k.into(),
                            v: v.into(),
                        })
                        .collect(),
                }),
                Err(message) => Err(LoadError::fetch(category, message)),
            }
        }
    }

    fn competitors(source: Arc<StubSource>) -> CategoryIndex {
        CategoryIndex::new(CategoryDefinition::new("competitors", "c-"), source)
    }

    #[tokio::test]
    async fn second_sequential_load_is_a_no_op() {
        let source = StubSource::new(vec![Ok(vec![("07", "John Smith")])]);
        let index = competitors(source.clone());

        index.ensure_loaded().await.unwrap();
        index.ensure_loaded().await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(index.is_loaded());
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let gate = Arc::new(Notify::new());
        let source = StubSource::gated(vec![Ok(vec![("07", "John Smith")])], gate.clone());
        let index = competitors(source.clone());

        let first = tokio::spawn({
            let index = index.clone();
            async move { index.ensure_loaded().await }
        });
        let second = tokio::spawn({
            let index = index.clone();
            async move { index.ensure_loaded().await }
        });

        // Let both tasks reach the cache before releasing the fetch.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retriable() {
        let source = StubSource::new(vec![Err("connection refused"), Ok(vec![("07", "John Smith")])]);
        let index = competitors(source.clone());

        let err = index.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
        assert!(!index.is_loaded());

        index.ensure_loaded().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert!(index.is_loaded());
    }

    #[tokio::test]
    async fn empty_document_is_refetched() {
        let source = StubSource::new(vec![Ok(vec![]), Ok(vec![("07", "John Smith")])]);
        let index = competitors(source.clone());

        index.ensure_loaded().await.unwrap();
        assert!(index.is_loaded());
        assert!(index.filter("").unwrap().is_empty());

        index.ensure_loaded().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(index.filter("smith").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn searching_before_load_is_an_error() {
        let source = StubSource::new(vec![]);
        let index = competitors(source);

        let err = index.filter("smith").unwrap_err();
        assert_eq!(err.category, "competitors");
        assert!(index.first_match("smith").is_err());
    }

    #[tokio::test]
    async fn filter_reports_visibility_in_source_order() {
        let source = StubSource::new(vec![Ok(vec![("07", "John Smith"), ("12", "Jane Doe")])]);
        let index = competitors(source);
        index.ensure_loaded().await.unwrap();

        let rows = index.filter("smith").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0.label, "John Smith");
        assert!(rows[0].1);
        assert_eq!(rows[1].0.label, "Jane Doe");
        assert!(!rows[1].1);
    }

    #[tokio::test]
    async fn first_match_returns_earliest_entry() {
        let source = StubSource::new(vec![Ok(vec![("1", "Alpha"), ("2", "Alphabet")])]);
        let index = competitors(source);
        index.ensure_loaded().await.unwrap();

        let hit = index.first_match("alph").unwrap().unwrap();
        assert_eq!(hit.key, "1");
        assert_eq!(hit.label, "Alpha");

        assert!(index.first_match("zzz").unwrap().is_none());
    }

    #[tokio::test]
    async fn entries_expose_derived_hrefs() {
        let source = StubSource::new(vec![Ok(vec![("07", "John Smith")])]);
        let index = competitors(source);
        index.ensure_loaded().await.unwrap();

        let hit = index.first_match("john").unwrap().unwrap();
        assert_eq!(hit.href, "data/competitors/c-07.html");
    }
}
