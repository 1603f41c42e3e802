//! Index document sources.
//!
//! One trait, one module per backend: HTTP for the deployed site layout and
//! a plain directory for local data sets and tests.

pub mod dir;
pub mod http;

pub use dir::DirSource;
pub use http::HttpSource;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::model::IndexDocument;

/// A backend that can produce the index document for a named category.
#[async_trait]
pub trait IndexSource: Send + Sync {
    async fn fetch_index(&self, category: &str) -> Result<IndexDocument, LoadError>;
}
