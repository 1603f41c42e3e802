use async_trait::async_trait;
use reqwest::Client;

use crate::error::LoadError;
use crate::model::IndexDocument;
use crate::source::IndexSource;

/// Fetches `<base>/data/<category>.json` from a remote host.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn index_url(&self, category: &str) -> String {
        format!("{}/data/{}.json", self.base_url, category)
    }
}

#[async_trait]
impl IndexSource for HttpSource {
    async fn fetch_index(&self, category: &str) -> Result<IndexDocument, LoadError> {
        let url = self.index_url(category);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| LoadError::fetch(category, &err))?
            .error_for_status()
            .map_err(|err| LoadError::fetch(category, &err))?;

        response
            .json::<IndexDocument>()
            .await
            .map_err(|err| LoadError::malformed(category, &err))
    }
}
