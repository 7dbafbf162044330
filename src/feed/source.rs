//! Document store access for the record mirror.

use std::collections::BTreeMap;

use crate::record::{DbRecord, RunRecord, sort_records};

/// Errors from fetching the collection.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed payload did not decode: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A source of full-collection snapshots.
///
/// The realtime listener protocol of the hosted store is an external
/// collaborator; this seam only promises "give me everything, again".
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<DbRecord>, FeedError>;
}

/// Polls the store's REST surface: `GET {base}/{collection}.json` returns
/// the whole collection as an id-keyed JSON object (`null` when empty).
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    http: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    #[must_use]
    pub fn new(base_url: &str, collection: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: format!("{}/{collection}.json", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<Vec<DbRecord>, FeedError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let body = response.text().await?;
        let documents: Option<BTreeMap<String, RunRecord>> = serde_json::from_str(&body)?;

        let mut records: Vec<DbRecord> = documents
            .unwrap_or_default()
            .into_iter()
            .map(|(id, mut data)| {
                data.sort_actions();
                DbRecord { id, data }
            })
            .collect();
        sort_records(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url() {
        let source = HttpFeedSource::new("https://store.example.com/", "agentstate");
        assert_eq!(source.url, "https://store.example.com/agentstate.json");
    }
}
