//! Hosted table-store client over HTTPS.
//!
//! # Responsibility
//! - Map `fetch_all` / `insert` onto the store's REST table endpoints.
//! - Translate transport, status and body failures into `StoreFailure`.
//!
//! # Invariants
//! - Every request carries the anon key as `apikey` and bearer token.
//! - No retry and no client-side timeout beyond reqwest defaults.

use crate::config::StoreConfig;
use crate::logging::sanitize_message;
use crate::model::record::{Collection, Record};
use crate::store::{FetchError, FetchResult, RecordStore, StoreFailure, WriteError, WriteResult};
use log::{debug, error};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::{Map, Value};
use std::time::Instant;
use url::Url;

const REST_PATH: [&str; 2] = ["rest", "v1"];
const MAX_ERROR_BODY_CHARS: usize = 200;

/// REST client for one hosted project.
pub struct RestRecordStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestRecordStore {
    /// Builds a client for `base_url` (project root, without `/rest/v1`).
    ///
    /// # Errors
    /// - `Transport` when the HTTP client cannot be constructed.
    /// - `Unavailable` when `base_url` cannot carry path segments.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, StoreFailure> {
        if base_url.cannot_be_a_base() {
            return Err(StoreFailure::Unavailable(format!(
                "store url `{base_url}` cannot be used as a base"
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StoreFailure::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreFailure> {
        Self::new(config.url.clone(), config.api_key.clone())
    }

    /// Returns the table endpoint for one collection.
    pub fn collection_url(&self, collection: &Collection) -> Result<Url, StoreFailure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreFailure::Unavailable(format!(
                    "store url `{}` cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(REST_PATH)
            .push(collection.as_str());
        url.set_query(None);
        Ok(url)
    }

    async fn fetch_rows(&self, collection: &Collection) -> Result<Vec<Record>, StoreFailure> {
        let url = self.collection_url(collection)?;
        let response = self
            .client
            .get(url)
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| StoreFailure::Transport(err.to_string()))?;

        let body = success_body(response).await?;
        let rows: Value =
            serde_json::from_str(&body).map_err(|err| StoreFailure::Decode(err.to_string()))?;
        Record::list_from_rows(rows).map_err(|err| StoreFailure::Decode(err.to_string()))
    }

    async fn insert_row(
        &self,
        collection: &Collection,
        row: &Map<String, Value>,
    ) -> Result<(), StoreFailure> {
        let url = self.collection_url(collection)?;
        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await
            .map_err(|err| StoreFailure::Transport(err.to_string()))?;

        success_body(response).await.map(|_| ())
    }
}

impl RecordStore for RestRecordStore {
    async fn fetch_all(&self, collection: &Collection) -> FetchResult<Vec<Record>> {
        let started_at = Instant::now();
        debug!("event=store_fetch module=store status=start collection={collection}");

        match self.fetch_rows(collection).await {
            Ok(records) => {
                debug!(
                    "event=store_fetch module=store status=ok collection={} count={} duration_ms={}",
                    collection,
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(cause) => {
                error!(
                    "event=store_fetch module=store status=error collection={} duration_ms={} error={}",
                    collection,
                    started_at.elapsed().as_millis(),
                    cause
                );
                Err(FetchError::new(collection, cause))
            }
        }
    }

    async fn insert(&self, collection: &Collection, row: &Map<String, Value>) -> WriteResult<()> {
        let started_at = Instant::now();
        debug!("event=store_insert module=store status=start collection={collection}");

        match self.insert_row(collection, row).await {
            Ok(()) => {
                debug!(
                    "event=store_insert module=store status=ok collection={} duration_ms={}",
                    collection,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(cause) => {
                error!(
                    "event=store_insert module=store status=error collection={} duration_ms={} error={}",
                    collection,
                    started_at.elapsed().as_millis(),
                    cause
                );
                Err(WriteError::new(collection, cause))
            }
        }
    }
}

async fn success_body(response: Response) -> Result<String, StoreFailure> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| StoreFailure::Transport(err.to_string()))?;

    if !status.is_success() {
        return Err(StoreFailure::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }
    Ok(body)
}

fn truncate_body(body: &str) -> String {
    sanitize_message(body, MAX_ERROR_BODY_CHARS)
}

#[cfg(test)]
mod tests {
    use super::{truncate_body, RestRecordStore};
    use crate::model::record::Collection;
    use url::Url;

    #[test]
    fn collection_url_appends_rest_path() {
        let store =
            RestRecordStore::new(Url::parse("https://demo.example.co/").unwrap(), "key").unwrap();
        let url = store
            .collection_url(&Collection::new("contact-form"))
            .unwrap();
        assert_eq!(url.as_str(), "https://demo.example.co/rest/v1/contact-form");
    }

    #[test]
    fn collection_url_escapes_collection_names() {
        let store =
            RestRecordStore::new(Url::parse("https://demo.example.co").unwrap(), "key").unwrap();
        let url = store
            .collection_url(&Collection::new("tech stack"))
            .unwrap();
        assert_eq!(url.as_str(), "https://demo.example.co/rest/v1/tech%20stack");
    }

    #[test]
    fn non_base_urls_are_rejected() {
        let result = RestRecordStore::new(Url::parse("mailto:me@example.com").unwrap(), "key");
        assert!(result.is_err());
    }

    #[test]
    fn error_bodies_are_flattened_and_capped() {
        let long = format!("line1\nline2{}", "x".repeat(400));
        let truncated = truncate_body(&long);
        assert!(!truncated.contains('\n'));
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
