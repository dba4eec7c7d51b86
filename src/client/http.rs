//! HTTP data source backed by a blocking reqwest client.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{CancelToken, ClientError, DataSource, EntityQuery, KINDS_PATH};
use crate::model::{EntitiesPage, KindsResponse};

/// Data source talking to the real backend.
pub struct HttpDataSource {
    client: Client,
    /// Base URL without trailing slash, e.g. `http://localhost:8080`.
    base: String,
}

impl HttpDataSource {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a path relative to the base.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancelToken,
    ) -> Result<T, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let url = self.url_for(path);
        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, concat!("kindview/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| {
                warn!(url = %url, error = %e, "request failed");
                ClientError::from(e)
            })?;

        if cancel.is_cancelled() {
            debug!(url = %url, "dropping response of cancelled request");
            return Err(ClientError::Cancelled);
        }

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "unexpected status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes()?;
        let parsed = serde_json::from_slice(&body).map_err(|e| {
            warn!(url = %url, error = %e, "failed to decode response");
            ClientError::from(e)
        })?;
        debug!(
            url = %url,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request complete"
        );
        Ok(parsed)
    }
}

impl DataSource for HttpDataSource {
    fn fetch_kinds(&self, cancel: &CancelToken) -> Result<Vec<String>, ClientError> {
        let resp: KindsResponse = self.get_json(KINDS_PATH, cancel)?;
        Ok(resp.kinds)
    }

    fn fetch_entities(
        &self,
        query: &EntityQuery,
        cancel: &CancelToken,
    ) -> Result<EntitiesPage, ClientError> {
        self.get_json(&query.path(), cancel)
    }

    fn describe(&self) -> String {
        self.base.clone()
    }
}
