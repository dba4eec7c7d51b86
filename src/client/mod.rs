//! Data source abstraction for the entity REST backend.
//!
//! The browser state never performs I/O itself; it asks a [`DataSource`] for
//! kinds and entity pages through the fetch worker. Two implementations:
//! - [`HttpDataSource`]: the real backend over HTTP
//! - [`MockDataSource`]: in-memory backend for tests and `--demo`

mod cancel;
mod http;
pub mod mock;
mod path;

pub use cancel::CancelToken;
pub use http::HttpDataSource;
pub use mock::MockDataSource;
pub use path::ApiPathBuilder;

use thiserror::Error;

use crate::browser::SortSpec;
use crate::model::EntitiesPage;

/// Path of the kinds endpoint.
pub const KINDS_PATH: &str = "/api/kinds";

/// Default page size requested from the entities endpoint.
pub const DEFAULT_LIMIT: usize = 50;

/// Errors produced by data sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Http(String),

    /// Non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Request was superseded before it completed.
    #[error("request cancelled")]
    Cancelled,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Failure injected by the mock backend.
    #[error("{0}")]
    Injected(String),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Parameters of one entities request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityQuery {
    pub kind: String,
    /// `None` = server-default order.
    pub sort: Option<SortSpec>,
    /// `None` = first page.
    pub cursor: Option<String>,
    pub limit: usize,
}

impl EntityQuery {
    pub fn first_page(kind: impl Into<String>, sort: Option<SortSpec>, limit: usize) -> Self {
        Self {
            kind: kind.into(),
            sort,
            cursor: None,
            limit,
        }
    }

    /// Request path relative to the backend base URL.
    ///
    /// All four query arguments are always present:
    /// `/api/entities/order/?sortKey=&sortDirection=&cursor=&limit=50`.
    pub fn path(&self) -> String {
        let base = format!("/api/entities/{}/", path::encode(&self.kind));
        ApiPathBuilder::new(base)
            .opt_arg("sortKey", self.sort.as_ref().map(|s| s.field.as_str()))
            .opt_arg("sortDirection", self.sort.as_ref().map(|s| s.direction))
            .opt_arg("cursor", self.cursor.as_deref())
            .arg("limit", self.limit)
            .build()
    }
}

/// Abstraction over the entity backend.
///
/// Implementations must be usable from the fetch worker thread, hence
/// `Send + Sync`. Both calls block until the response is complete and should
/// check `cancel` before doing expensive work.
pub trait DataSource: Send + Sync {
    /// Lists entity kind names.
    fn fetch_kinds(&self, cancel: &CancelToken) -> Result<Vec<String>, ClientError>;

    /// Fetches one page of entities.
    fn fetch_entities(
        &self,
        query: &EntityQuery,
        cancel: &CancelToken,
    ) -> Result<EntitiesPage, ClientError>;

    /// Short human-readable description (base URL, "demo").
    fn describe(&self) -> String;
}
