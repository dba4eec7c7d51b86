//! Request path building with percent-encoded query arguments.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Everything except RFC 3986 unreserved characters is encoded.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes a single path segment or query value.
pub(crate) fn encode(value: &str) -> String {
    percent_encode(value.as_bytes(), COMPONENT).to_string()
}

/// Builder for API paths with a query.
///
/// Arguments are always emitted, empty ones included, because the entities
/// endpoint treats `sortKey=` and `cursor=` as "unset".
#[derive(Clone, Debug)]
pub struct ApiPathBuilder {
    url: String,
    separator: char,
}

impl ApiPathBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            url: base.into(),
            separator: '?',
        }
    }

    /// Adds an argument to the query. Name and value are percent-encoded.
    pub fn arg<T: std::fmt::Display>(mut self, name: &str, value: T) -> Self {
        self.url.push(self.separator);
        self.separator = '&';
        self.url.push_str(&encode(name));
        self.url.push('=');
        self.url.push_str(&encode(&value.to_string()));
        self
    }

    /// Adds an optional argument; `None` is emitted as an empty value.
    pub fn opt_arg<T: std::fmt::Display>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.arg(name, value),
            None => self.arg(name, ""),
        }
    }

    pub fn build(self) -> String {
        self.url
    }
}
