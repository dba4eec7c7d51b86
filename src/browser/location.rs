//! Two-way mapping between browser state and a shareable location string.
//!
//! The location mirrors what the address bar of the web frontend held:
//! `/?kind=order&sortKey=createdAt&sortDirection=asc`.

use url::form_urlencoded;

use super::{SortDirection, SortSpec};
use crate::client::ApiPathBuilder;

const KIND_PARAM: &str = "kind";
const SORT_KEY_PARAM: &str = "sortKey";
const SORT_DIRECTION_PARAM: &str = "sortDirection";

/// Serializable view state: selected kind and active sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub kind: Option<String>,
    pub sort: Option<SortSpec>,
}

impl Location {
    pub fn new(kind: Option<String>, sort: Option<SortSpec>) -> Self {
        Self { kind, sort }
    }

    pub fn for_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            sort: None,
        }
    }

    /// Parses a full URL, a `/?...` path or a bare query string.
    ///
    /// Lenient: unknown parameters are ignored, and a sort is only restored
    /// when both `sortKey` and a valid `sortDirection` are present.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let input = input.split_once('#').map_or(input, |(before, _)| before);
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None if input.starts_with('/') || input.contains("://") => "",
            None => input,
        };

        let mut kind = None;
        let mut sort_key = None;
        let mut sort_direction = None;
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            match name.as_ref() {
                KIND_PARAM if !value.is_empty() => kind = Some(value.into_owned()),
                SORT_KEY_PARAM if !value.is_empty() => sort_key = Some(value.into_owned()),
                SORT_DIRECTION_PARAM => sort_direction = SortDirection::parse(&value),
                _ => {}
            }
        }

        let sort = match (sort_key, sort_direction) {
            (Some(field), Some(direction)) => Some(SortSpec::new(field, direction)),
            _ => None,
        };
        Self { kind, sort }
    }

    /// Renders `/?kind=...[&sortKey=...&sortDirection=...]`, or `/` when empty.
    pub fn to_query_string(&self) -> String {
        let Some(kind) = &self.kind else {
            return "/".to_string();
        };
        let mut builder = ApiPathBuilder::new("/").arg(KIND_PARAM, kind);
        if let Some(sort) = &self.sort {
            builder = builder
                .arg(SORT_KEY_PARAM, &sort.field)
                .arg(SORT_DIRECTION_PARAM, sort.direction);
        }
        builder.build()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
