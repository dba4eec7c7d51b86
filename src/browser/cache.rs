//! Page cache keyed by (kind, sort, cursor).

use std::collections::HashMap;

use super::SortSpec;
use crate::client::EntityQuery;
use crate::model::EntitiesPage;

/// Identity of a fetched page. Two requests with the same key return the
/// same page for the lifetime of the view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: String,
    pub sort: Option<SortSpec>,
    pub cursor: Option<String>,
}

impl QueryKey {
    pub fn new(kind: impl Into<String>, sort: Option<SortSpec>, cursor: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            sort,
            cursor,
        }
    }

    /// True when both keys address the same (kind, sort) result set.
    pub fn same_view(&self, other: &QueryKey) -> bool {
        self.kind == other.kind && self.sort == other.sort
    }

    pub fn to_query(&self, limit: usize) -> EntityQuery {
        EntityQuery {
            kind: self.kind.clone(),
            sort: self.sort.clone(),
            cursor: self.cursor.clone(),
            limit,
        }
    }
}

#[derive(Debug, Default)]
pub struct PageCache {
    pages: HashMap<QueryKey, EntitiesPage>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&EntitiesPage> {
        self.pages.get(key)
    }

    pub fn insert(&mut self, key: QueryKey, page: EntitiesPage) {
        self.pages.insert(key, page);
    }

    /// Drops every page of `kind`, any sort.
    pub fn invalidate_kind(&mut self, kind: &str) {
        self.pages.retain(|key, _| key.kind != kind);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
