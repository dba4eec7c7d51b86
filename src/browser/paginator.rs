//! Cursor-based infinite pagination bookkeeping.
//!
//! Pages are append-only. Moving to an already fetched page is a local index
//! change; moving past the last fetched page requires a fetch with the last
//! page's cursor.

use crate::model::EntitiesPage;

/// State of the "next page" fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Idle,
    FetchingNext,
    /// Last next-page fetch failed. Retry by requesting next again.
    Error(String),
}

/// Outcome of a "next" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Moved to an already fetched page.
    Moved,
    /// Caller must fetch the page at this cursor; status is now `FetchingNext`.
    Fetch(String),
    /// Next is disabled (no cursor, fetch pending, or nothing loaded).
    Blocked,
}

#[derive(Debug, Clone, Default)]
pub struct Paginator {
    pages: Vec<EntitiesPage>,
    index: usize,
    status: PageStatus,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all pages and returns to page 0.
    pub fn reset(&mut self) {
        self.pages.clear();
        self.index = 0;
        self.status = PageStatus::Idle;
    }

    /// Installs the first page of a fresh result set.
    pub fn set_first(&mut self, page: EntitiesPage) {
        self.pages = vec![page];
        self.index = 0;
        self.status = PageStatus::Idle;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn current(&self) -> Option<&EntitiesPage> {
        self.pages.get(self.index)
    }

    pub fn is_on_last(&self) -> bool {
        self.index + 1 >= self.pages.len()
    }

    /// Cursor of the last fetched page, if the backend has more.
    pub fn next_cursor(&self) -> Option<&str> {
        self.pages.last().and_then(|p| p.next_cursor.as_deref())
    }

    pub fn is_busy(&self) -> bool {
        self.status == PageStatus::FetchingNext
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            PageStatus::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        if self.pages.is_empty() {
            return false;
        }
        if !self.is_on_last() {
            return true;
        }
        self.next_cursor().is_some() && !self.is_busy()
    }

    pub fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn next(&mut self) -> NextAction {
        if !self.can_next() {
            return NextAction::Blocked;
        }
        if !self.is_on_last() {
            self.index += 1;
            return NextAction::Moved;
        }
        match self.next_cursor() {
            Some(cursor) => {
                let cursor = cursor.to_string();
                self.status = PageStatus::FetchingNext;
                NextAction::Fetch(cursor)
            }
            None => NextAction::Blocked,
        }
    }

    /// Appends a fetched page and advances onto it.
    pub fn complete_next(&mut self, page: EntitiesPage) {
        self.pages.push(page);
        self.index = self.pages.len() - 1;
        self.status = PageStatus::Idle;
    }

    /// Records a failed next fetch. Index and pages are untouched.
    pub fn fail_next(&mut self, message: impl Into<String>) {
        self.status = PageStatus::Error(message.into());
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn last(&mut self) {
        self.index = self.pages.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(cursor: Option<&str>) -> EntitiesPage {
        EntitiesPage::new(Vec::new(), cursor.map(str::to_string))
    }

    #[test]
    fn empty_paginator_is_disabled() {
        let mut p = Paginator::new();
        assert!(!p.can_prev());
        assert!(!p.can_next());
        assert_eq!(p.next(), NextAction::Blocked);
    }

    #[test]
    fn next_at_last_page_fetches() {
        let mut p = Paginator::new();
        p.set_first(page(Some("c1")));
        assert!(!p.can_prev());
        assert_eq!(p.next(), NextAction::Fetch("c1".into()));
        assert!(p.is_busy());
        // Second click while pending is a no-op.
        assert_eq!(p.next(), NextAction::Blocked);
        assert_eq!(p.index(), 0);

        p.complete_next(page(None));
        assert_eq!(p.index(), 1);
        assert_eq!(p.page_count(), 2);
        assert!(!p.can_next());
        assert!(p.can_prev());
    }

    #[test]
    fn fetched_pages_stay_navigable_while_busy() {
        let mut p = Paginator::new();
        p.set_first(page(Some("c1")));
        p.next();
        p.complete_next(page(Some("c2")));
        assert_eq!(p.next(), NextAction::Fetch("c2".into()));
        assert!(p.prev());
        assert_eq!(p.index(), 0);
        assert!(p.can_next());
        assert_eq!(p.next(), NextAction::Moved);
        assert_eq!(p.index(), 1);
        assert_eq!(p.next(), NextAction::Blocked);
    }

    #[test]
    fn failed_next_keeps_index_and_allows_retry() {
        let mut p = Paginator::new();
        p.set_first(page(Some("c1")));
        p.next();
        p.fail_next("timeout");
        assert_eq!(p.index(), 0);
        assert_eq!(p.page_count(), 1);
        assert_eq!(p.error(), Some("timeout"));
        assert!(p.can_next());
        assert_eq!(p.next(), NextAction::Fetch("c1".into()));
        assert_eq!(p.status(), &PageStatus::FetchingNext);
    }

    #[test]
    fn index_never_exceeds_fetched_pages() {
        let mut p = Paginator::new();
        p.set_first(page(Some("c1")));
        for _ in 0..5 {
            if let NextAction::Fetch(_) = p.next() {
                p.fail_next("x");
            }
            assert!(p.index() < p.page_count());
        }
        p.last();
        assert_eq!(p.index(), 0);
    }
}
