//! Browser state: selected kind, sort, pagination and the shareable location.
//!
//! [`Browser`] is plain single-threaded state with no I/O. Every user action
//! returns the [`FetchRequest`] (if any) the frontend has to execute, and
//! completed requests come back through [`Browser::apply`]. Results for a
//! (kind, sort) combination that is no longer active are dropped, whatever
//! order they arrive in.

mod cache;
mod location;
mod paginator;
mod selector;
mod sort;

pub use cache::{PageCache, QueryKey};
pub use location::Location;
pub use paginator::{NextAction, PageStatus, Paginator};
pub use selector::{KindSelector, KindsState};
pub use sort::{SortDirection, SortSpec, SortState};

use tracing::{debug, info, warn};

use crate::client::{CancelToken, ClientError};
use crate::model::EntitiesPage;

/// Load state of the entity table for the active (kind, sort).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableStatus {
    /// Nothing to show (no kind selected).
    #[default]
    Empty,
    /// First page in flight.
    Loading,
    Ready,
    /// First page failed; blocking error.
    Failed(String),
}

/// Why a page is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePurpose {
    First,
    Next,
}

/// Work the frontend must execute on behalf of the browser.
#[derive(Debug, Clone)]
pub enum FetchRequest {
    Kinds {
        id: u64,
        cancel: CancelToken,
    },
    Page {
        id: u64,
        key: QueryKey,
        limit: usize,
        purpose: PagePurpose,
        cancel: CancelToken,
    },
}

impl FetchRequest {
    pub fn id(&self) -> u64 {
        match self {
            FetchRequest::Kinds { id, .. } | FetchRequest::Page { id, .. } => *id,
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        match self {
            FetchRequest::Kinds { cancel, .. } | FetchRequest::Page { cancel, .. } => cancel,
        }
    }
}

/// Completed [`FetchRequest`].
#[derive(Debug, Clone)]
pub enum FetchResult {
    Kinds {
        id: u64,
        result: Result<Vec<String>, ClientError>,
    },
    Page {
        id: u64,
        key: QueryKey,
        purpose: PagePurpose,
        result: Result<EntitiesPage, ClientError>,
    },
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    /// `None` for the kinds request.
    key: Option<QueryKey>,
    cancel: CancelToken,
}

/// Explicit view state shared by the frontend and the fetch loop.
#[derive(Debug)]
pub struct Browser {
    selector: KindSelector,
    sort: SortState,
    paginator: Paginator,
    cache: PageCache,
    table: TableStatus,
    limit: usize,
    /// Location asked for before the kind list was known.
    requested: Location,
    next_id: u64,
    in_flight: Vec<InFlight>,
}

impl Browser {
    pub fn new(limit: usize) -> Self {
        Self {
            selector: KindSelector::new(),
            sort: SortState::default(),
            paginator: Paginator::new(),
            cache: PageCache::new(),
            table: TableStatus::Empty,
            limit: limit.max(1),
            requested: Location::default(),
            next_id: 1,
            in_flight: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn selector(&self) -> &KindSelector {
        &self.selector
    }

    pub fn selected_kind(&self) -> Option<&str> {
        self.selector.selected()
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn table_status(&self) -> &TableStatus {
        &self.table
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Page currently on screen.
    pub fn current_page(&self) -> Option<&EntitiesPage> {
        match self.table {
            TableStatus::Ready => self.paginator.current(),
            _ => None,
        }
    }

    /// Shareable location for the current state.
    pub fn location(&self) -> Location {
        Location::new(
            self.selector.selected().map(str::to_string),
            self.sort.active().cloned(),
        )
    }

    /// Key of the first page for the active (kind, sort).
    pub fn active_key(&self) -> Option<QueryKey> {
        self.selector
            .selected()
            .map(|kind| QueryKey::new(kind, self.sort.active().cloned(), None))
    }

    /// True when a kinds, first-page or next-page fetch has failed.
    pub fn has_error(&self) -> bool {
        matches!(self.selector.state(), KindsState::Failed(_))
            || matches!(self.table, TableStatus::Failed(_))
            || self.paginator.error().is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Starts the session: requests the kind list. `requested` is restored
    /// once the kinds are known, if its kind is among them.
    pub fn start(&mut self, requested: Location) -> FetchRequest {
        self.requested = requested;
        self.selector.reset_loading();
        self.table = TableStatus::Empty;
        self.paginator.reset();
        self.cancel_all();
        let (id, cancel) = self.track(None);
        FetchRequest::Kinds { id, cancel }
    }

    /// Selects a kind: clears the sort and returns to the first page.
    ///
    /// Selecting the kind that is already shown is a no-op unless a sort or
    /// a later page is active, in which case those are reset too.
    pub fn select_kind(&mut self, kind: &str) -> Option<FetchRequest> {
        if !self.selector.contains(kind) {
            return None;
        }
        let same = self.selector.selected() == Some(kind);
        if same && self.sort.active().is_none() && self.paginator.index() == 0 {
            return None;
        }
        self.selector.select(kind);
        self.sort.clear();
        info!(kind, "kind selected");
        self.load_first_page()
    }

    /// Header click on `field`: cycles its direction and refetches from the
    /// first page. Returns the new sort alongside the request.
    pub fn sort_by(&mut self, field: &str) -> (Option<SortSpec>, Option<FetchRequest>) {
        if self.selector.selected().is_none() {
            return (None, None);
        }
        let spec = self.sort.cycle(field);
        debug!(field, direction = %spec.direction, "sort changed");
        (Some(spec), self.load_first_page())
    }

    /// Applies a location at runtime (pasted by the user).
    ///
    /// A kind that is not in the list is ignored rather than replaced by a
    /// default. Before the kinds are loaded the location is remembered.
    pub fn restore(&mut self, location: Location) -> Option<FetchRequest> {
        if *self.selector.state() != KindsState::Loaded {
            self.requested = location;
            return None;
        }
        let kind = location.kind.as_deref()?;
        if !self.selector.contains(kind) {
            warn!(kind, "ignoring location with unknown kind");
            return None;
        }
        if self.location() == location && self.table != TableStatus::Empty {
            return None;
        }
        self.selector.select(kind);
        self.sort.set(location.sort);
        self.load_first_page()
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        match self.paginator.next() {
            NextAction::Moved | NextAction::Blocked => None,
            NextAction::Fetch(cursor) => {
                let kind = self.selector.selected()?.to_string();
                let key = QueryKey::new(kind, self.sort.active().cloned(), Some(cursor));
                if let Some(page) = self.cache.get(&key) {
                    self.paginator.complete_next(page.clone());
                    return None;
                }
                Some(self.page_request(key, PagePurpose::Next))
            }
        }
    }

    pub fn prev_page(&mut self) -> bool {
        self.paginator.prev()
    }

    pub fn first_page(&mut self) {
        self.paginator.first();
    }

    pub fn last_fetched_page(&mut self) {
        self.paginator.last();
    }

    /// Re-issues whatever failed last.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if matches!(self.selector.state(), KindsState::Failed(_)) {
            let requested = self.requested.clone();
            return Some(self.start(requested));
        }
        if matches!(self.table, TableStatus::Failed(_)) {
            return self.load_first_page();
        }
        if self.paginator.error().is_some() {
            return self.next_page();
        }
        None
    }

    /// Drops cached pages of the current kind and refetches the first page.
    pub fn reload(&mut self) -> Option<FetchRequest> {
        match self.selector.state() {
            KindsState::Failed(_) => return self.retry(),
            KindsState::Loading => return None,
            KindsState::Loaded => {}
        }
        let kind = self.selector.selected()?.to_string();
        self.cache.invalidate_kind(&kind);
        self.load_first_page()
    }

    /// Feeds a completed request back. May return a follow-up request
    /// (the first page after the kinds arrive).
    pub fn apply(&mut self, result: FetchResult) -> Option<FetchRequest> {
        match result {
            FetchResult::Kinds { id, result } => self.on_kinds(id, result),
            FetchResult::Page {
                id,
                key,
                purpose,
                result,
            } => {
                self.on_page(id, key, purpose, result);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn on_kinds(
        &mut self,
        id: u64,
        result: Result<Vec<String>, ClientError>,
    ) -> Option<FetchRequest> {
        if !self.untrack(id) {
            debug!(id, "dropping stale kinds response");
            return None;
        }
        match result {
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                warn!(error = %e, "failed to load kinds");
                self.selector.fail(e.to_string());
                self.table = TableStatus::Empty;
                None
            }
            Ok(kinds) => {
                let requested = std::mem::take(&mut self.requested);
                self.selector.load(kinds, requested.kind.as_deref());
                let restored = requested.kind.is_some()
                    && self.selector.selected() == requested.kind.as_deref();
                self.sort.set(if restored { requested.sort } else { None });
                info!(
                    kinds = self.selector.kinds().len(),
                    selected = self.selector.selected().unwrap_or("-"),
                    "kinds loaded"
                );
                self.load_first_page()
            }
        }
    }

    fn on_page(
        &mut self,
        id: u64,
        key: QueryKey,
        purpose: PagePurpose,
        result: Result<EntitiesPage, ClientError>,
    ) {
        let tracked = self.untrack(id);
        let current = self.active_key().is_some_and(|active| active.same_view(&key));
        if !tracked || !current {
            debug!(id, kind = %key.kind, "dropping stale page response");
            return;
        }

        match (purpose, result) {
            (_, Err(e)) if e.is_cancelled() => {}
            (PagePurpose::First, Ok(page)) => {
                self.cache.insert(key, page.clone());
                self.paginator.set_first(page);
                self.table = TableStatus::Ready;
            }
            (PagePurpose::Next, Ok(page)) => {
                self.cache.insert(key, page.clone());
                self.paginator.complete_next(page);
            }
            (PagePurpose::First, Err(e)) => {
                warn!(kind = %key.kind, error = %e, "failed to load entities");
                self.table = TableStatus::Failed(e.to_string());
            }
            (PagePurpose::Next, Err(e)) => {
                warn!(
                    kind = %key.kind,
                    cursor = ?key.cursor,
                    error = %e,
                    "failed to load next page"
                );
                self.paginator.fail_next(e.to_string());
            }
        }
    }

    /// Resets pagination and loads (or serves from cache) the first page of
    /// the active (kind, sort). Superseded page requests are cancelled.
    fn load_first_page(&mut self) -> Option<FetchRequest> {
        self.cancel_pages();
        self.paginator.reset();
        let Some(key) = self.active_key() else {
            self.table = TableStatus::Empty;
            return None;
        };
        if let Some(page) = self.cache.get(&key) {
            self.paginator.set_first(page.clone());
            self.table = TableStatus::Ready;
            return None;
        }
        self.table = TableStatus::Loading;
        Some(self.page_request(key, PagePurpose::First))
    }

    fn page_request(&mut self, key: QueryKey, purpose: PagePurpose) -> FetchRequest {
        let (id, cancel) = self.track(Some(key.clone()));
        FetchRequest::Page {
            id,
            key,
            limit: self.limit,
            purpose,
            cancel,
        }
    }

    fn track(&mut self, key: Option<QueryKey>) -> (u64, CancelToken) {
        let id = self.next_id;
        self.next_id += 1;
        let cancel = CancelToken::new();
        self.in_flight.push(InFlight {
            id,
            key,
            cancel: cancel.clone(),
        });
        (id, cancel)
    }

    fn untrack(&mut self, id: u64) -> bool {
        match self.in_flight.iter().position(|f| f.id == id) {
            Some(pos) => {
                self.in_flight.remove(pos);
                true
            }
            None => false,
        }
    }

    fn cancel_pages(&mut self) {
        self.in_flight.retain(|f| {
            if f.key.is_some() {
                f.cancel.cancel();
                false
            } else {
                true
            }
        });
    }

    fn cancel_all(&mut self) {
        for f in self.in_flight.drain(..) {
            f.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KEY_FIELD, Property, Record, ValueKind};

    fn page(keys: &[&str], cursor: Option<&str>) -> EntitiesPage {
        let entities = keys
            .iter()
            .map(|k| Record::new().with(Property::new(KEY_FIELD, *k, ValueKind::String)))
            .collect();
        EntitiesPage::new(entities, cursor.map(str::to_string))
    }

    fn kinds_ok(browser: &mut Browser, req: FetchRequest, kinds: &[&str]) -> Option<FetchRequest> {
        browser.apply(FetchResult::Kinds {
            id: req.id(),
            result: Ok(kinds.iter().map(|k| k.to_string()).collect()),
        })
    }

    fn page_ok(browser: &mut Browser, req: &FetchRequest, page: EntitiesPage) {
        let FetchRequest::Page { id, key, purpose, .. } = req.clone() else {
            panic!("expected page request");
        };
        browser.apply(FetchResult::Page {
            id,
            key,
            purpose,
            result: Ok(page),
        });
    }

    fn page_err(browser: &mut Browser, req: &FetchRequest, msg: &str) {
        let FetchRequest::Page { id, key, purpose, .. } = req.clone() else {
            panic!("expected page request");
        };
        browser.apply(FetchResult::Page {
            id,
            key,
            purpose,
            result: Err(ClientError::Http(msg.to_string())),
        });
    }

    fn key_of(req: &FetchRequest) -> QueryKey {
        match req {
            FetchRequest::Page { key, .. } => key.clone(),
            FetchRequest::Kinds { .. } => panic!("expected page request"),
        }
    }

    /// Browser with kinds [user, order], "user" selected and its first page loaded.
    fn loaded() -> Browser {
        let mut b = Browser::new(50);
        let req = b.start(Location::default());
        let first = kinds_ok(&mut b, req, &["user", "order"]).unwrap();
        page_ok(&mut b, &first, page(&["u1", "u2"], Some("c1")));
        b
    }

    #[test]
    fn first_kind_selected_without_location() {
        let mut b = Browser::new(50);
        let req = b.start(Location::default());
        assert!(matches!(req, FetchRequest::Kinds { .. }));
        let first = kinds_ok(&mut b, req, &["user", "order"]).unwrap();
        assert_eq!(key_of(&first), QueryKey::new("user", None, None));
        assert_eq!(b.table_status(), &TableStatus::Loading);
        assert_eq!(b.location().to_query_string(), "/?kind=user");
    }

    #[test]
    fn location_restores_kind_and_sort() {
        let mut b = Browser::new(50);
        let req = b.start(Location::parse("/?kind=order&sortKey=total&sortDirection=desc"));
        let first = kinds_ok(&mut b, req, &["user", "order"]).unwrap();
        assert_eq!(
            key_of(&first),
            QueryKey::new("order", Some(SortSpec::desc("total")), None)
        );
    }

    #[test]
    fn unknown_location_kind_is_ignored() {
        let mut b = Browser::new(50);
        let req = b.start(Location::parse("/?kind=invoice&sortKey=total&sortDirection=asc"));
        let first = kinds_ok(&mut b, req, &["user", "order"]).unwrap();
        assert_eq!(key_of(&first), QueryKey::new("user", None, None));
        assert!(b.sort().active().is_none());
    }

    #[test]
    fn kinds_failure_is_blocking_and_retryable() {
        let mut b = Browser::new(50);
        let req = b.start(Location::default());
        let follow = b.apply(FetchResult::Kinds {
            id: req.id(),
            result: Err(ClientError::Http("refused".into())),
        });
        assert!(follow.is_none());
        assert!(matches!(b.selector().state(), KindsState::Failed(_)));
        assert_eq!(b.selected_kind(), None);
        assert!(matches!(b.retry(), Some(FetchRequest::Kinds { .. })));
    }

    #[test]
    fn selecting_kind_resets_sort_and_page() {
        let mut b = loaded();
        let (_, req) = b.sort_by("name");
        page_ok(&mut b, &req.unwrap(), page(&["u2"], Some("c1")));
        let next = b.next_page().unwrap();
        page_ok(&mut b, &next, page(&["u9"], None));
        assert_eq!(b.paginator().index(), 1);

        let req = b.select_kind("order").unwrap();
        assert_eq!(key_of(&req), QueryKey::new("order", None, None));
        assert!(b.sort().active().is_none());
        assert_eq!(b.paginator().index(), 0);
        assert_eq!(b.location().to_query_string(), "/?kind=order");
    }

    #[test]
    fn sort_cycles_and_refetches() {
        let mut b = loaded();
        let (spec, req) = b.sort_by("createdAt");
        assert_eq!(spec, Some(SortSpec::asc("createdAt")));
        assert_eq!(
            key_of(&req.unwrap()),
            QueryKey::new("user", Some(SortSpec::asc("createdAt")), None)
        );
        let (spec, _) = b.sort_by("createdAt");
        assert_eq!(spec, Some(SortSpec::desc("createdAt")));
        assert_eq!(
            b.location().to_query_string(),
            "/?kind=user&sortKey=createdAt&sortDirection=desc"
        );
    }

    #[test]
    fn stale_page_for_previous_kind_is_dropped() {
        let mut b = loaded();
        let old = b.select_kind("order").unwrap();
        let new = b.select_kind("user");
        // "user" first page is cached, so no new request.
        assert!(new.is_none());
        assert!(old.cancel_token().is_cancelled());
        page_ok(&mut b, &old, page(&["o1"], None));
        let shown: Vec<_> = b
            .current_page()
            .unwrap()
            .entities
            .iter()
            .filter_map(|r| r.key())
            .collect();
        assert_eq!(shown, vec!["u1", "u2"]);
    }

    #[test]
    fn stale_guard_uses_request_parameters() {
        let mut b = loaded();
        let (_, a) = b.sort_by("name");
        let (_, c) = b.sort_by("name");
        // Newer request resolves first, then the older one.
        page_ok(&mut b, &c.unwrap(), page(&["desc"], None));
        page_ok(&mut b, &a.unwrap(), page(&["asc"], None));
        assert_eq!(b.current_page().unwrap().entities[0].key(), Some("desc"));
    }

    #[test]
    fn next_page_for_previous_sort_is_dropped() {
        let mut b = loaded();
        let next = b.next_page().unwrap();
        assert!(b.paginator().is_busy());

        let (_, first) = b.sort_by("name");
        let first = first.unwrap();
        assert!(next.cancel_token().is_cancelled());
        assert_eq!(b.in_flight(), 1);
        page_ok(&mut b, &first, page(&["u2", "u1"], Some("c9")));

        page_ok(&mut b, &next, page(&["u3"], None));
        assert_eq!(b.paginator().page_count(), 1);
        assert_eq!(b.paginator().index(), 0);
        assert!(!b.paginator().is_busy());
        assert_eq!(b.paginator().next_cursor(), Some("c9"));
        assert_eq!(b.current_page().unwrap().entities[0].key(), Some("u2"));
        assert_eq!(b.in_flight(), 0);
    }

    #[test]
    fn failed_next_keeps_pages_and_retries() {
        let mut b = loaded();
        let next = b.next_page().unwrap();
        assert!(b.paginator().is_busy());
        assert!(b.next_page().is_none());
        page_err(&mut b, &next, "timeout");
        assert_eq!(b.paginator().index(), 0);
        assert_eq!(b.paginator().page_count(), 1);
        assert!(b.current_page().is_some());

        let retry = b.retry().unwrap();
        assert_eq!(key_of(&retry).cursor.as_deref(), Some("c1"));
        page_ok(&mut b, &retry, page(&["u3"], None));
        assert_eq!(b.paginator().index(), 1);
        assert!(!b.paginator().can_next());
    }

    #[test]
    fn failed_first_page_is_blocking() {
        let mut b = Browser::new(50);
        let req = b.start(Location::default());
        let first = kinds_ok(&mut b, req, &["user"]).unwrap();
        page_err(&mut b, &first, "500");
        assert!(matches!(b.table_status(), TableStatus::Failed(_)));
        assert!(b.current_page().is_none());
        let retry = b.retry().unwrap();
        assert_eq!(key_of(&retry), QueryKey::new("user", None, None));
    }

    #[test]
    fn cached_next_page_needs_no_request() {
        let mut b = loaded();
        let next = b.next_page().unwrap();
        page_ok(&mut b, &next, page(&["u3"], None));
        b.select_kind("order");
        b.select_kind("user");
        assert_eq!(b.paginator().index(), 0);
        assert!(b.next_page().is_none());
        assert_eq!(b.paginator().index(), 1);
    }

    #[test]
    fn reload_bypasses_cache() {
        let mut b = loaded();
        assert_eq!(b.cache().len(), 1);
        let req = b.reload().unwrap();
        assert_eq!(b.cache().len(), 0);
        assert_eq!(key_of(&req), QueryKey::new("user", None, None));
        assert_eq!(b.table_status(), &TableStatus::Loading);
    }

    #[test]
    fn restore_applies_known_locations_only() {
        let mut b = loaded();
        assert!(b.restore(Location::parse("/?kind=invoice")).is_none());
        assert_eq!(b.selected_kind(), Some("user"));

        let req = b
            .restore(Location::parse("/?kind=order&sortKey=total&sortDirection=asc"))
            .unwrap();
        assert_eq!(
            key_of(&req),
            QueryKey::new("order", Some(SortSpec::asc("total")), None)
        );
    }
}
