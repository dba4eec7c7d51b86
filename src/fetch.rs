//! Background fetch worker.
//!
//! Executes [`FetchRequest`]s against a [`DataSource`] off the UI thread.
//! A dispatcher thread hands every request to its own short-lived thread, so
//! a request that was cancelled while blocked in I/O never delays the ones
//! queued after it. Results are handed to a caller-supplied delivery
//! closure, usually one that forwards them into the TUI event channel, in
//! completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::browser::{FetchRequest, FetchResult};
use crate::client::{ClientError, DataSource};

pub struct FetchWorker {
    tx: Option<Sender<FetchRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Starts the dispatcher thread. `deliver` returns `false` once nobody is
    /// listening anymore, which stops the worker.
    pub fn spawn<F>(source: Arc<dyn DataSource>, deliver: F) -> std::io::Result<Self>
    where
        F: Fn(FetchResult) -> bool + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel::<FetchRequest>();
        let deliver = Arc::new(deliver);
        let stopped = Arc::new(AtomicBool::new(false));
        let handle = thread::Builder::new()
            .name("kindview-fetch".to_string())
            .spawn(move || {
                let mut running: Vec<JoinHandle<()>> = Vec::new();
                for request in rx {
                    if stopped.load(Ordering::Relaxed) {
                        debug!("result receiver gone, stopping fetch worker");
                        break;
                    }
                    running.retain(|h| !h.is_finished());
                    if request.cancel_token().is_cancelled() {
                        debug!(id = request.id(), "skipping cancelled request");
                        continue;
                    }

                    let id = request.id();
                    let source = Arc::clone(&source);
                    let deliver = Arc::clone(&deliver);
                    let stopped = Arc::clone(&stopped);
                    let spawned = thread::Builder::new()
                        .name(format!("kindview-fetch-{id}"))
                        .spawn(move || {
                            let result = execute(source.as_ref(), &request);
                            if !(*deliver)(result) {
                                stopped.store(true, Ordering::Relaxed);
                            }
                        });
                    match spawned {
                        Ok(handle) => running.push(handle),
                        Err(e) => warn!(id, error = %e, "cannot spawn fetch thread"),
                    }
                }
                for handle in running {
                    if handle.join().is_err() {
                        warn!("fetch thread panicked");
                    }
                }
            })?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queues a request. Returns `false` if the worker has stopped.
    pub fn submit(&self, request: FetchRequest) -> bool {
        match &self.tx {
            Some(tx) => tx.send(request).is_ok(),
            None => false,
        }
    }

    /// Closes the request queue and waits for the requests still running.
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("fetch worker panicked");
        }
    }
}

/// Runs one request synchronously.
pub fn execute(source: &dyn DataSource, request: &FetchRequest) -> FetchResult {
    match request {
        FetchRequest::Kinds { id, cancel } => {
            let result = if cancel.is_cancelled() {
                Err(ClientError::Cancelled)
            } else {
                source.fetch_kinds(cancel)
            };
            FetchResult::Kinds { id: *id, result }
        }
        FetchRequest::Page {
            id,
            key,
            limit,
            purpose,
            cancel,
        } => {
            let result = if cancel.is_cancelled() {
                Err(ClientError::Cancelled)
            } else {
                source.fetch_entities(&key.to_query(*limit), cancel)
            };
            FetchResult::Page {
                id: *id,
                key: key.clone(),
                purpose: *purpose,
                result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Browser, Location, PagePurpose, QueryKey, SortDirection, TableStatus};
    use crate::client::{CancelToken, EntityQuery, MockDataSource};
    use crate::model::{EntitiesPage, KEY_FIELD, Property, Record, ValueKind};
    use std::time::{Duration, Instant};

    fn source() -> MockDataSource {
        MockDataSource::new().with_kind(
            "user",
            vec![Record::new().with(Property::new(KEY_FIELD, "u1", ValueKind::String))],
        )
    }

    #[test]
    fn cancelled_request_skips_the_source() {
        let mock = source();
        let cancel = CancelToken::new();
        cancel.cancel();
        let request = FetchRequest::Page {
            id: 7,
            key: QueryKey::new("user", None, None),
            limit: 50,
            purpose: PagePurpose::First,
            cancel,
        };
        match execute(&mock, &request) {
            FetchResult::Page { id, result, .. } => {
                assert_eq!(id, 7);
                assert_eq!(result, Err(ClientError::Cancelled));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(mock.served().is_empty());
    }

    #[test]
    fn worker_delivers_every_result() {
        let mock: Arc<dyn DataSource> = Arc::new(source());
        let (tx, rx) = mpsc::channel();
        let worker = FetchWorker::spawn(mock, move |r| tx.send(r).is_ok()).unwrap();

        assert!(worker.submit(FetchRequest::Kinds {
            id: 1,
            cancel: CancelToken::new(),
        }));
        assert!(worker.submit(FetchRequest::Page {
            id: 2,
            key: QueryKey::new("user", None, None),
            limit: 10,
            purpose: PagePurpose::First,
            cancel: CancelToken::new(),
        }));

        let mut results: Vec<FetchResult> = (0..2)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        results.sort_by_key(|r| match r {
            FetchResult::Kinds { id, .. } | FetchResult::Page { id, .. } => *id,
        });
        assert!(
            matches!(&results[0], FetchResult::Kinds { id: 1, result: Ok(k) } if k == &["user"])
        );
        match &results[1] {
            FetchResult::Page { id, result, .. } => {
                assert_eq!(*id, 2);
                assert_eq!(result.as_ref().unwrap().entities.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        worker.shutdown();
    }

    /// Blocks on kind "slow" without looking at the token, like a request
    /// stuck in `send()`.
    struct SlowSource;

    impl DataSource for SlowSource {
        fn fetch_kinds(&self, _cancel: &CancelToken) -> Result<Vec<String>, ClientError> {
            Ok(vec!["slow".into(), "fast".into()])
        }

        fn fetch_entities(
            &self,
            query: &EntityQuery,
            _cancel: &CancelToken,
        ) -> Result<EntitiesPage, ClientError> {
            if query.kind == "slow" {
                std::thread::sleep(Duration::from_secs(2));
            }
            let record =
                Record::new().with(Property::new(KEY_FIELD, &query.kind, ValueKind::String));
            Ok(EntitiesPage::new(vec![record], None))
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    #[test]
    fn superseded_request_does_not_delay_the_next_one() {
        let mut browser = Browser::new(50);
        let start = browser.start(Location::default());
        let slow_page = browser.apply(execute(&SlowSource, &start)).unwrap();
        assert_eq!(browser.selected_kind(), Some("slow"));

        let (tx, rx) = mpsc::channel();
        let worker =
            FetchWorker::spawn(Arc::new(SlowSource), move |r| tx.send(r).is_ok()).unwrap();
        assert!(worker.submit(slow_page));
        // Let the slow request get stuck in the source before switching.
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        let fast_page = browser.select_kind("fast").unwrap();
        assert!(worker.submit(fast_page));

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(started.elapsed() < Duration::from_millis(1000));
        browser.apply(result);
        let page = browser.current_page().unwrap();
        assert_eq!(page.entities[0].key(), Some("fast"));
    }

    #[test]
    fn cancelled_request_is_never_delivered() {
        let (tx, rx) = mpsc::channel();
        let worker =
            FetchWorker::spawn(Arc::new(source()), move |r| tx.send(r).is_ok()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(worker.submit(FetchRequest::Kinds { id: 1, cancel }));
        assert!(worker.submit(FetchRequest::Kinds {
            id: 2,
            cancel: CancelToken::new(),
        }));

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, FetchResult::Kinds { id: 2, .. }));
        worker.shutdown();
        assert!(rx.try_recv().is_err());
    }

    /// Runs `request` and every follow-up it triggers to completion.
    fn drive(browser: &mut Browser, mock: &MockDataSource, request: Option<FetchRequest>) {
        let mut next = request;
        while let Some(request) = next {
            next = browser.apply(execute(mock, &request));
        }
    }

    fn users_and_orders() -> MockDataSource {
        let orders = (1..=5)
            .map(|i| {
                Record::new()
                    .with(Property::new(KEY_FIELD, format!("o{i}"), ValueKind::String))
                    .with(Property::new("createdAt", format!("2024-01-0{i}"), ValueKind::String))
            })
            .collect();
        source().with_kind("order", orders)
    }

    #[test]
    fn selecting_a_kind_issues_the_canonical_query() {
        let mock = users_and_orders();
        let mut browser = Browser::new(50);
        let start = browser.start(Location::default());
        drive(&mut browser, &mock, Some(start));
        assert_eq!(browser.selected_kind(), Some("user"));

        let request = browser.select_kind("order");
        drive(&mut browser, &mock, request);

        let last = mock.served().pop().unwrap();
        assert_eq!(
            last.path(),
            "/api/entities/order/?sortKey=&sortDirection=&cursor=&limit=50"
        );
        assert_eq!(browser.location().to_string(), "/?kind=order");
        assert_eq!(browser.current_page().unwrap().entities.len(), 5);
    }

    #[test]
    fn kinds_failure_recovers_on_retry() {
        let mock = users_and_orders();
        mock.fail_kinds(Some("backend down"));
        let mut browser = Browser::new(50);
        let start = browser.start(Location::for_kind("order"));
        drive(&mut browser, &mock, Some(start));
        assert!(browser.has_error());
        assert_eq!(browser.selected_kind(), None);
        assert!(mock.served().is_empty());

        mock.fail_kinds(None);
        let retry = browser.retry();
        assert!(matches!(retry, Some(FetchRequest::Kinds { .. })));
        drive(&mut browser, &mock, retry);
        assert_eq!(mock.kinds_requests(), 2);
        assert!(!browser.has_error());
        assert_eq!(browser.selected_kind(), Some("order"));
        assert_eq!(browser.current_page().unwrap().entities.len(), 5);
    }

    #[test]
    fn sorting_twice_flips_direction() {
        let mock = users_and_orders();
        let mut browser = Browser::new(50);
        let start = browser.start(Location::for_kind("order"));
        drive(&mut browser, &mock, Some(start));

        let (_, request) = browser.sort_by("createdAt");
        drive(&mut browser, &mock, request);
        let first_key =
            |b: &Browser| b.current_page().unwrap().entities[0].key().map(str::to_string);
        assert_eq!(first_key(&browser).as_deref(), Some("o1"));
        assert!(
            browser
                .location()
                .to_string()
                .ends_with("sortKey=createdAt&sortDirection=asc")
        );

        let (spec, request) = browser.sort_by("createdAt");
        assert_eq!(spec.unwrap().direction, SortDirection::Descending);
        drive(&mut browser, &mock, request);
        assert_eq!(first_key(&browser).as_deref(), Some("o5"));
    }

    #[test]
    fn failed_next_page_recovers_on_retry() {
        let mock = users_and_orders();
        let mut browser = Browser::new(2);
        let start = browser.start(Location::for_kind("order"));
        drive(&mut browser, &mock, Some(start));
        mock.fail_once("order", Some("2"), "boom");

        let request = browser.next_page();
        drive(&mut browser, &mock, request);
        assert_eq!(browser.paginator().index(), 0);
        assert!(browser.paginator().error().unwrap().contains("boom"));
        assert!(browser.has_error());

        let request = browser.retry();
        drive(&mut browser, &mock, request);
        assert_eq!(browser.paginator().index(), 1);
        assert!(browser.paginator().error().is_none());
    }

    #[test]
    fn results_for_an_abandoned_kind_are_dropped() {
        let mock = users_and_orders();
        let mut browser = Browser::new(50);
        let start = browser.start(Location::default());
        let first = browser.apply(execute(&mock, &start)).unwrap();

        // The user switches before the first user page arrives.
        let order = browser.select_kind("order").unwrap();
        let stale = execute(&mock, &first);
        assert!(browser.apply(stale).is_none());
        assert_eq!(*browser.table_status(), TableStatus::Loading);

        drive(&mut browser, &mock, Some(order));
        let page = browser.current_page().unwrap();
        assert_eq!(page.entities[0].key(), Some("o1"));
    }

    #[test]
    fn demo_data_pages_through_every_order() {
        let mock = MockDataSource::demo();
        let mut browser = Browser::new(50);
        let start = browser.start(Location::for_kind("order"));
        drive(&mut browser, &mock, Some(start));

        let mut seen = browser.current_page().unwrap().entities.len();
        while browser.paginator().can_next() {
            let request = browser.next_page();
            drive(&mut browser, &mock, request);
            seen += browser.current_page().unwrap().entities.len();
        }
        assert_eq!(seen, 120);
        assert_eq!(browser.paginator().page_count(), 3);
        assert!(!browser.paginator().can_next());

        browser.first_page();
        assert_eq!(browser.paginator().index(), 0);
        browser.last_fetched_page();
        assert_eq!(browser.paginator().index(), 2);
    }
}

