//! In-memory data source for tests and demo mode.
//!
//! Behaves like the real backend: server-side sort on the raw property value,
//! offset-based cursors, no cursor once the last record has been served.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{CancelToken, ClientError, DataSource, EntityQuery};
use crate::browser::{SortDirection, SortSpec};
use crate::model::{EntitiesPage, KEY_FIELD, Property, Record, ValueKind};

const GIFT_NOTE: &str =
    "Happy birthday! Enjoy this long note that will not fit the column width at all.";

#[derive(Debug, Clone)]
struct FailureRule {
    kind: String,
    cursor: Option<String>,
    message: String,
}

#[derive(Debug, Default)]
struct MockLog {
    served: Vec<EntityQuery>,
    kinds_requests: usize,
    kinds_failure: Option<String>,
    failures: Vec<FailureRule>,
}

/// In-memory backend holding `kind -> records`.
#[derive(Debug, Default)]
pub struct MockDataSource {
    kinds: Vec<String>,
    records: BTreeMap<String, Vec<Record>>,
    log: Mutex<MockLog>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a kind with its records. Kinds are listed in insertion order.
    pub fn with_kind(mut self, kind: impl Into<String>, records: Vec<Record>) -> Self {
        let kind = kind.into();
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind.clone());
        }
        self.records.insert(kind, records);
        self
    }

    /// Makes every kinds request fail with `message` until cleared.
    pub fn fail_kinds(&self, message: Option<&str>) {
        self.lock().kinds_failure = message.map(str::to_string);
    }

    /// Makes the next entities request for `(kind, cursor)` fail once.
    pub fn fail_once(&self, kind: &str, cursor: Option<&str>, message: &str) {
        self.lock().failures.push(FailureRule {
            kind: kind.to_string(),
            cursor: cursor.map(str::to_string),
            message: message.to_string(),
        });
    }

    /// Every entities query served so far, failures included.
    pub fn served(&self) -> Vec<EntityQuery> {
        self.lock().served.clone()
    }

    pub fn kinds_requests(&self) -> usize {
        self.lock().kinds_requests
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockLog> {
        // A panic while holding the lock only happens in a failing test; keep serving.
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Small multi-kind dataset with heterogeneous fields and every value type.
    pub fn demo() -> Self {
        let users: Vec<Record> = (1..=23)
            .map(|i| {
                let mut record = Record::new()
                    .with(Property::new(KEY_FIELD, format!("/user,{i}"), ValueKind::String))
                    .with(Property::new("name", format!("user{i:02}"), ValueKind::String))
                    .with(Property::new("age", (18 + i * 3 % 50).to_string(), ValueKind::Int64))
                    .with(Property::new("active", (i % 3 != 0).to_string(), ValueKind::Bool))
                    .with(Property::new(
                        "createdAt",
                        format!("2024-01-{:02} 10:{:02}:00 +0000 UTC", 1 + i % 28, i % 60),
                        ValueKind::Time,
                    ));
                if i % 4 == 0 {
                    record.insert(Property::new("nickname", "<nil>", ValueKind::Null).unindexed());
                }
                if i % 5 == 0 {
                    record.insert(
                        Property::new("score", format!("{}.5", i * 7), ValueKind::parse("float64"))
                            .unindexed(),
                    );
                }
                record
            })
            .collect();

        let orders: Vec<Record> = (1..=120)
            .map(|i| {
                let mut record = Record::new()
                    .with(Property::new(
                        KEY_FIELD,
                        format!("/order,{}", 1000 + i),
                        ValueKind::String,
                    ))
                    .with(Property::new("total", ((i * 37) % 500).to_string(), ValueKind::Int64))
                    .with(Property::new(
                        "user",
                        format!("/user,{}", 1 + i % 23),
                        ValueKind::parse("*datastore.Key"),
                    ))
                    .with(Property::new(
                        "createdAt",
                        format!("2024-02-{:02} {:02}:00:00 +0000 UTC", 1 + i % 28, i % 24),
                        ValueKind::Time,
                    ));
                if i % 2 == 0 {
                    record.insert(Property::new(
                        "items",
                        format!("[sku-{i} sku-{}]", i + 1),
                        ValueKind::List,
                    ));
                }
                if i % 7 == 0 {
                    record.insert(
                        Property::new("giftNote", GIFT_NOTE, ValueKind::String).unindexed(),
                    );
                }
                record
            })
            .collect();

        let products: Vec<Record> = ["apple", "banana", "cherry"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Record::new()
                    .with(Property::new(KEY_FIELD, format!("/product,{name}"), ValueKind::String))
                    .with(Property::new("price", (i * 100 + 99).to_string(), ValueKind::Int64))
                    .with(Property::new("inStock", (i != 1).to_string(), ValueKind::Bool))
            })
            .collect();

        MockDataSource::new()
            .with_kind("user", users)
            .with_kind("order", orders)
            .with_kind("product", products)
    }
}

/// Server-side ordering: numeric for int64 pairs, raw string otherwise.
/// Records without the field sort first ascending, last descending.
fn compare_records(a: &Record, b: &Record, sort: &SortSpec) -> Ordering {
    let ord = match (a.get(&sort.field), b.get(&sort.field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_values(x, y),
    };
    match sort.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

fn compare_values(x: &Property, y: &Property) -> Ordering {
    if x.kind == ValueKind::Int64
        && y.kind == ValueKind::Int64
        && let (Ok(a), Ok(b)) = (x.value.parse::<i64>(), y.value.parse::<i64>())
    {
        return a.cmp(&b);
    }
    x.value.cmp(&y.value)
}

impl DataSource for MockDataSource {
    fn fetch_kinds(&self, cancel: &CancelToken) -> Result<Vec<String>, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let mut log = self.lock();
        log.kinds_requests += 1;
        if let Some(message) = &log.kinds_failure {
            return Err(ClientError::Injected(message.clone()));
        }
        Ok(self.kinds.clone())
    }

    fn fetch_entities(
        &self,
        query: &EntityQuery,
        cancel: &CancelToken,
    ) -> Result<EntitiesPage, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        {
            let mut log = self.lock();
            log.served.push(query.clone());
            if let Some(pos) = log
                .failures
                .iter()
                .position(|f| f.kind == query.kind && f.cursor == query.cursor)
            {
                let rule = log.failures.remove(pos);
                return Err(ClientError::Injected(rule.message));
            }
        }

        let Some(records) = self.records.get(&query.kind) else {
            return Err(ClientError::Status {
                status: 404,
                url: query.path(),
            });
        };

        let offset = match query.cursor.as_deref() {
            None => 0,
            Some(c) => c.parse::<usize>().map_err(|_| ClientError::Status {
                status: 400,
                url: query.path(),
            })?,
        };

        let mut ordered: Vec<&Record> = records.iter().collect();
        if let Some(sort) = &query.sort {
            ordered.sort_by(|a, b| compare_records(a, b, sort));
        }

        let end = (offset + query.limit).min(ordered.len());
        let entities: Vec<Record> = ordered
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|r| (*r).clone())
            .collect();
        let next_cursor = (end < ordered.len()).then(|| end.to_string());

        Ok(EntitiesPage::new(entities, next_cursor))
    }

    fn describe(&self) -> String {
        "demo".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: &str, n: Option<i64>) -> Record {
        let mut r = Record::new().with(Property::new(KEY_FIELD, key, ValueKind::String));
        if let Some(n) = n {
            r.insert(Property::new("n", n.to_string(), ValueKind::Int64));
        }
        r
    }

    fn source() -> MockDataSource {
        MockDataSource::new().with_kind(
            "num",
            vec![rec("a", Some(10)), rec("b", None), rec("c", Some(9)), rec("d", Some(100))],
        )
    }

    fn keys(page: &EntitiesPage) -> Vec<&str> {
        page.entities.iter().filter_map(|r| r.key()).collect()
    }

    #[test]
    fn pages_with_offset_cursor() {
        let src = source();
        let cancel = CancelToken::new();
        let first = src
            .fetch_entities(&EntityQuery::first_page("num", None, 3), &cancel)
            .unwrap();
        assert_eq!(keys(&first), vec!["a", "b", "c"]);
        assert_eq!(first.next_cursor.as_deref(), Some("3"));

        let second = src
            .fetch_entities(
                &EntityQuery {
                    cursor: first.next_cursor.clone(),
                    ..EntityQuery::first_page("num", None, 3)
                },
                &cancel,
            )
            .unwrap();
        assert_eq!(keys(&second), vec!["d"]);
        assert!(second.next_cursor.is_none());
    }

    #[test]
    fn exact_multiple_of_limit_has_no_cursor() {
        let src = source();
        let page = src
            .fetch_entities(&EntityQuery::first_page("num", None, 4), &CancelToken::new())
            .unwrap();
        assert_eq!(page.entities.len(), 4);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn sorts_numerically_with_missing_first() {
        let src = source();
        let asc = src
            .fetch_entities(
                &EntityQuery::first_page("num", Some(SortSpec::asc("n")), 10),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(keys(&asc), vec!["b", "c", "a", "d"]);

        let desc = src
            .fetch_entities(
                &EntityQuery::first_page("num", Some(SortSpec::desc("n")), 10),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(keys(&desc), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn injected_failure_fires_once() {
        let src = source();
        src.fail_once("num", None, "boom");
        let query = EntityQuery::first_page("num", None, 2);
        assert_eq!(
            src.fetch_entities(&query, &CancelToken::new()),
            Err(ClientError::Injected("boom".into()))
        );
        assert!(src.fetch_entities(&query, &CancelToken::new()).is_ok());
        assert_eq!(src.served().len(), 2);
    }

    #[test]
    fn unknown_kind_is_not_found() {
        let err = source()
            .fetch_entities(&EntityQuery::first_page("nope", None, 2), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }

    #[test]
    fn demo_dataset_paginates() {
        let src = MockDataSource::demo();
        let kinds = src.fetch_kinds(&CancelToken::new()).unwrap();
        assert_eq!(kinds, vec!["user", "order", "product"]);
        let page = src
            .fetch_entities(&EntityQuery::first_page("order", None, 50), &CancelToken::new())
            .unwrap();
        assert_eq!(page.entities.len(), 50);
        assert!(page.has_more());
    }
}
