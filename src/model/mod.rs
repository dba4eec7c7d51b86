//! Wire data model: records, typed properties and API response envelopes.

mod record;
mod value;

pub use record::{KEY_FIELD, Property, Record};
pub use value::ValueKind;

use serde::Deserialize;

/// Response of `GET /api/kinds`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KindsResponse {
    #[serde(default)]
    pub kinds: Vec<String>,
}

/// One page of entities as returned by `GET /api/entities/{kind}/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawEntitiesPage")]
pub struct EntitiesPage {
    pub entities: Vec<Record>,
    /// `None` when the backend has no further pages.
    pub next_cursor: Option<String>,
}

impl EntitiesPage {
    pub fn new(entities: Vec<Record>, next_cursor: Option<String>) -> Self {
        Self {
            entities,
            next_cursor: next_cursor.filter(|c| !c.is_empty()),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

#[derive(Deserialize)]
struct RawEntitiesPage {
    #[serde(default)]
    entities: Option<Vec<Record>>,
    #[serde(default, rename = "nextCursor")]
    next_cursor: Option<String>,
}

impl From<RawEntitiesPage> for EntitiesPage {
    fn from(raw: RawEntitiesPage) -> Self {
        EntitiesPage::new(raw.entities.unwrap_or_default(), raw.next_cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor_means_no_more_pages() {
        let page: EntitiesPage =
            serde_json::from_str(r#"{"entities": [], "nextCursor": ""}"#).unwrap();
        assert!(!page.has_more());

        let page: EntitiesPage = serde_json::from_str(r#"{"entities": null}"#).unwrap();
        assert!(page.entities.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn cursor_is_kept_verbatim() {
        let json = r#"{
            "entities": [{"key": {"name": "key", "value": "k1", "type": "string"}}],
            "nextCursor": "CjASKmoL=="
        }"#;
        let page: EntitiesPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.entities.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("CjASKmoL=="));
    }

    #[test]
    fn kinds_response() {
        let resp: KindsResponse = serde_json::from_str(r#"{"kinds": ["user", "order"]}"#).unwrap();
        assert_eq!(resp.kinds, vec!["user", "order"]);
    }
}
