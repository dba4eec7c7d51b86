//! Schema-less entity records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ValueKind;

/// Name of the field that identifies a record. Pinned as the first column.
pub const KEY_FIELD: &str = "key";

/// One named, typed property of a record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub name: String,
    /// Raw string representation of the value.
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    #[serde(default)]
    pub indexed: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
            indexed: true,
        }
    }

    pub fn unindexed(mut self) -> Self {
        self.indexed = false;
        self
    }
}

/// A single entity: field name -> property. Any field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Property>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert keyed by the property's name.
    pub fn with(mut self, property: Property) -> Self {
        self.insert(property);
        self
    }

    pub fn insert(&mut self, property: Property) {
        self.fields.insert(property.name.clone(), property);
    }

    pub fn get(&self, field: &str) -> Option<&Property> {
        self.fields.get(field)
    }

    /// Field names in lexicographic order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the `key` field, if present.
    pub fn key(&self) -> Option<&str> {
        self.get(KEY_FIELD).map(|p| p.value.as_str())
    }
}

impl FromIterator<Property> for Record {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut record = Record::new();
        for property in iter {
            record.insert(property);
        }
        record
    }
}
