//! Column inference for schema-less records.

use std::collections::BTreeSet;

use crate::model::{KEY_FIELD, Record};

/// Union of all field names across `records`.
///
/// `key` is pinned first when any record has it; the remaining names follow
/// in lexicographic order. The result depends only on the set of names, not
/// on record order.
pub fn infer_columns(records: &[Record]) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().flat_map(Record::fields).collect();

    let mut columns = Vec::with_capacity(names.len());
    if names.contains(KEY_FIELD) {
        columns.push(KEY_FIELD.to_string());
    }
    columns.extend(
        names
            .into_iter()
            .filter(|name| *name != KEY_FIELD)
            .map(str::to_string),
    );
    columns
}
