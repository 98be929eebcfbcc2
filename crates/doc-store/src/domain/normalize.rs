//! Upload normalization for tabular documents.
//!
//! Spreadsheet-style clients expect every row of a table to carry the same
//! columns. When enabled, uploads that are arrays of row objects are padded:
//!
//! - The column set is the union of keys over all object rows.
//! - A column is a nested-table column when any row holds an array for it.
//!   Missing nested-table columns become `[]`, other missing columns `null`.
//! - Sub-columns of a nested-table column are taken from the objects of the
//!   first row whose value for that column is a non-empty array (not the
//!   union over all rows). Every object inside that column's arrays is padded
//!   with `null` for the sub-columns it lacks.
//!
//! Non-array roots and non-object rows are left untouched.

use crate::domain::Document;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Pad the rows of a tabular upload in place.
///
/// Returns `true` if the document is a table and was processed.
pub fn normalize_table(document: &mut Document) -> bool {
    let Value::Array(rows) = document else {
        return false;
    };

    let columns = collect_columns(rows);
    let nested = collect_nested_columns(rows);

    for row in rows.iter_mut() {
        let Value::Object(fields) = row else {
            continue;
        };

        for column in &columns {
            if !fields.contains_key(column) {
                let filler = if nested.contains_key(column) {
                    Value::Array(Vec::new())
                } else {
                    Value::Null
                };
                fields.insert(column.clone(), filler);
            }
        }

        for (column, sub_columns) in &nested {
            if let Some(Value::Array(items)) = fields.get_mut(column) {
                for item in items.iter_mut() {
                    if let Value::Object(sub_fields) = item {
                        pad_with_null(sub_fields, sub_columns);
                    }
                }
            }
        }
    }

    true
}

fn collect_columns(rows: &[Value]) -> BTreeSet<String> {
    rows.iter()
        .filter_map(Value::as_object)
        .flat_map(|fields| fields.keys().cloned())
        .collect()
}

/// Nested-table columns mapped to the sub-columns of their first populated occurrence.
fn collect_nested_columns(rows: &[Value]) -> BTreeMap<String, BTreeSet<String>> {
    let mut nested: BTreeMap<String, Option<BTreeSet<String>>> = BTreeMap::new();

    for fields in rows.iter().filter_map(Value::as_object) {
        for (column, value) in fields {
            let Value::Array(items) = value else {
                continue;
            };
            let slot = nested.entry(column.clone()).or_insert(None);
            if slot.is_none() && !items.is_empty() {
                let sub_columns = items
                    .iter()
                    .filter_map(Value::as_object)
                    .flat_map(|sub| sub.keys().cloned())
                    .collect();
                *slot = Some(sub_columns);
            }
        }
    }

    nested
        .into_iter()
        .map(|(column, subs)| (column, subs.unwrap_or_default()))
        .collect()
}

fn pad_with_null(fields: &mut Map<String, Value>, columns: &BTreeSet<String>) {
    for column in columns {
        if !fields.contains_key(column) {
            fields.insert(column.clone(), Value::Null);
        }
    }
}
