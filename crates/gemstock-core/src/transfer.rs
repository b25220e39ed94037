//! # Bulk Import / Export
//!
//! Export writes the whole collection as a pretty-printed JSON array. Import
//! accepts the same shape (and older files with legacy field spellings),
//! then either replaces the collection or appends to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::collection::Collection;
use crate::error::ImportError;
use crate::id::fill_missing_ids;
use crate::types::Product;

/// How imported records combine with the current collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Discard the current collection.
    Replace,
    /// Concatenate; ids are not deduplicated.
    Append,
}

/// Serializes the collection as a 2-space indented JSON array.
pub fn export_json(collection: &Collection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(collection)
}

/// Download name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("jewelry_inventory_{}.json", date.format("%Y-%m-%d"))
}

/// Parses an import file.
///
/// The document must be a non-empty JSON array whose every element reads as
/// a product record.
pub fn parse_import(text: &str) -> Result<Collection, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;

    let mut items = match value {
        Value::Array(items) => items,
        _ => return Err(ImportError::NotAnArray),
    };
    if items.is_empty() {
        return Err(ImportError::Empty);
    }
    fill_missing_ids(&mut items);

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Product>(item)
                .map_err(|e| ImportError::Malformed(format!("record {}: {}", index, e)))
        })
        .collect()
}

/// Combines `imported` with `current` according to `mode`.
pub fn apply_import(current: Collection, imported: Collection, mode: ImportMode) -> Collection {
    match mode {
        ImportMode::Replace => imported,
        ImportMode::Append => {
            let mut combined = current;
            combined.extend(imported);
            combined
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
