//! # Product Ids
//!
//! Ids are assigned on the device that creates the record, with no
//! coordination: base-36 milliseconds since the epoch, followed by a base-36
//! random suffix. The timestamp prefix keeps ids roughly creation-ordered;
//! the suffix makes two devices creating records in the same millisecond
//! collide only by chance.
//!
//! Nothing parses ids. They are opaque keys for the merge.
//!
//! ## Records Without an Id
//! Hand-edited files and very old exports may carry records with no `id`.
//! Those get an id derived from the record's own JSON (UUID v5), so every
//! parse of the same document yields the same ids and a repeated pull
//! recognizes the records it already merged.

use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh product id, e.g. `lx3k9a2q7f0c1vbn8w`.
pub fn generate_product_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let random = Uuid::new_v4().as_u128() as u64;
    format!("{}{}", to_base36(millis), to_base36(random))
}

/// Gives every object in `records` lacking a usable `id` one derived from
/// its content. Byte-identical records are told apart by occurrence.
/// Non-object entries are left for the caller's parser to reject.
pub fn fill_missing_ids(records: &mut [Value]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for record in records.iter_mut() {
        let Value::Object(fields) = record else {
            continue;
        };
        let has_id = matches!(fields.get("id"), Some(Value::String(id)) if !id.trim().is_empty());
        if has_id {
            continue;
        }
        fields.remove("id");

        let canonical = Value::Object(fields.clone()).to_string();
        let occurrence = seen.entry(canonical.clone()).or_insert(0);
        *occurrence += 1;
        let id = derived_product_id(&canonical, *occurrence);
        fields.insert("id".to_string(), Value::String(id));
    }
}

fn derived_product_id(canonical: &str, occurrence: usize) -> String {
    let key = format!("{}#{}", canonical, occurrence);
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes());
    format!("x{}", to_base36(uuid.as_u128() as u64))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::with_capacity(13);
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
