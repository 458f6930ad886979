//! Deep merge of nested mappings.
//!
//! The merge is directional: `from` wins every conflict except when both
//! sides hold a mapping for the same key, in which case the two mappings are
//! merged recursively. Keys present only in `into` always survive.

use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Merge `from` into `into` in place.
pub fn merge(into: &mut Map<String, Value>, from: Map<String, Value>) {
    for (key, value) in from {
        match into.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
                (Value::Object(table), Value::Object(next)) => merge(table, next),
                (existing, value) => *existing = value,
            },
        }
    }
}

/// By-value form of [`merge`]: returns `into` with `from` merged over it.
pub fn merged(mut into: Map<String, Value>, from: Map<String, Value>) -> Map<String, Value> {
    merge(&mut into, from);
    into
}
