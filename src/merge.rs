//! Deep merge of plain JSON structures.
//!
//! Objects merge key by key, recursively. Anything else (scalars, arrays,
//! an object meeting a non-object) is replaced by the right-hand side.

use serde_json::{Map, Value};

pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => merge_maps(base, overlay),
        (base, overlay) => *base = overlay,
    }
}

pub fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        if let Some(existing) = base.get_mut(&key) {
            deep_merge(existing, value);
        } else {
            base.insert(key, value);
        }
    }
}
