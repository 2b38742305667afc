//! Per-resource validation rules and the partial-update merger. Rows flow
//! through this layer as plain JSON values; the external store owns the
//! schema, this layer owns the write-side rules.

pub mod icon_type;
pub mod qr_code;

use serde_json::{Map, Value};

/// Restrict a submitted object to the allow-listed keys that are present.
///
/// A JSON `null` counts as present and is forwarded; only absent keys are
/// skipped, so omitted fields are never touched on the stored row.
/// Identifier fields select the row and are never part of an allow-list.
pub fn apply_allow_list(body: &Value, allow_list: &[&str]) -> Map<String, Value> {
    let mut patch = Map::new();
    if let Some(object) = body.as_object() {
        for &field in allow_list {
            if let Some(value) = object.get(field) {
                patch.insert(field.to_string(), value.clone());
            }
        }
    }
    patch
}

/// Coerce a submitted sort_order to an integer, defaulting to 0. String
/// digits are accepted for parity with form-encoded clients.
pub(crate) fn sort_order_or_default(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
