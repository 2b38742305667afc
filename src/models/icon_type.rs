use serde_json::{json, Map, Value};

use super::{apply_allow_list, sort_order_or_default};
use crate::error::ApiError;

/// Fields a partial update may touch. `code` identifies the row and is
/// deliberately absent.
pub const UPDATE_ALLOW_LIST: &[&str] =
    &["name", "svg_data", "background_color", "sort_order", "is_active"];

const CREATE_FIELDS: &[&str] =
    &["code", "name", "svg_data", "background_color", "sort_order", "is_active"];

/// `^[A-Z0-9]{2,20}$`, checked against the uppercased form.
fn is_valid_code(code: &str) -> bool {
    (2..=20).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// `^#[0-9A-Fa-f]{6}$`
fn is_valid_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

fn required_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

/// Validate an icon-type create payload and produce the row to insert.
/// The code is uppercased on the way through; unknown fields are rejected
/// rather than forwarded to the store.
pub fn validate_create(body: &Value) -> Result<Map<String, Value>, ApiError> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

    let code = required_string(body, "code");
    let name = required_string(body, "name");
    let svg_data = required_string(body, "svg_data");
    let (Some(code), Some(name), Some(svg_data)) = (code, name, svg_data) else {
        return Err(ApiError::bad_request(
            "Missing required fields: code, name, svg_data",
        ));
    };

    for key in object.keys() {
        if !CREATE_FIELDS.contains(&key.as_str()) {
            return Err(ApiError::bad_request(format!("Unknown field: {}", key)));
        }
    }

    let code = code.to_uppercase();
    if !is_valid_code(&code) {
        return Err(ApiError::bad_request(
            "Invalid code format. Must be 2-20 alphanumeric characters.",
        ));
    }

    let mut row = Map::new();
    row.insert("code".to_string(), json!(code));
    row.insert("name".to_string(), json!(name));
    row.insert("svg_data".to_string(), json!(svg_data));

    if let Some(color) = object.get("background_color") {
        if !color.is_null() {
            let valid = color.as_str().is_some_and(is_valid_hex_color);
            if !valid {
                return Err(ApiError::bad_request(
                    "Invalid background_color format. Must be a hex color code (e.g., #F7931A).",
                ));
            }
            row.insert("background_color".to_string(), color.clone());
        }
    }

    row.insert(
        "sort_order".to_string(),
        json!(sort_order_or_default(object.get("sort_order"))),
    );
    let is_active = object
        .get("is_active")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    row.insert("is_active".to_string(), json!(is_active));

    Ok(row)
}

/// Validate an icon-type update payload against the allow-list and produce
/// the write-patch. An empty patch is an error regardless of who asks.
pub fn validate_update(body: &Value) -> Result<Map<String, Value>, ApiError> {
    let patch = apply_allow_list(body, UPDATE_ALLOW_LIST);

    if let Some(color) = patch.get("background_color") {
        // null clears the color; anything else must be a hex code
        if !color.is_null() && !color.as_str().is_some_and(is_valid_hex_color) {
            return Err(ApiError::bad_request(
                "Invalid background_color format. Must be a hex color code (e.g., #F7931A).",
            ));
        }
    }

    if patch.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    Ok(patch)
}
