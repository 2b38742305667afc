use serde_json::{json, Map, Value};

use super::{apply_allow_list, sort_order_or_default};
use crate::error::ApiError;

/// Icon codes a QR code may reference. Kept in sync with the icon_types
/// table in principle; the enumeration is the write-time gate.
pub const VALID_ICON_TYPES: &[&str] = &["BTC", "ETH", "XRP", "USDT"];

pub const VALID_DISPLAY_TYPES: &[&str] = &["name", "url"];

/// Fields a partial update may touch. `id` selects the row.
pub const UPDATE_ALLOW_LIST: &[&str] = &[
    "name",
    "filename",
    "image_url",
    "display_url",
    "icon_type",
    "sort_order",
    "is_active",
    "display_type",
];

fn icon_type_error() -> ApiError {
    ApiError::bad_request(format!(
        "Invalid icon_type. Must be one of: {}",
        VALID_ICON_TYPES.join(", ")
    ))
}

fn display_type_error() -> ApiError {
    ApiError::bad_request(format!(
        "Invalid display_type. Must be one of: {}",
        VALID_DISPLAY_TYPES.join(", ")
    ))
}

fn required_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

/// Validate a QR-code create payload and produce the row to insert.
pub fn validate_create(body: &Value) -> Result<Map<String, Value>, ApiError> {
    let object = body
        .as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;

    let name = required_string(body, "name");
    let filename = required_string(body, "filename");
    let image_url = required_string(body, "image_url");
    let display_url = required_string(body, "display_url");
    let icon_type = required_string(body, "icon_type");
    let (Some(name), Some(filename), Some(image_url), Some(display_url), Some(icon_type)) =
        (name, filename, image_url, display_url, icon_type)
    else {
        return Err(ApiError::bad_request(
            "Missing required fields: name, filename, image_url, display_url, icon_type",
        ));
    };

    if !VALID_ICON_TYPES.contains(&icon_type) {
        return Err(icon_type_error());
    }

    let display_type = match object.get("display_type") {
        None | Some(Value::Null) => "name",
        Some(value) => value
            .as_str()
            .filter(|s| VALID_DISPLAY_TYPES.contains(s))
            .ok_or_else(display_type_error)?,
    };

    let mut row = Map::new();
    row.insert("name".to_string(), json!(name));
    row.insert("filename".to_string(), json!(filename));
    row.insert("image_url".to_string(), json!(image_url));
    row.insert("display_url".to_string(), json!(display_url));
    row.insert("icon_type".to_string(), json!(icon_type));
    row.insert(
        "sort_order".to_string(),
        json!(sort_order_or_default(object.get("sort_order"))),
    );
    row.insert("display_type".to_string(), json!(display_type));
    let is_active = object
        .get("is_active")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    row.insert("is_active".to_string(), json!(is_active));

    Ok(row)
}

/// Validate a QR-code update payload against the allow-list and produce the
/// write-patch.
pub fn validate_update(body: &Value) -> Result<Map<String, Value>, ApiError> {
    let patch = apply_allow_list(body, UPDATE_ALLOW_LIST);

    if let Some(icon_type) = patch.get("icon_type") {
        if !icon_type.is_null()
            && !icon_type
                .as_str()
                .is_some_and(|s| VALID_ICON_TYPES.contains(&s))
        {
            return Err(icon_type_error());
        }
    }

    if let Some(display_type) = patch.get("display_type") {
        if !display_type.is_null()
            && !display_type
                .as_str()
                .is_some_and(|s| VALID_DISPLAY_TYPES.contains(&s))
        {
            return Err(display_type_error());
        }
    }

    if patch.is_empty() {
        return Err(ApiError::bad_request("No valid fields to update"));
    }
    Ok(patch)
}
