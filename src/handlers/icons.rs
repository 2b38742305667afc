use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{authenticate, extract_access_token, ApiResponse, ApiResult};
use crate::models::icon_type;
use crate::state::AppState;
use crate::supabase::Supabase;

const TABLE: &str = "icon_types";
const LIST_COLUMNS: &str = "id,code,name,svg_data,background_color,sort_order";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Management view: include inactive rows. Requires authentication.
    pub all: Option<bool>,
}

/// GET /api/icons - public list of active icon types, sorted by sort_order.
/// With `?all=true` the caller is gated and every row is returned.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> ApiResult<Vec<Value>> {
    let all = query.all.unwrap_or(false);
    if all {
        authenticate(&state, &headers).await?;
    }

    let supabase = Supabase::new(&state, extract_access_token(&headers));
    let query = if all {
        supabase.from(TABLE).select("*")
    } else {
        supabase.from(TABLE).select(LIST_COLUMNS).eq("is_active", "true")
    };
    let rows = query.order_asc("sort_order").fetch().await?;

    Ok(ApiResponse::success(rows))
}

/// POST /api/icons - create a new icon type.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Value> {
    authenticate(&state, &headers).await?;

    let body: Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))?;
    let row = icon_type::validate_create(&body)?;
    let code = row["code"].as_str().unwrap_or_default().to_string();

    let supabase = Supabase::new(&state, extract_access_token(&headers));

    // Pre-flight duplicate check; a store-side unique violation surfaces as
    // the same 409 if a concurrent insert wins the race.
    let existing = supabase
        .from(TABLE)
        .select("id")
        .eq("code", &code)
        .limit(1)
        .fetch()
        .await?;
    if !existing.is_empty() {
        return Err(ApiError::conflict("Icon code already exists"));
    }

    let created = supabase
        .from(TABLE)
        .insert(Value::Object(row))
        .await
        .map_err(|e| match e {
            crate::supabase::SupabaseError::UniqueViolation(_) => {
                ApiError::conflict("Icon code already exists")
            }
            other => other.into(),
        })?;

    Ok(ApiResponse::created(created))
}

/// PUT /api/icons/:code - partial update of one icon type selected by code.
pub async fn update(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Value> {
    authenticate(&state, &headers).await?;

    let code = code.to_uppercase();
    let body: Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))?;
    let patch = icon_type::validate_update(&body)?;

    let supabase = Supabase::new(&state, extract_access_token(&headers));
    let rows = supabase
        .from(TABLE)
        .eq("code", &code)
        .update(Value::Object(patch))
        .await?;

    let updated = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("Icon type not found"))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/icons/:code - delete one icon type, refused while any QR
/// code still references it.
pub async fn delete(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> ApiResult<()> {
    authenticate(&state, &headers).await?;

    let code = code.to_uppercase();
    let supabase = Supabase::new(&state, extract_access_token(&headers));

    let referencing = supabase
        .from("qr_codes")
        .select("id")
        .eq("icon_type", &code)
        .limit(1)
        .fetch()
        .await?;
    if !referencing.is_empty() {
        return Err(ApiError::conflict(
            "Cannot delete icon type that is being used by QR codes. \
             Please update or delete those QR codes first.",
        ));
    }

    supabase.from(TABLE).eq("code", &code).delete().await?;

    Ok(ApiResponse::message("Icon type deleted"))
}
