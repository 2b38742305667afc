use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{authenticate, extract_access_token, ApiResponse, ApiResult};
use crate::models::qr_code;
use crate::state::AppState;
use crate::supabase::Supabase;

const TABLE: &str = "qr_codes";
const LIST_COLUMNS: &str =
    "id,name,filename,image_url,display_url,icon_type,sort_order,display_type";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Management view: include inactive rows. Requires authentication.
    pub all: Option<bool>,
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request("Invalid QR code ID"))
}

/// GET /api/qr - public list of active QR codes, sorted by sort_order.
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

/// POST /api/qr-create - create a new QR code.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Value> {
    authenticate(&state, &headers).await?;

    let body: Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))?;
    let row = qr_code::validate_create(&body)?;

    let supabase = Supabase::new(&state, extract_access_token(&headers));
    let created = supabase.from(TABLE).insert(Value::Object(row)).await?;

    Ok(ApiResponse::created(created))
}

/// PUT /api/qr/:id - partial update of one QR code selected by id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Value> {
    authenticate(&state, &headers).await?;

    let id = parse_id(&id)?;
    let body: Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))?;
    let patch = qr_code::validate_update(&body)?;

    let supabase = Supabase::new(&state, extract_access_token(&headers));
    let rows = supabase
        .from(TABLE)
        .eq("id", id)
        .update(Value::Object(patch))
        .await?;

    let updated = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::not_found("QR code not found"))?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/qr/:id - delete one QR code.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<()> {
    authenticate(&state, &headers).await?;

    let id = parse_id(&id)?;
    let supabase = Supabase::new(&state, extract_access_token(&headers));
    supabase.from(TABLE).eq("id", id).delete().await?;

    Ok(ApiResponse::message("QR code deleted"))
}
