use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{authenticate, extract_access_token, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::supabase::Supabase;

struct UploadedFile {
    original_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid multipart form data"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("Invalid multipart form data"))?
            .to_vec();
        return Ok(Some(UploadedFile {
            original_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// Collision-resistant stored name: request time in millis plus the
/// original extension, lowercased. Strips whatever the client called the
/// file, which may not be storage-safe.
fn generated_name(original_name: &str, now_millis: i64) -> String {
    let extension = original_name
        .rsplit('.')
        .next()
        .unwrap_or("bin")
        .to_lowercase();
    format!("qr_{}.{}", now_millis, extension)
}

/// POST /api/upload - store an image in the object bucket and return its
/// public URL. Overwriting an existing object is refused by the store.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Value> {
    authenticate(&state, &headers).await?;

    let file = read_file_field(multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    if !file.content_type.starts_with("image/") {
        return Err(ApiError::bad_request("File must be an image"));
    }

    let name = generated_name(&file.original_name, Utc::now().timestamp_millis());

    let supabase = Supabase::new(&state, extract_access_token(&headers));
    let stored = supabase
        .upload_object(&name, &file.content_type, file.bytes)
        .await?;

    Ok(ApiResponse::success(json!({
        "filename": name,
        "original_filename": file.original_name,
        "image_url": stored.public_url,
        "path": stored.path,
    })))
}
