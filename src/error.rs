// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to the uniform error envelope
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

// Translate external-store failures into the closest taxonomy entry.
impl From<crate::supabase::SupabaseError> for ApiError {
    fn from(err: crate::supabase::SupabaseError) -> Self {
        match err {
            crate::supabase::SupabaseError::Unauthorized => {
                ApiError::unauthorized("Invalid or expired token")
            }
            crate::supabase::SupabaseError::NotFound(msg) => ApiError::not_found(msg),
            crate::supabase::SupabaseError::UniqueViolation(msg) => ApiError::conflict(msg),
            crate::supabase::SupabaseError::Api { status, message } => {
                // Don't expose raw store errors to clients
                tracing::error!("Supabase error ({}): {}", status, message);
                ApiError::internal_server_error("Internal server error")
            }
            crate::supabase::SupabaseError::Http(e) => {
                tracing::error!("Supabase request failed: {}", e);
                ApiError::internal_server_error("Internal server error")
            }
            crate::supabase::SupabaseError::Decode(e) => {
                tracing::error!("Supabase response decode failed: {}", e);
                ApiError::internal_server_error("Internal server error")
            }
        }
    }
}
