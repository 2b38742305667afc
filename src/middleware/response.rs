use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that automatically adds the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    body: Body<T>,
    status_code: StatusCode,
}

#[derive(Debug)]
enum Body<T: Serialize> {
    Data(T),
    Message(String),
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            body: Body::Data(data),
            status_code: StatusCode::OK,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            body: Body::Data(data),
            status_code: StatusCode::CREATED,
        }
    }
}

impl ApiResponse<()> {
    /// Create a 200 response carrying a `message` instead of `data`,
    /// used by delete confirmations and logout
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            body: Body::Message(message.into()),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = match self.body {
            Body::Message(message) => json!({
                "success": true,
                "message": message
            }),
            Body::Data(data) => {
                let value = match serde_json::to_value(&data) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::error!("Failed to serialize response data: {}", e);
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({
                                "success": false,
                                "error": "Internal server error"
                            })),
                        )
                            .into_response();
                    }
                };
                json!({
                    "success": true,
                    "data": value
                })
            }
        };

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Handler return type: success envelope or taxonomy error
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
