use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::auth::{authenticate, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::middleware::ApiResponse;
use crate::state::AppState;
use crate::supabase::Supabase;

const SESSION_MAX_AGE: u64 = 60 * 60 * 24 * 7; // 7 days

fn session_cookie(name: &str, value: &str, max_age: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Strict; Max-Age={}",
        name, value, max_age
    )
}

/// POST /api/auth/login - password sign-in against the auth provider.
/// Sets the session cookie pair and also returns the access token in the
/// body for clients that prefer header-based auth.
pub async fn login(State(state): State<AppState>, body: String) -> Result<Response, ApiError> {
    let body: Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))?;

    let email = body.get("email").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let supabase = Supabase::new(&state, None);
    let session = supabase
        .sign_in_with_password(email, password)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            session_cookie(ACCESS_TOKEN_COOKIE, &session.access_token, SESSION_MAX_AGE),
        ),
        (
            SET_COOKIE,
            session_cookie(REFRESH_TOKEN_COOKIE, &session.refresh_token, SESSION_MAX_AGE),
        ),
    ]);

    let body = ApiResponse::success(json!({
        "user": {
            "id": session.user.id,
            "email": session.user.email,
        },
        "access_token": session.access_token,
        "expires_at": session.expires_at,
    }));

    Ok((cookies, body).into_response())
}

/// POST /api/auth/logout - expire the session cookie pair. Never calls the
/// provider and always succeeds.
pub async fn logout() -> Response {
    let cookies = AppendHeaders([
        (SET_COOKIE, session_cookie(ACCESS_TOKEN_COOKIE, "", 0)),
        (SET_COOKIE, session_cookie(REFRESH_TOKEN_COOKIE, "", 0)),
    ]);

    (cookies, ApiResponse::message("Logged out successfully")).into_response()
}

/// GET /api/auth/verify - report the authenticated caller.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<Value>, ApiError> {
    let principal = authenticate(&state, &headers).await?;
    Ok(ApiResponse::success(json!({
        "id": principal.id,
        "email": principal.email,
    })))
}
