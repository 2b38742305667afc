use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::state::AppState;
use crate::supabase::Supabase;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Authenticated caller, produced by the auth gate from a validated token.
/// Built per request and never persisted.
#[derive(Clone, Debug)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

/// Pull the bearer credential out of the request headers.
///
/// The `Authorization: Bearer <token>` header wins; the `sb-access-token`
/// cookie is the fallback. Returns `None` for anonymous callers.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let cookie = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookie.split(';').find_map(|pair| {
        let pair = pair.trim_start();
        let value = pair.strip_prefix("sb-access-token=")?;
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

/// The auth gate. Validates the caller's credential against the hosted auth
/// provider and returns the resulting principal; every privileged handler
/// calls this before touching the store. An absent credential fails
/// immediately, before any call leaves the process.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = extract_access_token(headers)
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let supabase = Supabase::new(state, Some(token));
    let user = supabase
        .get_user()
        .await
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    Ok(Principal {
        id: user.id,
        email: user.email,
    })
}
