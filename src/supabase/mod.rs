//! Request-scoped client for the hosted Supabase services: the PostgREST
//! data API, the GoTrue auth API and the Storage API. Each handler builds a
//! handle via [`Supabase::new`] from the shared state plus the caller's own
//! credential; no elevated service-key client exists in this codebase.

pub mod auth;
pub mod postgrest;
pub mod storage;

pub use auth::AuthUser;
pub use postgrest::Query;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UniqueViolation(String),

    #[error("store error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Handle onto the external store, scoped to one request.
pub struct Supabase<'a> {
    state: &'a AppState,
    credential: Option<String>,
}

impl<'a> Supabase<'a> {
    pub fn new(state: &'a AppState, credential: Option<String>) -> Self {
        Self { state, credential }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.state.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.state.config.supabase_url
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.state.config.supabase_anon_key
    }

    pub(crate) fn bucket(&self) -> &str {
        &self.state.config.storage_bucket
    }

    /// Bearer value for the Authorization header: the caller's credential
    /// when present, otherwise the anon key (anonymous reads).
    pub(crate) fn bearer(&self) -> &str {
        self.credential.as_deref().unwrap_or(self.anon_key())
    }

    /// Apply the standard auth headers to an outgoing store request.
    pub(crate) fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.anon_key())
            .bearer_auth(self.bearer())
    }
}

/// Read the store's JSON error body into the closest error variant.
pub(crate) async fn error_from_response(response: reqwest::Response) -> SupabaseError {
    let status = response.status().as_u16();
    let body: serde_json::Value = response.json().await.unwrap_or_default();

    let message = body
        .get("message")
        .or_else(|| body.get("msg"))
        .or_else(|| body.get("error_description"))
        .or_else(|| body.get("error"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown store error")
        .to_string();

    let code = body.get("code").and_then(|v| v.as_str()).unwrap_or("");

    if status == 401 {
        return SupabaseError::Unauthorized;
    }
    if status == 404 {
        return SupabaseError::NotFound(message);
    }
    // Postgres unique_violation, surfaced by PostgREST as 409/23505
    if status == 409 || code == "23505" {
        return SupabaseError::UniqueViolation(message);
    }
    SupabaseError::Api { status, message }
}
