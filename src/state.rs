use crate::config::AppConfig;

/// Shared router state: explicit configuration plus one `reqwest::Client`.
///
/// The client is the only cached resource in the process. It owns the
/// connection pool to the external store; every request-scoped Supabase
/// handle borrows it rather than constructing a fresh client per call.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}
