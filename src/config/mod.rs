use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration, resolved once at startup from the environment
/// and passed explicitly through router state. Nothing here is a process-wide
/// singleton; handlers only see the copy carried by `AppState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the hosted Supabase project, e.g. https://xyz.supabase.co
    pub supabase_url: String,
    /// Public (anon) API key. Sent as `apikey` on every store request.
    pub supabase_anon_key: String,
    /// Storage bucket that holds uploaded QR images.
    pub storage_bucket: String,
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("SUPABASE_URL is not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_URL"))?
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&supabase_url)?;
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_ANON_KEY"))?;

        let storage_bucket =
            env::var("SUPABASE_STORAGE_BUCKET").unwrap_or_else(|_| "qr-images".to_string());

        // Allow tests or deployments to override the port via env
        let port = env::var("QR_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            storage_bucket,
            port,
        })
    }
}
