use serde::{Deserialize, Serialize};

use super::{error_from_response, Supabase, SupabaseError};

/// User record as returned by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Session issued by the password grant.
#[derive(Debug, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Supabase<'_> {
    /// Password sign-in against the provider. Any provider-side failure is
    /// reported as `Unauthorized`; the distinction between wrong credentials
    /// and provider errors is deliberately not leaked to callers.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, SupabaseError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url());
        let response = self
            .http()
            .post(&url)
            .header("apikey", self.anon_key())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("password grant rejected ({})", response.status());
            return Err(SupabaseError::Unauthorized);
        }

        let session = response
            .json::<Session>()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;
        Ok(session)
    }

    /// "Get current user for this token" — the auth gate's validation call.
    pub async fn get_user(&self) -> Result<AuthUser, SupabaseError> {
        let url = format!("{}/auth/v1/user", self.base_url());
        let response = self.authorize(self.http().get(&url)).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))
    }
}
