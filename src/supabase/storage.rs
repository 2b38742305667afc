use serde::Deserialize;

use super::{Supabase, SupabaseError};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "Key")]
    key: Option<String>,
}

/// Result of a successful object upload.
#[derive(Debug)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
}

impl Supabase<'_> {
    /// Upload an object into the configured bucket. Overwrites are refused:
    /// the request never sets `x-upsert`, so an existing object under the
    /// same name comes back as a conflict.
    pub async fn upload_object(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, SupabaseError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url(),
            self.bucket(),
            name
        );
        let response = self
            .authorize(self.http().post(&url))
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .get("message")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .unwrap_or("storage upload failed")
                .to_string();
            // The storage API reports an existing key as "Duplicate" /
            // "The resource already exists"
            if status.as_u16() == 409
                || message.contains("Duplicate")
                || message.contains("already exists")
            {
                return Err(SupabaseError::UniqueViolation(message));
            }
            if status.as_u16() == 401 {
                return Err(SupabaseError::Unauthorized);
            }
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;
        let path = parsed
            .key
            .unwrap_or_else(|| format!("{}/{}", self.bucket(), name));

        Ok(StoredObject {
            path,
            public_url: self.public_url(name),
        })
    }

    /// Public download URL for an object in the configured bucket.
    pub fn public_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            self.bucket(),
            name
        )
    }
}
