//! Admin client for Supabase-compatible object storage
//!
//! The client only exists when both the project URL and the service key are
//! configured. It is stateless: the service key is sent with every request
//! and nothing is refreshed or persisted.

use crate::config::ObjectStorageSettings;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Bucket used when none is configured
pub const DEFAULT_BUCKET: &str = "resumes";

#[derive(Debug, Error)]
pub enum ObjectStorageError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ObjectStorageError>;

/// Resolve the bucket name, falling back to [`DEFAULT_BUCKET`]
pub fn bucket_name(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BUCKET)
        .to_string()
}

#[derive(Debug, Clone)]
pub struct ObjectStorageClient {
    http: Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ObjectStorageClient {
    /// Build a client if both URL and service key are present
    pub fn from_settings(settings: &ObjectStorageSettings) -> Option<Self> {
        Self::new(
            settings.url.as_deref(),
            settings.service_key.as_deref(),
            settings.bucket.as_deref(),
        )
    }

    pub fn new(url: Option<&str>, service_key: Option<&str>, bucket: Option<&str>) -> Option<Self> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        let service_key = service_key.map(str::trim).filter(|k| !k.is_empty())?;

        let base_url = match Url::parse(url.trim_end_matches('/')) {
            Ok(base_url) if !base_url.cannot_be_a_base() => base_url,
            Ok(_) => {
                tracing::error!("Object storage URL cannot have a path: {}", url);
                return None;
            }
            Err(e) => {
                tracing::error!("Invalid object storage URL {}: {}", url, e);
                return None;
            }
        };

        let http = match Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
        {
            Ok(http) => http,
            Err(e) => {
                tracing::error!("Failed to build object storage HTTP client: {}", e);
                return None;
            }
        };

        Some(Self {
            http,
            base_url,
            service_key: service_key.to_string(),
            bucket: bucket_name(bucket),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `{base}/storage/v1/object/{prefix..}/{bucket}/{path}` with every
    /// segment percent-encoded
    fn endpoint(&self, prefix: &[&str], path: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object"])
                .extend(prefix)
                .push(&self.bucket)
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.into()
    }

    fn object_url(&self, path: &str) -> String {
        self.endpoint(&[], path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Upload (or overwrite) an object in the bucket
    pub async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let response = self
            .authorized(self.http.post(self.object_url(path)))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        check_status(response).await?;
        tracing::debug!(bucket = %self.bucket, path = %path, "Uploaded object");
        Ok(())
    }

    /// Create a time-limited download URL for an object
    pub async fn create_signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String> {
        let url = self.endpoint(&["sign"], path);

        let response = self
            .authorized(self.http.post(url))
            .json(&json!({ "expiresIn": expires_in_secs }))
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| ObjectStorageError::Parse(e.to_string()))?;

        // The API answers with a path relative to /storage/v1
        if body.signed_url.starts_with("http") {
            Ok(body.signed_url)
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            Ok(format!("{base}/storage/v1{}", body.signed_url))
        }
    }

    /// Delete objects from the bucket
    pub async fn remove(&self, paths: &[&str]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let url = self.endpoint(&[], "");
        let response = self
            .authorized(self.http.delete(url))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body
            .message
            .or(body.error)
            .unwrap_or_else(|| status_text(status)),
        Err(_) => status_text(status),
    };

    Err(ObjectStorageError::Api {
        status: status.as_u16(),
        message,
    })
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_defaults_to_resumes() {
        assert_eq!(bucket_name(None), "resumes");
        assert_eq!(bucket_name(Some("  ")), "resumes");
        assert_eq!(bucket_name(Some("exports")), "exports");
    }

    #[test]
    fn client_requires_url_and_key() {
        assert!(ObjectStorageClient::new(None, Some("key"), None).is_none());
        assert!(ObjectStorageClient::new(Some("https://p.supabase.co"), None, None).is_none());
        assert!(ObjectStorageClient::new(Some(""), Some("key"), None).is_none());

        let client =
            ObjectStorageClient::new(Some("https://p.supabase.co/"), Some("key"), None).unwrap();
        assert_eq!(client.bucket(), "resumes");
        assert_eq!(
            client.object_url("/u1/resume.pdf"),
            "https://p.supabase.co/storage/v1/object/resumes/u1/resume.pdf"
        );
    }

    #[test]
    fn object_paths_are_percent_encoded() {
        let client =
            ObjectStorageClient::new(Some("https://p.supabase.co"), Some("key"), None).unwrap();

        assert_eq!(
            client.object_url("u1/my cv#2?.pdf"),
            "https://p.supabase.co/storage/v1/object/resumes/u1/my%20cv%232%3F.pdf"
        );
        assert_eq!(
            client.endpoint(&["sign"], "u1/a.pdf"),
            "https://p.supabase.co/storage/v1/object/sign/resumes/u1/a.pdf"
        );
    }

    #[test]
    fn invalid_url_yields_no_client() {
        assert!(ObjectStorageClient::new(Some("not a url"), Some("key"), None).is_none());
    }

    #[test]
    fn from_settings_uses_configured_bucket() {
        let settings = ObjectStorageSettings {
            url: Some("https://p.supabase.co".to_string()),
            service_key: Some("key".to_string()),
            bucket: Some("exports".to_string()),
        };

        let client = ObjectStorageClient::from_settings(&settings).unwrap();
        assert_eq!(client.bucket(), "exports");
    }
}
