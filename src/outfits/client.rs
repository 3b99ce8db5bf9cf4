//! HTTP client for the outfit generation service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ConfigError};

use super::model::{GenerateRequest, GenerateResponse, ServiceMeta};

const META_PATH: &str = "/api/meta";
const GENERATE_PATH: &str = "/api/generate";

/// The remote recommendation service.
#[async_trait]
pub trait OutfitService: Send + Sync {
    /// Capability probe: does the server hold its own search key?
    async fn meta(&self) -> Result<ServiceMeta, ApiError>;

    /// Generate outfits for a finished intake.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError>;
}

/// `OutfitService` over HTTP/JSON.
pub struct HttpOutfitService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOutfitService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a JSON body, turning non-2xx replies into `ApiError::Status`.
    async fn read_json<T: DeserializeOwned>(
        endpoint: &str,
        resp: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = error_detail(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Onbekende fout").to_string());
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail,
            });
        }
        resp.json::<T>().await.map_err(|e| ApiError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pull `detail` out of an error body like `{"detail": "..."}`.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl OutfitService for HttpOutfitService {
    async fn meta(&self) -> Result<ServiceMeta, ApiError> {
        let resp = self
            .client
            .get(self.url(META_PATH))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: META_PATH.into(),
                reason: e.to_string(),
            })?;
        Self::read_json(META_PATH, resp).await
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        tracing::debug!(mode = %request.mode, base = %self.base_url, "Requesting outfits");
        let resp = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: GENERATE_PATH.into(),
                reason: e.to_string(),
            })?;
        Self::read_json(GENERATE_PATH, resp).await
    }
}
