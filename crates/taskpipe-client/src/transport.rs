//! HTTP transport seam.
//!
//! The fetch logic talks to a [`Transport`] rather than to reqwest directly,
//! so pagination, retry and sub-fetch behavior are testable with scripted
//! responses.

use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// One-method seam over "GET a JSON resource from the upstream API".
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (relative to the API root) with the given query pairs.
    ///
    /// A non-2xx upstream response is an [`ApiError::UpstreamStatus`];
    /// network-level failures are [`ApiError::Transport`].
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError>;
}

/// The reqwest-backed production transport.
///
/// Carries the static Authorization token and the per-request timeout; one
/// instance is shared across all requests of a process.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
