use async_trait::async_trait;
use serde_json::{json, Value};

use super::AsanaApi;
use crate::config::Config;
use crate::error::{ApiError, Error};

/// Bearer-token JSON client over reqwest.
pub struct HttpClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &Config, token: &str) -> Result<Self, Error> {
        if config.insecure_tls {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled"
            );
        }
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_tls)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            auth_header: format!("Bearer {token}"),
            client,
        })
    }
}

#[async_trait]
impl AsanaApi for HttpClient {
    async fn post(&self, path: &str, data: Value) -> Result<Value, ApiError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = resp.status();
        // Read the whole body first so error responses keep it verbatim.
        let body = resp.text().await.map_err(ApiError::Transport)?;
        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("invalid JSON ({e}): {body}")))
    }
}
