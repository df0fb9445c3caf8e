//! HTTP adapter for the simulation backend
//!
//! Implements `RawApiPort` with `reqwest`. Bodies are read as text first so a
//! non-JSON response can be reported with its HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

use crate::ports::outbound::{ApiError, RawApiPort};

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Client for the backend's JSON API
#[derive(Clone)]
pub struct HttpApiAdapter {
    client: Client,
    base_url: Url,
}

impl HttpApiAdapter {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid endpoint {path}: {e}")))
    }

    async fn read_json(path: &str, response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match serde_json::from_str(&text) {
            Ok(value) => {
                if !status.is_success() {
                    // The envelope inside carries the real outcome
                    tracing::debug!("{} answered HTTP {} with a JSON body", path, status);
                }
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("{} answered HTTP {} with a non-JSON body", path, status);
                Err(ApiError::InvalidBody(format!("HTTP {status}: {e}")))
            }
        }
    }
}

#[async_trait]
impl RawApiPort for HttpApiAdapter {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("GET {} failed: {}", path, e);
            ApiError::Network(e.to_string())
        })?;

        Self::read_json(path, response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("POST {} failed: {}", path, e);
                ApiError::Network(e.to_string())
            })?;

        Self::read_json(path, response).await
    }

    async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let response = self.client.post(url).send().await.map_err(|e| {
            tracing::error!("POST {} failed: {}", path, e);
            ApiError::Network(e.to_string())
        })?;

        Self::read_json(path, response).await
    }
}
