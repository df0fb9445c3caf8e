//! Raw API Port - Object-safe HTTP boundary
//!
//! `RawApiPort` moves untyped JSON to and from the backend. It is stored behind
//! `Arc<dyn RawApiPort>` so the controller never depends on the HTTP adapter.
//! The typed contract client (`application::api::Api`) sits on top and owns
//! envelope checking and deserialization.
//!
//! A response with a non-2xx status but a JSON body is returned as `Ok`: the
//! backend reports application failures inside the body, and the caller decides.

use serde_json::Value;

/// Transport-tier failures: the request never produced a usable JSON body
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout...
    #[error("Request failed: {0}")]
    Network(String),
    /// The body was not JSON or did not have the expected shape
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
    #[error("Failed to serialize request: {0}")]
    Serialize(String),
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait::async_trait]
pub trait RawApiPort: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// POST without a request body
    async fn post_empty(&self, path: &str) -> Result<Value, ApiError>;
}
