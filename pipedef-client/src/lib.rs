//! Pipedef HTTP Client
//!
//! A simple, type-safe HTTP client for the remote pipeline service.
//!
//! The service speaks a JSON RPC dialect: every operation is a `POST` to the
//! endpoint root, selected by the `X-Amz-Target` header. Request signing is
//! not handled here; pass a preconfigured [`reqwest::Client`] through
//! [`DataPipelineClient::with_client`] when the endpoint requires it.
//!
//! # Example
//!
//! ```no_run
//! use pipedef_client::{DataPipelineClient, PipelineApi};
//! use pipedef_core::dto::pipeline::ActivatePipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DataPipelineClient::new("http://localhost:4566");
//!
//!     client
//!         .activate_pipeline(ActivatePipeline {
//!             pipeline_id: "df-0123456789".to_string(),
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
mod pipelines;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use pipelines::PipelineApi;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Content type of every request body
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Prefix of the operation selector header value
const TARGET_PREFIX: &str = "DataPipeline";

/// HTTP client for the pipeline service
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DataPipelineClient {
    /// Service endpoint (e.g., "https://datapipeline.us-east-1.amazonaws.com")
    endpoint: String,
    /// HTTP client instance
    client: Client,
}

impl DataPipelineClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint` - The service endpoint URL
    ///
    /// # Example
    /// ```
    /// use pipedef_client::DataPipelineClient;
    ///
    /// let client = DataPipelineClient::new("http://localhost:4566");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use pipedef_client::DataPipelineClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = DataPipelineClient::with_client("http://localhost:4566", http_client);
    /// ```
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the service endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // =============================================================================
    // Transport
    // =============================================================================

    /// Invoke one service operation and deserialize its JSON response
    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        tracing::debug!("Calling {} on {}", target, self.endpoint);

        let response = self
            .client
            .post(format!("{}/", self.endpoint))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header("X-Amz-Target", target)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle a service response
    ///
    /// Non-2xx responses are decoded into [`ClientError::Service`]. Empty
    /// success bodies deserialize as `{}`.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        parse_body(status.as_u16(), &body)
    }
}

/// Turn a response status and body into a typed result
///
/// An empty success body is read as `{}`.
fn parse_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(ClientError::from_response_body(status, body));
    }

    let body = if body.trim().is_empty() { "{}" } else { body };

    serde_json::from_str(body)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}
