//! Error types for the pipeline service client

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error codes returned by the pipeline service
pub mod codes {
    /// Transient server-side fault; safe to retry
    pub const INTERNAL_SERVICE_ERROR: &str = "InternalServiceError";
    /// The request was malformed or referenced something invalid
    pub const INVALID_REQUEST: &str = "InvalidRequestException";
    /// No pipeline exists with the given id
    pub const PIPELINE_NOT_FOUND: &str = "PipelineNotFoundException";
    /// The pipeline existed but has been deleted
    pub const PIPELINE_DELETED: &str = "PipelineDeletedException";
}

/// Errors that can occur when using the pipeline service client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service rejected the call with an error code
    #[error("{code} (status {status}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Service error code, e.g. `PipelineNotFoundException`
        code: String,
        /// Error message from the service
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Error body shape used by the service
#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(alias = "Message", default)]
    message: Option<String>,
}

impl ClientError {
    /// Create a service error from code and message
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build a service error from a failed response body
    ///
    /// The code is taken from `__type`, dropping any `namespace#` prefix.
    /// Bodies that are not JSON become an `Unknown` error carrying the raw text.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed: ServiceErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed
            .error_type
            .as_deref()
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let message = parsed.message.unwrap_or_else(|| body.trim().to_string());

        Self::service(status, code, message)
    }

    /// Service error code, if this error came from the service
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Check if this error carries the given service error code
    pub fn has_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }

    /// Check if this is the transient internal service error
    pub fn is_internal_service_error(&self) -> bool {
        self.has_code(codes::INTERNAL_SERVICE_ERROR)
    }

    /// Check if this error means the pipeline does not exist
    pub fn is_pipeline_not_found(&self) -> bool {
        self.has_code(codes::PIPELINE_NOT_FOUND)
    }

    /// Check if this error means the pipeline has been deleted
    pub fn is_pipeline_deleted(&self) -> bool {
        self.has_code(codes::PIPELINE_DELETED)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Service { status, .. } if *status >= 500)
    }
}
