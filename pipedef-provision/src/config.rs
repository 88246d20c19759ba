//! Provisioner configuration
//!
//! Connection and retry settings for creating and reading pipeline
//! definitions.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Default service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://datapipeline.us-east-1.amazonaws.com";

/// Longest accepted create timeout
pub const MAX_CREATE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Provisioner configuration
///
/// The create timeout bounds the whole submission retry window. Backoff
/// starts at `initial_backoff` and doubles up to `max_backoff`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service endpoint URL
    pub endpoint: String,

    /// How long a create may keep retrying transient failures
    pub create_timeout: Duration,

    /// Delay before the first retry
    pub initial_backoff: Duration,

    /// Upper bound for any single retry delay
    pub max_backoff: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            create_timeout: Duration::from_secs(20 * 60),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PIPEDEF_ENDPOINT (optional, default: the us-east-1 service endpoint)
    /// - PIPEDEF_CREATE_TIMEOUT (optional, seconds, default: 1200)
    /// - PIPEDEF_INITIAL_BACKOFF_MS (optional, default: 500)
    /// - PIPEDEF_MAX_BACKOFF_MS (optional, default: 10000)
    pub fn from_env() -> anyhow::Result<Self> {
        let endpoint =
            std::env::var("PIPEDEF_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let mut config = Self::new(endpoint);

        if let Some(secs) = env_u64("PIPEDEF_CREATE_TIMEOUT")? {
            config.create_timeout = Duration::from_secs(secs);
        }

        if let Some(ms) = env_u64("PIPEDEF_INITIAL_BACKOFF_MS")? {
            config.initial_backoff = Duration::from_millis(ms);
        }

        if let Some(ms) = env_u64("PIPEDEF_MAX_BACKOFF_MS")? {
            config.max_backoff = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Overrides the create timeout
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    /// Retry policy for the submission window
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: self.create_timeout,
            initial_delay: self.initial_backoff,
            max_delay: self.max_backoff,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.is_empty() {
            anyhow::bail!("endpoint cannot be empty");
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!("endpoint must start with http:// or https://");
        }

        if self.create_timeout.is_zero() {
            anyhow::bail!("create_timeout must be greater than 0");
        }

        if self.create_timeout > MAX_CREATE_TIMEOUT {
            anyhow::bail!(
                "create_timeout must not exceed {} seconds",
                MAX_CREATE_TIMEOUT.as_secs()
            );
        }

        if self.initial_backoff.is_zero() {
            anyhow::bail!("initial_backoff must be greater than 0");
        }

        if self.max_backoff < self.initial_backoff {
            anyhow::bail!("max_backoff must not be smaller than initial_backoff");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT.to_string())
    }
}

/// Reads an optional numeric environment variable
fn env_u64(name: &str) -> anyhow::Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} must be a non-negative integer: {}", name, e)),
        Err(_) => Ok(None),
    }
}
