//! HTTP fetch client with timeout and retry.

use billdesk_core::BillingError;

use crate::retry::RetryPolicy;
use crate::timeout::{TimeoutConfig, TimeoutError};

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(#[from] TimeoutError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl From<FetchError> for BillingError {
    fn from(e: FetchError) -> Self {
        BillingError::CatalogUnavailable(e.to_string())
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}

/// HTTP client that bounds every attempt by the policy's total timeout and
/// retries the failures the policy allows.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl FetchClient {
    /// Create a new fetch client.
    pub fn new(policy: FetchPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("billdesk/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(policy.timeout.connect)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// GET `url` and return the body bytes.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0;
        loop {
            let started = std::time::Instant::now();
            let result = match tokio::time::timeout(self.policy.timeout.total, self.attempt(url)).await {
                Ok(result) => result,
                Err(_) => Err(TimeoutError::new(self.policy.timeout.total).into()),
            };

            let error = match result {
                Ok(bytes) => {
                    tracing::debug!(
                        url,
                        attempt,
                        bytes = bytes.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Fetch succeeded"
                    );
                    return Ok(bytes);
                }
                Err(e) => e,
            };

            if !self.policy.retry.should_retry(&error, attempt) {
                return Err(error);
            }

            let delay = self.policy.retry.delay_before(attempt);
            tracing::warn!(url, attempt, error = %error, delay_ms = delay.as_millis() as u64, "Retrying fetch");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resp = self.client.get(url).send().await.map_err(classify)?;

        let status = resp.status().as_u16();
        if status >= 400 {
            return Err(FetchError::Http {
                status,
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await.map_err(classify)?;
        Ok(bytes.to_vec())
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_connect() {
        FetchError::Connection(e.to_string())
    } else if e.is_decode() || e.is_body() {
        FetchError::Deserialization(e.to_string())
    } else {
        FetchError::Request(e.to_string())
    }
}
