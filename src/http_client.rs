//! HTTP client plumbing shared by the upstream collaborators.
//!
//! A single semaphore bounds concurrent requests across all services;
//! each collaborator additionally gets its own requests-per-minute rate
//! limiter. Timeouts are enforced at the client level so no call can
//! hang indefinitely.

use governor::{
    clock::DefaultClock, middleware::NoOpMiddleware, state::NotKeyed, Quota, RateLimiter,
};
use reqwest::{Client, RequestBuilder, Response};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::PipelineError;

/// Configuration for the shared HTTP layer.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum concurrent requests across all services
    pub max_concurrent_requests: usize,
    /// Request timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("newsvector-ingestion/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Transport-level failure, mapped to the caller's error taxonomy at the
/// collaborator boundary.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http client shut down")]
    Closed,
}

/// Shared reqwest client plus the global concurrency semaphore.
pub struct SharedHttp {
    client: Client,
    semaphore: Arc<Semaphore>,
}

impl SharedHttp {
    pub fn new(config: &HttpClientConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| PipelineError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests)),
        })
    }

    pub fn with_defaults() -> Result<Self, PipelineError> {
        Self::new(&HttpClientConfig::default())
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Per-collaborator client: shares the global semaphore, owns its own
/// rate limiter.
pub struct ServiceClient {
    shared: Arc<SharedHttp>,
    rate_limiter: RateLimiter<NotKeyed, governor::state::InMemoryState, DefaultClock, NoOpMiddleware>,
    service: String,
}

impl ServiceClient {
    pub fn new(shared: Arc<SharedHttp>, service: &str, rate_limit_rpm: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit_rpm).unwrap_or(NonZeroU32::new(60).unwrap()),
        );
        Self {
            shared,
            rate_limiter: RateLimiter::direct(quota),
            service: service.to_string(),
        }
    }

    /// Builds a request against the shared client.
    pub fn inner(&self) -> &Client {
        self.shared.inner()
    }

    /// Sends a request under the concurrency and rate limits.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let _permit = self
            .shared
            .semaphore
            .acquire()
            .await
            .map_err(|_| TransportError::Closed)?;

        self.rate_limiter.until_ready().await;

        debug!(service = %self.service, "Executing HTTP request");
        let response = request.send().await?;
        Ok(response)
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}
