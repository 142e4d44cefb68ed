//! Error types for the ingestion pipeline.
//!
//! Failure kinds are explicit enums so callers can branch on them at
//! compile time instead of inspecting a success flag on an untyped payload.

use thiserror::Error;

/// Failures reported by the upstream news source.
///
/// A failed fetch always yields zero articles; partial article lists are
/// never returned alongside an error.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream authentication rejected: {0}")]
    Auth(String),

    #[error("upstream rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("upstream network failure: {0}")]
    Network(String),

    #[error("upstream rejected request: {0}")]
    BadRequest(String),
}

impl UpstreamError {
    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Auth(_) => "auth",
            UpstreamError::RateLimit(_) => "rate_limit",
            UpstreamError::Network(_) => "network",
            UpstreamError::BadRequest(_) => "bad_request",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            return UpstreamError::Network(e.to_string());
        }
        match e.status() {
            Some(s) if s.as_u16() == 401 => UpstreamError::Auth(e.to_string()),
            Some(s) if s.as_u16() == 429 => UpstreamError::RateLimit(e.to_string()),
            Some(s) if s.is_client_error() => UpstreamError::BadRequest(e.to_string()),
            _ => UpstreamError::Network(e.to_string()),
        }
    }
}

/// Per-article normalization failure.
///
/// Caught and counted by the orchestrator; never aborts a batch.
#[derive(Error, Debug)]
#[error("unusable article: {0}")]
pub struct NormalizeError(pub String);

/// Failures from the vector index service or the embedding step.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("index write failed: {0}")]
    Write(String),

    #[error("index unreachable: {0}")]
    Network(String),
}

impl From<reqwest::Error> for IndexError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            IndexError::Network(e.to_string())
        } else {
            IndexError::Write(e.to_string())
        }
    }
}

/// Top-level pipeline errors: construction-time configuration failures
/// plus fetch-level wrappers for callers that need a `Result`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_kinds() {
        assert_eq!(UpstreamError::Auth("bad key".into()).kind(), "auth");
        assert_eq!(UpstreamError::RateLimit("slow down".into()).kind(), "rate_limit");
        assert_eq!(UpstreamError::Network("timed out".into()).kind(), "network");
        assert_eq!(UpstreamError::BadRequest("bad param".into()).kind(), "bad_request");
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Auth("api key invalid".into());
        assert!(err.to_string().contains("api key invalid"));

        let err = IndexError::Embedding("dimension mismatch".into());
        assert!(err.to_string().contains("dimension mismatch"));
    }
}
