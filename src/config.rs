//! Configuration for the ingestion pipeline.

use serde::Deserialize;
use std::time::Duration;

use crate::error::PipelineError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Upstream news source
    pub news_api_key: Option<String>,
    #[serde(default = "default_news_api_url")]
    pub news_api_url: String,
    #[serde(default = "default_news_language")]
    pub news_language: String,
    #[serde(default = "default_news_sort_by")]
    pub news_sort_by: String,
    #[serde(default = "default_news_page_size")]
    pub news_page_size: u32,
    #[serde(default = "default_news_rate_limit")]
    pub news_rate_limit_rpm: u32,

    // Vector index
    pub pinecone_api_key: Option<String>,
    #[serde(default)]
    pub pinecone_host: String,
    #[serde(default = "default_namespace")]
    pub pinecone_namespace: String,
    #[serde(default = "default_index_batch_size")]
    pub index_batch_size: usize,
    #[serde(default = "default_index_rate_limit")]
    pub index_rate_limit_rpm: u32,

    // Embedding service
    #[serde(default = "default_embedding_url")]
    pub embedding_url: String,
    pub embedding_api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    // Headline cache
    #[serde(default = "default_headline_cache_ttl")]
    pub headline_cache_ttl_ms: u64,

    // Concurrency
    #[serde(default = "default_batch_workers")]
    pub batch_workers: usize,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    // Metrics server
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default)]
    pub metrics_enabled: bool,
}

fn default_news_api_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_news_sort_by() -> String {
    "publishedAt".to_string()
}

fn default_news_page_size() -> u32 {
    100
}

fn default_news_rate_limit() -> u32 {
    30 // NewsAPI free tier: 100 requests/day
}

fn default_namespace() -> String {
    "news".to_string()
}

fn default_index_batch_size() -> usize {
    96 // accepted upsert batch maximum of the index service
}

fn default_index_rate_limit() -> u32 {
    300
}

fn default_embedding_url() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

fn default_headline_cache_ttl() -> u64 {
    3_600_000 // 1 hour
}

fn default_batch_workers() -> usize {
    4
}

fn default_max_concurrent_requests() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_metrics_port() -> u16 {
    9090
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        // Build config from environment
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Fails fast on missing credentials, before any fetch is attempted.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut missing = Vec::new();
        if self.news_api_key.as_deref().unwrap_or("").is_empty() {
            missing.push("NEWS_API_KEY");
        }
        if self.pinecone_api_key.as_deref().unwrap_or("").is_empty() {
            missing.push("PINECONE_API_KEY");
        }
        if self.pinecone_host.is_empty() {
            missing.push("PINECONE_HOST");
        }
        if !missing.is_empty() {
            return Err(PipelineError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn headline_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.headline_cache_ttl_ms)
    }
}
