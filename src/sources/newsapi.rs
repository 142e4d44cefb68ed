//! NewsAPI implementation of the upstream news source.
//!
//! https://newsapi.org/docs/endpoints/everything

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{FetchOptions, NewsSource};
use crate::article::RawArticle;
use crate::error::UpstreamError;
use crate::http_client::{ServiceClient, SharedHttp, TransportError};

/// NewsAPI response envelope. Errors arrive in-band as
/// `{status: "error", code, message}`, sometimes on HTTP 200.
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(rename = "totalResults")]
    #[allow(dead_code)]
    total_results: Option<u32>,
    articles: Option<Vec<RawArticle>>,
    code: Option<String>,
    message: Option<String>,
}

pub struct NewsApiSource {
    client: ServiceClient,
    base_url: String,
    api_key: String,
}

impl NewsApiSource {
    pub fn new(
        shared: Arc<SharedHttp>,
        base_url: &str,
        api_key: String,
        rate_limit_rpm: u32,
    ) -> Self {
        Self {
            client: ServiceClient::new(shared, "newsapi", rate_limit_rpm),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get_articles(
        &self,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> Result<Vec<RawArticle>, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Fetching from NewsAPI");

        let request = self
            .client
            .inner()
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&params);

        let response = self.client.execute(request).await.map_err(|e| match e {
            TransportError::Http(err) => UpstreamError::from(err),
            TransportError::Closed => UpstreamError::Network("http client shut down".to_string()),
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let envelope: NewsApiResponse = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            // Non-JSON bodies (proxy error pages) classify by HTTP status
            Err(_) => return Err(classify(status, None, &text)),
        };

        if envelope.status != "ok" {
            return Err(classify(
                status,
                envelope.code.as_deref(),
                envelope.message.as_deref().unwrap_or("unknown error"),
            ));
        }

        let articles = envelope.articles.unwrap_or_default();
        info!(count = articles.len(), path = path, "Fetched articles");
        Ok(articles)
    }

    fn query_defaults(&self, options: &FetchOptions) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref language) = options.language {
            params.push(("language", language.clone()));
        }
        if let Some(ref sort_by) = options.sort_by {
            params.push(("sortBy", sort_by.clone()));
        }
        if let Some(page_size) = options.page_size {
            params.push(("pageSize", page_size.to_string()));
        }
        if let Some(from) = options.from {
            params.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// Maps the upstream error code (preferred) or HTTP status to a kind.
fn classify(status: StatusCode, code: Option<&str>, message: &str) -> UpstreamError {
    let detail = match code {
        Some(code) => format!("{}: {}", code, message),
        None => message.to_string(),
    };
    match code {
        Some("apiKeyInvalid") | Some("apiKeyMissing") | Some("apiKeyDisabled") => {
            return UpstreamError::Auth(detail)
        }
        Some("rateLimited") | Some("apiKeyExhausted") => return UpstreamError::RateLimit(detail),
        Some("parameterInvalid") | Some("parametersMissing") | Some("sourcesTooMany")
        | Some("sourceDoesNotExist") => return UpstreamError::BadRequest(detail),
        _ => {}
    }
    match status {
        StatusCode::UNAUTHORIZED => UpstreamError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimit(detail),
        s if s.is_client_error() => UpstreamError::BadRequest(detail),
        _ => UpstreamError::Network(detail),
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn search(
        &self,
        topic: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawArticle>, UpstreamError> {
        let mut params = vec![("q", topic.to_string())];
        params.extend(self.query_defaults(options));
        self.get_articles("/everything", params).await
    }

    async fn top_headlines(
        &self,
        country: &str,
        category: Option<&str>,
    ) -> Result<Vec<RawArticle>, UpstreamError> {
        let mut params = vec![("country", country.to_string())];
        if let Some(category) = category {
            params.push(("category", category.to_string()));
        }
        self.get_articles("/top-headlines", params).await
    }

    async fn everything(
        &self,
        domain: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawArticle>, UpstreamError> {
        let mut params = vec![("domains", domain.to_string())];
        params.extend(self.query_defaults(options));
        self.get_articles("/everything", params).await
    }

    async fn health_check(&self) -> Result<bool, UpstreamError> {
        // No dedicated health endpoint; a minimal search checks connectivity
        let options = FetchOptions::new().page_size(1);
        match self.search("news", &options).await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(error = %e, "NewsAPI health check failed");
                Ok(false)
            }
        }
    }
}
