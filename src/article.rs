//! Article records and pipeline run reports.
//!
//! `RawArticle` mirrors the upstream wire shape where any field may be
//! absent; `Article` is the normalized, index-ready record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// Maximum characters of title + description sent for embedding.
/// Longer descriptions are truncated, never dropped.
pub const MAX_EMBED_CHARS: usize = 1000;

/// One item as returned by the upstream news source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub source: RawSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A normalized article ready for embedding and indexing.
///
/// `id` is a deterministic fingerprint of (scope, url, published_at), so
/// re-ingesting the same upstream payload overwrites the same index record
/// instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    /// Topic, `headlines_{country}` or `domain_{domain}` label.
    pub scope: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source_name: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    /// Title + description, truncated to [`MAX_EMBED_CHARS`]. The only
    /// field sent for vectorization; never stored in index metadata.
    pub content_for_embedding: String,
}

impl Article {
    /// Metadata stored alongside the vector: every field except the
    /// embedding text itself.
    pub fn metadata(&self, processed_at: DateTime<Utc>) -> serde_json::Value {
        let mut meta = serde_json::json!({
            "scope": self.scope,
            "title": self.title,
            "description": self.description,
            "url": self.url,
            "source_name": self.source_name,
            "author": self.author.clone().unwrap_or_default(),
            "published_at": self.published_at.to_rfc3339(),
            "processed_at": processed_at.to_rfc3339(),
        });
        if let Some(ref image) = self.image_url {
            meta["image_url"] = serde_json::json!(image);
        }
        meta
    }
}

/// Outcome of one fetch-and-upsert invocation.
///
/// `success` reflects the fetch step only; per-article upsert failures are
/// counted in `articles_failed` without flipping it.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRunResult {
    pub scope: String,
    pub success: bool,
    pub articles_fetched: usize,
    pub articles_processed: usize,
    pub articles_failed: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineRunResult {
    /// A run whose fetch succeeded, with per-article counts.
    pub fn completed(scope: &str, fetched: usize, processed: usize, failed: usize) -> Self {
        Self {
            scope: scope.to_string(),
            success: true,
            articles_fetched: fetched,
            articles_processed: processed,
            articles_failed: failed,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// A run whose fetch itself failed: zero articles, classified error.
    pub fn fetch_failed(scope: &str, error: &UpstreamError) -> Self {
        Self {
            scope: scope.to_string(),
            success: false,
            articles_fetched: 0,
            articles_processed: 0,
            articles_failed: 0,
            timestamp: Utc::now(),
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate outcome of a multi-topic batch, one entry per topic in
/// input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub results: Vec<PipelineRunResult>,
    pub topics_succeeded: usize,
    pub topics_failed: usize,
    pub timestamp: DateTime<Utc>,
}

impl BatchResult {
    pub fn from_results(results: Vec<PipelineRunResult>) -> Self {
        let topics_succeeded = results.iter().filter(|r| r.success).count();
        let topics_failed = results.len() - topics_succeeded;
        Self {
            results,
            topics_succeeded,
            topics_failed,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_article_parsing() {
        let json = r#"{
            "source": {"id": null, "name": "Reuters"},
            "author": "Jane Doe",
            "title": "Markets rally on rate cut hopes",
            "description": "Stocks climbed on Tuesday",
            "url": "https://example.com/markets",
            "urlToImage": "https://example.com/image.jpg",
            "publishedAt": "2024-01-15T10:00:00Z",
            "content": "Full article content here..."
        }"#;

        let raw: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Markets rally on rate cut hopes"));
        assert_eq!(raw.source.name.as_deref(), Some("Reuters"));
    }

    #[test]
    fn test_raw_article_sparse_fields() {
        // Upstream items may omit nearly everything
        let raw: RawArticle = serde_json::from_str(r#"{"title": "Just a title"}"#).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Just a title"));
        assert!(raw.url.is_none());
        assert!(raw.source.name.is_none());
    }

    #[test]
    fn test_metadata_excludes_embedding_text() {
        let article = Article {
            id: "ai-0011223344556677".to_string(),
            scope: "ai".to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            url: "https://example.com/a".to_string(),
            source_name: "Example".to_string(),
            author: None,
            image_url: None,
            published_at: Utc::now(),
            content_for_embedding: "Title Description".to_string(),
        };

        let meta = article.metadata(Utc::now());
        assert!(meta.get("content_for_embedding").is_none());
        assert_eq!(meta["title"], "Title");
        assert!(meta.get("image_url").is_none());
    }

    #[test]
    fn test_batch_result_counts() {
        let results = vec![
            PipelineRunResult::completed("ai", 5, 5, 0),
            PipelineRunResult::fetch_failed("climate", &UpstreamError::Network("timeout".into())),
        ];
        let batch = BatchResult::from_results(results);
        assert_eq!(batch.topics_succeeded, 1);
        assert_eq!(batch.topics_failed, 1);
        assert_eq!(batch.results[0].scope, "ai");
        assert_eq!(batch.results[1].scope, "climate");
    }
}
