//! Upstream news source abstraction.
//!
//! The pipeline talks to the news source through the `NewsSource` trait so
//! tests can substitute fakes; `NewsApiSource` is the production
//! implementation.

pub mod newsapi;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::article::RawArticle;
use crate::error::UpstreamError;

/// Options for topic and domain queries.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Article language filter (ISO 639-1)
    pub language: Option<String>,
    /// Upstream sort order, e.g. "publishedAt" or "relevancy"
    pub sort_by: Option<String>,
    /// Maximum items per response
    pub page_size: Option<u32>,
    /// Fetch articles published on or after this date. The upstream only
    /// serves articles from prior days; asking for today simply yields an
    /// empty result, not an error.
    pub from: Option<NaiveDate>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }
}

/// The three query shapes the upstream news source exposes.
///
/// Every call either returns the full upstream item list or fails with a
/// classified error; reduced lists are never returned on failure.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Full-text topic search.
    async fn search(
        &self,
        topic: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawArticle>, UpstreamError>;

    /// Current top headlines for a country, optionally narrowed to a category.
    async fn top_headlines(
        &self,
        country: &str,
        category: Option<&str>,
    ) -> Result<Vec<RawArticle>, UpstreamError>;

    /// Everything published by a specific domain.
    async fn everything(
        &self,
        domain: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawArticle>, UpstreamError>;

    /// Connectivity probe for status reporting.
    async fn health_check(&self) -> Result<bool, UpstreamError>;
}

pub use newsapi::NewsApiSource;
