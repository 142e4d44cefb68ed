//! Pipeline orchestration.
//!
//! Wires the upstream news source, the normalizer and the vector index
//! into the caller-facing operations: topic, headlines (cache-backed),
//! domain and batch ingestion, plus a status probe. Collaborators are
//! injected as trait objects so tests substitute fakes.

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::article::{Article, BatchResult, PipelineRunResult, RawArticle};
use crate::cache::{HeadlineCache, HeadlineKey};
use crate::config::Config;
use crate::error::{PipelineError, UpstreamError};
use crate::index::{Embedder, IndexRecord, VectorIndex};
use crate::metrics;
use crate::normalize::normalize;
use crate::sources::{FetchOptions, NewsSource};

/// Per-run options for topic and domain ingestion. Unset fields fall back
/// to configuration defaults.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub language: Option<String>,
    pub sort_by: Option<String>,
    pub page_size: Option<u32>,
    pub from: Option<NaiveDate>,
    /// Overall deadline for the run. On expiry the run stops and reports
    /// partial counts instead of hanging.
    pub deadline: Option<Duration>,
}

impl ProcessOptions {
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

    pub fn from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Up/down state of one external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceStatus {
    pub news_source: ComponentStatus,
    pub index: ComponentStatus,
}

// ============================================
// UPSERT ORCHESTRATOR
// ============================================

/// Embeds articles and writes them to the vector index in bounded
/// sub-batches. Failures are isolated per article or per sub-batch and
/// counted, never propagated.
pub struct UpsertOrchestrator {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    namespace: String,
    batch_size: usize,
}

impl UpsertOrchestrator {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        namespace: &str,
        batch_size: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            namespace: namespace.to_string(),
            batch_size: batch_size.max(1),
        }
    }

    /// Returns (processed, failed); processed + failed == articles.len()
    /// unless the batch was empty.
    pub async fn upsert_batch(
        &self,
        articles: &[Article],
        deadline: Option<Instant>,
    ) -> (usize, usize) {
        let processed_at = Utc::now();
        let mut records = Vec::with_capacity(articles.len());
        let mut failed = 0usize;

        for (i, article) in articles.iter().enumerate() {
            if deadline_exceeded(deadline) {
                warn!(
                    remaining = articles.len() - i,
                    "Deadline exceeded during embedding, counting remaining articles as failed"
                );
                failed += articles.len() - i;
                break;
            }
            match self.embedder.embed(&article.content_for_embedding).await {
                Ok(values) => records.push(IndexRecord {
                    id: article.id.clone(),
                    values,
                    metadata: article.metadata(processed_at),
                }),
                Err(e) => {
                    warn!(id = %article.id, error = %e, "Embedding failed, skipping article");
                    failed += 1;
                }
            }
        }

        let mut processed = 0usize;
        let mut sent = 0usize;
        for chunk in records.chunks(self.batch_size) {
            if deadline_exceeded(deadline) {
                warn!(
                    remaining = records.len() - sent,
                    "Deadline exceeded during upsert, counting remaining articles as failed"
                );
                failed += records.len() - sent;
                break;
            }
            match self.index.upsert(&self.namespace, chunk).await {
                Ok(_) => processed += chunk.len(),
                Err(e) => {
                    // One bad sub-batch never aborts the rest
                    error!(error = %e, batch = chunk.len(), "Index upsert failed for sub-batch");
                    failed += chunk.len();
                }
            }
            sent += chunk.len();
        }

        (processed, failed)
    }
}

fn deadline_exceeded(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|at| Instant::now() >= at)
}

async fn fetch_with_deadline<F>(
    fetch: F,
    deadline: Option<Instant>,
) -> Result<Vec<RawArticle>, UpstreamError>
where
    F: Future<Output = Result<Vec<RawArticle>, UpstreamError>>,
{
    match deadline {
        Some(at) => {
            let remaining = at.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(UpstreamError::Network(
                    "deadline exceeded before fetch".to_string(),
                ));
            }
            tokio::time::timeout(remaining, fetch)
                .await
                .map_err(|_| UpstreamError::Network("deadline exceeded during fetch".to_string()))?
        }
        None => fetch.await,
    }
}

// ============================================
// NEWS PIPELINE
// ============================================

/// The caller-facing ingestion pipeline.
pub struct NewsPipeline {
    config: Config,
    source: Arc<dyn NewsSource>,
    index: Arc<dyn VectorIndex>,
    orchestrator: UpsertOrchestrator,
    cache: HeadlineCache,
}

impl NewsPipeline {
    /// Validates configuration and wires the collaborators. Missing
    /// credentials fail here, before any fetch is attempted.
    pub fn new(
        config: Config,
        source: Arc<dyn NewsSource>,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let orchestrator = UpsertOrchestrator::new(
            index.clone(),
            embedder,
            &config.pinecone_namespace,
            config.index_batch_size,
        );
        let cache = HeadlineCache::new(config.headline_cache_ttl());

        info!(
            namespace = %config.pinecone_namespace,
            cache_ttl_ms = config.headline_cache_ttl_ms,
            "News pipeline initialized"
        );

        Ok(Self {
            config,
            source,
            index,
            orchestrator,
            cache,
        })
    }

    /// Fetches, normalizes and upserts articles for one topic.
    pub async fn process_topic(&self, topic: &str, opts: &ProcessOptions) -> PipelineRunResult {
        let _timer = metrics::RunTimer::new(metrics::MODE_TOPIC);
        let deadline = opts.deadline.map(|d| Instant::now() + d);
        let options = self.resolve_options(opts);

        match fetch_with_deadline(self.source.search(topic, &options), deadline).await {
            Ok(raw) => self.ingest_raw(topic, raw, deadline).await.0,
            Err(err) => self.fetch_failed(topic, err),
        }
    }

    /// Fetches, normalizes and upserts articles from one publisher domain.
    pub async fn process_domain(&self, domain: &str, opts: &ProcessOptions) -> PipelineRunResult {
        let _timer = metrics::RunTimer::new(metrics::MODE_DOMAIN);
        let scope = format!("domain_{}", domain);
        let deadline = opts.deadline.map(|d| Instant::now() + d);
        let options = self.resolve_options(opts);

        match fetch_with_deadline(self.source.everything(domain, &options), deadline).await {
            Ok(raw) => self.ingest_raw(&scope, raw, deadline).await.0,
            Err(err) => self.fetch_failed(&scope, err),
        }
    }

    /// Cache-backed top-headlines ingestion.
    ///
    /// A fresh cache entry answers without any upstream call; an absent or
    /// expired entry triggers exactly one fetch-and-upsert shared by all
    /// concurrent callers of the same key. All fetched articles are
    /// indexed; the cached list is truncated to `limit`, never padded.
    pub async fn process_headlines(
        &self,
        country: &str,
        category: Option<&str>,
        limit: usize,
    ) -> PipelineRunResult {
        let _timer = metrics::RunTimer::new(metrics::MODE_HEADLINES);
        let key = HeadlineKey::new(country, category, limit);
        let scope = match category {
            Some(category) => format!("headlines_{}_{}", country, category),
            None => format!("headlines_{}", country),
        };

        let read = self
            .cache
            .read_or_refresh(&key, || async {
                let raw = self.source.top_headlines(country, category).await.map_err(
                    |err| {
                        metrics::record_upstream_error(err.kind());
                        error!(scope = %scope, error = %err, "Headline fetch failed");
                        err
                    },
                )?;
                let (run, mut articles) = self.ingest_raw(&scope, raw, None).await;
                articles.truncate(limit);
                Ok((articles, run))
            })
            .await;

        match read {
            Ok(read) => {
                if read.stale {
                    debug!(scope = %scope, "Serving stale headline entry after failed refresh");
                }
                read.entry.run
            }
            Err(err) => PipelineRunResult::fetch_failed(&scope, &err),
        }
    }

    /// Cached headline articles for a query shape, fresh or stale, without
    /// triggering a refresh. Consumed by the read-side transport layer.
    pub async fn cached_headlines(
        &self,
        country: &str,
        category: Option<&str>,
        limit: usize,
    ) -> Option<Vec<Article>> {
        self.cache
            .peek(&HeadlineKey::new(country, category, limit))
            .await
            .map(|entry| entry.articles)
    }

    /// Processes topics independently with bounded concurrency. Result
    /// order always matches input order; one topic's failure never stops
    /// the rest.
    pub async fn process_batch(&self, topics: &[String], opts: &ProcessOptions) -> BatchResult {
        info!(topics = topics.len(), "Starting batch ingestion");

        let results: Vec<PipelineRunResult> = stream::iter(topics)
            .map(|topic| self.process_topic(topic, opts))
            .buffered(self.config.batch_workers.max(1))
            .collect()
            .await;

        let batch = BatchResult::from_results(results);
        info!(
            succeeded = batch.topics_succeeded,
            failed = batch.topics_failed,
            "Batch ingestion completed"
        );
        batch
    }

    /// Probes both collaborators.
    pub async fn status(&self) -> ServiceStatus {
        let (news, index) = tokio::join!(self.source.health_check(), self.index.describe_stats());

        ServiceStatus {
            news_source: if matches!(news, Ok(true)) {
                ComponentStatus::Up
            } else {
                ComponentStatus::Down
            },
            index: if index.is_ok() {
                ComponentStatus::Up
            } else {
                ComponentStatus::Down
            },
        }
    }

    fn resolve_options(&self, opts: &ProcessOptions) -> FetchOptions {
        FetchOptions {
            language: Some(
                opts.language
                    .clone()
                    .unwrap_or_else(|| self.config.news_language.clone()),
            ),
            sort_by: Some(
                opts.sort_by
                    .clone()
                    .unwrap_or_else(|| self.config.news_sort_by.clone()),
            ),
            page_size: Some(opts.page_size.unwrap_or(self.config.news_page_size)),
            from: opts.from,
        }
    }

    fn fetch_failed(&self, scope: &str, err: UpstreamError) -> PipelineRunResult {
        metrics::record_upstream_error(err.kind());
        error!(scope = %scope, kind = err.kind(), error = %err, "Fetch failed");
        PipelineRunResult::fetch_failed(scope, &err)
    }

    /// Normalizes and upserts already-fetched items, returning the run
    /// report and the normalized articles.
    async fn ingest_raw(
        &self,
        scope: &str,
        raw: Vec<RawArticle>,
        deadline: Option<Instant>,
    ) -> (PipelineRunResult, Vec<Article>) {
        let correlation_id = Uuid::new_v4();
        let fetched = raw.len();

        let mut articles = Vec::with_capacity(fetched);
        let mut failed = 0usize;
        for item in &raw {
            match normalize(item, scope) {
                Ok(article) => articles.push(article),
                Err(e) => {
                    warn!(scope = %scope, error = %e, "Skipping unusable article");
                    failed += 1;
                }
            }
        }

        let (processed, upsert_failed) = self.orchestrator.upsert_batch(&articles, deadline).await;
        failed += upsert_failed;

        metrics::record_run_counts(scope, fetched as u64, processed as u64, failed as u64);
        info!(
            scope = %scope,
            correlation_id = %correlation_id,
            fetched = fetched,
            processed = processed,
            failed = failed,
            "Run completed"
        );

        (
            PipelineRunResult::completed(scope, fetched, processed, failed),
            articles,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::RawSource;
    use crate::error::IndexError;
    use crate::index::IndexStats;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_config(batch_size: usize, ttl_ms: u64) -> Config {
        serde_json::from_value(serde_json::json!({
            "news_api_key": "test-key",
            "pinecone_api_key": "test-key",
            "pinecone_host": "https://index.example.io",
            "index_batch_size": batch_size,
            "headline_cache_ttl_ms": ttl_ms,
            "embedding_dimension": 4,
            "batch_workers": 2,
        }))
        .unwrap()
    }

    fn raw_item(title: &str, url: &str) -> RawArticle {
        RawArticle {
            source: RawSource {
                id: None,
                name: Some("Example".to_string()),
            },
            author: None,
            title: Some(title.to_string()),
            description: Some(format!("About {}", title)),
            url: Some(url.to_string()),
            url_to_image: None,
            published_at: Some("2024-01-15T10:00:00Z".to_string()),
            content: None,
        }
    }

    fn raw_items(n: usize) -> Vec<RawArticle> {
        (0..n)
            .map(|i| raw_item(&format!("Story {}", i), &format!("https://example.com/{}", i)))
            .collect()
    }

    #[derive(Default)]
    struct FakeSource {
        items: Vec<RawArticle>,
        fail_topics: HashSet<String>,
        headline_calls: AtomicUsize,
        headline_ok_calls: Option<usize>,
    }

    #[async_trait]
    impl NewsSource for FakeSource {
        async fn search(
            &self,
            topic: &str,
            _options: &FetchOptions,
        ) -> Result<Vec<RawArticle>, UpstreamError> {
            if self.fail_topics.contains(topic) {
                return Err(UpstreamError::Network("upstream down".to_string()));
            }
            Ok(self.items.clone())
        }

        async fn top_headlines(
            &self,
            _country: &str,
            _category: Option<&str>,
        ) -> Result<Vec<RawArticle>, UpstreamError> {
            let call = self.headline_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ok_calls) = self.headline_ok_calls {
                if call >= ok_calls {
                    return Err(UpstreamError::Network("upstream down".to_string()));
                }
            }
            Ok(self.items.clone())
        }

        async fn everything(
            &self,
            _domain: &str,
            _options: &FetchOptions,
        ) -> Result<Vec<RawArticle>, UpstreamError> {
            Ok(self.items.clone())
        }

        async fn health_check(&self) -> Result<bool, UpstreamError> {
            Ok(true)
        }
    }

    #[derive(Default)]
    struct RecordingIndex {
        upsert_calls: AtomicUsize,
        records: Mutex<Vec<IndexRecord>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl VectorIndex for RecordingIndex {
        async fn upsert(
            &self,
            _namespace: &str,
            records: &[IndexRecord],
        ) -> Result<usize, IndexError> {
            self.upsert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(IndexError::Write("index rejected batch".to_string()));
            }
            self.records.lock().extend_from_slice(records);
            Ok(records.len())
        }

        async fn fetch(
            &self,
            _namespace: &str,
            ids: &[String],
        ) -> Result<HashMap<String, IndexRecord>, IndexError> {
            let records = self.records.lock();
            Ok(records
                .iter()
                .filter(|r| ids.contains(&r.id))
                .map(|r| (r.id.clone(), r.clone()))
                .collect())
        }

        async fn describe_stats(&self) -> Result<IndexStats, IndexError> {
            Ok(IndexStats::default())
        }
    }

    struct StubEmbedder {
        dimension: usize,
        fail_marker: Option<String>,
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError> {
            if let Some(ref marker) = self.fail_marker {
                if text.contains(marker.as_str()) {
                    return Err(IndexError::Embedding("embedding refused".to_string()));
                }
            }
            Ok(vec![0.5; self.dimension])
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    fn build_pipeline(
        config: Config,
        source: FakeSource,
        index: Arc<RecordingIndex>,
        embedder: StubEmbedder,
    ) -> NewsPipeline {
        NewsPipeline::new(config, Arc::new(source), index, Arc::new(embedder)).unwrap()
    }

    #[test]
    fn test_construction_fails_fast_without_credentials() {
        let config: Config = serde_json::from_value(serde_json::json!({})).unwrap();
        let result = NewsPipeline::new(
            config,
            Arc::new(FakeSource::default()),
            Arc::new(RecordingIndex::default()),
            Arc::new(StubEmbedder {
                dimension: 4,
                fail_marker: None,
            }),
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_partial_batch_isolation() {
        // Five items, the third unusable: processed=4, failed=1, success=true
        let mut items = raw_items(5);
        items[2].title = None;
        items[2].url = None;

        let index = Arc::new(RecordingIndex::default());
        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource {
                items,
                ..Default::default()
            },
            index.clone(),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let run = pipeline.process_topic("ai", &ProcessOptions::new()).await;
        assert!(run.success);
        assert_eq!(run.articles_fetched, 5);
        assert_eq!(run.articles_processed, 4);
        assert_eq!(run.articles_failed, 1);
        assert_eq!(index.records.lock().len(), 4);
    }

    #[tokio::test]
    async fn test_embedding_failure_does_not_abort_batch() {
        let index = Arc::new(RecordingIndex::default());
        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource {
                items: raw_items(3),
                ..Default::default()
            },
            index.clone(),
            StubEmbedder {
                dimension: 4,
                fail_marker: Some("Story 1".to_string()),
            },
        );

        let run = pipeline.process_topic("ai", &ProcessOptions::new()).await;
        assert!(run.success);
        assert_eq!(run.articles_processed, 2);
        assert_eq!(run.articles_failed, 1);
    }

    #[tokio::test]
    async fn test_upserts_grouped_into_sub_batches() {
        let index = Arc::new(RecordingIndex::default());
        let pipeline = build_pipeline(
            test_config(4, 60_000),
            FakeSource {
                items: raw_items(10),
                ..Default::default()
            },
            index.clone(),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let run = pipeline.process_topic("ai", &ProcessOptions::new()).await;
        assert_eq!(run.articles_processed, 10);
        // 10 records at batch size 4: 4 + 4 + 2
        assert_eq!(index.upsert_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_sub_batch_counts_articles_failed() {
        let index = Arc::new(RecordingIndex {
            fail_writes: true,
            ..Default::default()
        });
        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource {
                items: raw_items(3),
                ..Default::default()
            },
            index,
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let run = pipeline.process_topic("ai", &ProcessOptions::new()).await;
        assert!(run.success);
        assert_eq!(run.articles_processed, 0);
        assert_eq!(run.articles_failed, 3);
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order_and_isolates_failure() {
        let mut fail_topics = HashSet::new();
        fail_topics.insert("climate".to_string());

        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource {
                items: raw_items(2),
                fail_topics,
                ..Default::default()
            },
            Arc::new(RecordingIndex::default()),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let topics = vec!["ai".to_string(), "climate".to_string()];
        let batch = pipeline.process_batch(&topics, &ProcessOptions::new()).await;

        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[0].scope, "ai");
        assert_eq!(batch.results[1].scope, "climate");
        assert!(batch.results[0].success);
        assert!(!batch.results[1].success);
        assert_eq!(batch.topics_succeeded, 1);
        assert_eq!(batch.topics_failed, 1);
    }

    #[tokio::test]
    async fn test_headlines_cached_within_ttl() {
        let source = Arc::new(FakeSource {
            items: raw_items(7),
            ..Default::default()
        });
        let pipeline = NewsPipeline::new(
            test_config(96, 60_000),
            source.clone(),
            Arc::new(RecordingIndex::default()),
            Arc::new(StubEmbedder {
                dimension: 4,
                fail_marker: None,
            }),
        )
        .unwrap();

        let first = pipeline.process_headlines("us", Some("technology"), 5).await;
        assert!(first.success);
        assert_eq!(first.articles_fetched, 7);

        let second = pipeline.process_headlines("us", Some("technology"), 5).await;
        assert_eq!(second.articles_fetched, 7);

        // Only the first read hit the upstream
        assert_eq!(source.headline_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_headlines_truncated_to_limit_in_cache() {
        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource {
                items: raw_items(7),
                ..Default::default()
            },
            Arc::new(RecordingIndex::default()),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let run = pipeline.process_headlines("us", Some("technology"), 5).await;
        assert_eq!(run.articles_fetched, 7);
        // All fetched articles are indexed; the cached list is bounded
        assert_eq!(run.articles_processed, 7);

        let cached = pipeline
            .cached_headlines("us", Some("technology"), 5)
            .await
            .unwrap();
        assert_eq!(cached.len(), 5);
        assert_eq!(cached[0].title, "Story 0");
        assert_eq!(cached[4].title, "Story 4");
    }

    #[tokio::test]
    async fn test_headlines_stale_entry_survives_failed_refresh() {
        let pipeline = build_pipeline(
            test_config(96, 20),
            FakeSource {
                items: raw_items(7),
                headline_ok_calls: Some(1),
                ..Default::default()
            },
            Arc::new(RecordingIndex::default()),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let first = pipeline.process_headlines("us", None, 5).await;
        assert!(first.success);

        tokio::time::sleep(Duration::from_millis(40)).await;

        // Refresh fails; the previous entry is still served
        let second = pipeline.process_headlines("us", None, 5).await;
        assert!(second.success);
        assert_eq!(second.articles_fetched, 7);
        assert_eq!(
            pipeline.cached_headlines("us", None, 5).await.unwrap().len(),
            5
        );
    }

    #[tokio::test]
    async fn test_deadline_reports_partial_counts() {
        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource {
                items: raw_items(3),
                ..Default::default()
            },
            Arc::new(RecordingIndex::default()),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        // An already-expired deadline: fetch fails cleanly, nothing hangs
        let run = pipeline
            .process_topic("ai", &ProcessOptions::new().deadline(Duration::ZERO))
            .await;
        assert!(!run.success);
        assert_eq!(run.articles_fetched, 0);
        assert!(run.error.unwrap().contains("deadline"));
    }

    #[tokio::test]
    async fn test_status_reports_collaborators() {
        let pipeline = build_pipeline(
            test_config(96, 60_000),
            FakeSource::default(),
            Arc::new(RecordingIndex::default()),
            StubEmbedder {
                dimension: 4,
                fail_marker: None,
            },
        );

        let status = pipeline.status().await;
        assert_eq!(status.news_source, ComponentStatus::Up);
        assert_eq!(status.index, ComponentStatus::Up);
    }
}
