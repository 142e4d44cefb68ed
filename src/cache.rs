//! Headline cache: TTL-keyed, in-memory, with per-key single-flight
//! refresh.
//!
//! Each key owns an async mutex guarding its entry, so at most one
//! refresh is in flight per key; concurrent readers of a stale key queue
//! behind the refresher and share its result. Expiry is evaluated lazily
//! at read time; nothing is persisted across restarts.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::article::{Article, PipelineRunResult};
use crate::metrics;

/// Cache key for one headlines query shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadlineKey {
    pub country: String,
    pub category: String,
    pub limit: usize,
}

impl HeadlineKey {
    pub fn new(country: &str, category: Option<&str>, limit: usize) -> Self {
        Self {
            country: country.to_string(),
            category: category.unwrap_or("").to_string(),
            limit,
        }
    }
}

/// One cached headline result set, replaced wholesale on refresh.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Articles in upstream relevance order, truncated to the key's limit.
    pub articles: Vec<Article>,
    /// The run that produced this entry.
    pub run: PipelineRunResult,
    pub fetched_at: DateTime<Utc>,
    fetched: Instant,
}

/// Entry snapshot handed to callers, with freshness evaluated at read time.
#[derive(Debug, Clone)]
pub struct CacheRead {
    pub entry: CacheEntry,
    /// True when a failed refresh left the previous entry in place.
    pub stale: bool,
    /// True when this read performed the refresh itself.
    pub refreshed: bool,
}

struct KeySlot {
    // Held across the refresh await: serializes refreshes per key
    state: tokio::sync::Mutex<Option<CacheEntry>>,
}

pub struct HeadlineCache {
    ttl: Duration,
    slots: Mutex<HashMap<HeadlineKey, Arc<KeySlot>>>,
}

impl HeadlineCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &HeadlineKey) -> Arc<KeySlot> {
        let mut slots = self.slots.lock();
        slots
            .entry(key.clone())
            .or_insert_with(|| {
                Arc::new(KeySlot {
                    state: tokio::sync::Mutex::new(None),
                })
            })
            .clone()
    }

    /// Read-through access: returns the fresh entry for `key`, invoking
    /// `refresh` when the entry is absent or expired.
    ///
    /// A failed refresh never replaces previously good data: callers get
    /// the old entry marked stale when one exists, the refresh error
    /// otherwise.
    pub async fn read_or_refresh<F, Fut, E>(
        &self,
        key: &HeadlineKey,
        refresh: F,
    ) -> Result<CacheRead, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(Vec<Article>, PipelineRunResult), E>>,
    {
        let slot = self.slot(key);
        let mut state = slot.state.lock().await;

        if let Some(entry) = state.as_ref() {
            if entry.fetched.elapsed() <= self.ttl {
                metrics::record_cache_event("hit");
                debug!(country = %key.country, category = %key.category, "Headline cache hit");
                return Ok(CacheRead {
                    entry: entry.clone(),
                    stale: false,
                    refreshed: false,
                });
            }
        }

        // Absent or expired. This caller refreshes while holding the key
        // lock; concurrent readers queue behind it and see the new entry.
        metrics::record_cache_event("miss");
        match refresh().await {
            Ok((articles, run)) => {
                let entry = CacheEntry {
                    articles,
                    run,
                    fetched_at: Utc::now(),
                    fetched: Instant::now(),
                };
                *state = Some(entry.clone());
                Ok(CacheRead {
                    entry,
                    stale: false,
                    refreshed: true,
                })
            }
            Err(err) => match state.as_ref() {
                Some(previous) => {
                    metrics::record_cache_event("stale_served");
                    warn!(
                        country = %key.country,
                        category = %key.category,
                        "Headline refresh failed, serving stale entry"
                    );
                    Ok(CacheRead {
                        entry: previous.clone(),
                        stale: true,
                        refreshed: false,
                    })
                }
                None => Err(err),
            },
        }
    }

    /// Returns the cached entry without refreshing, fresh or stale.
    pub async fn peek(&self, key: &HeadlineKey) -> Option<CacheEntry> {
        let slot = {
            let slots = self.slots.lock();
            slots.get(key).cloned()
        }?;
        let state = slot.state.lock().await;
        state.clone()
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}
