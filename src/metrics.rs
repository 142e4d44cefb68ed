//! Prometheus metrics for the ingestion pipeline.
//!
//! Metrics include:
//! - articles fetched/processed/failed per scope
//! - upstream errors by kind
//! - headline cache hits, misses, stale serves
//! - run latency histogram per mode

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramOpts, HistogramVec,
    IntCounterVec, TextEncoder,
};
use tracing::{error, info};

/// Pipeline run modes
pub const MODE_TOPIC: &str = "topic";
pub const MODE_HEADLINES: &str = "headlines";
pub const MODE_DOMAIN: &str = "domain";

static ARTICLES_FETCHED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ingestion_articles_fetched_total",
        "Articles returned by the upstream news source",
        &["scope"]
    )
    .expect("Failed to create articles_fetched metric")
});

static ARTICLES_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ingestion_articles_processed_total",
        "Articles embedded and upserted into the vector index",
        &["scope"]
    )
    .expect("Failed to create articles_processed metric")
});

static ARTICLES_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ingestion_articles_failed_total",
        "Articles dropped by normalization, embedding or index errors",
        &["scope"]
    )
    .expect("Failed to create articles_failed metric")
});

static UPSTREAM_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ingestion_upstream_errors_total",
        "Failed upstream fetches by error kind",
        &["kind"]
    )
    .expect("Failed to create upstream_errors metric")
});

static CACHE_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "ingestion_headline_cache_events_total",
        "Headline cache hits, misses and stale serves",
        &["event"]
    )
    .expect("Failed to create cache_events metric")
});

static RUN_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];
    register_histogram_vec!(
        HistogramOpts::new(
            "ingestion_run_latency_seconds",
            "Latency of one fetch-and-upsert run"
        )
        .buckets(buckets),
        &["mode"]
    )
    .expect("Failed to create run_latency metric")
});

/// Records the per-article counts of one run.
pub fn record_run_counts(scope: &str, fetched: u64, processed: u64, failed: u64) {
    ARTICLES_FETCHED.with_label_values(&[scope]).inc_by(fetched);
    ARTICLES_PROCESSED
        .with_label_values(&[scope])
        .inc_by(processed);
    ARTICLES_FAILED.with_label_values(&[scope]).inc_by(failed);
}

/// Records a failed upstream fetch.
pub fn record_upstream_error(kind: &str) {
    UPSTREAM_ERRORS.with_label_values(&[kind]).inc();
}

/// Records a headline cache event: "hit", "miss" or "stale_served".
pub fn record_cache_event(event: &str) {
    CACHE_EVENTS.with_label_values(&[event]).inc();
}

/// Records run latency for a mode.
pub fn record_run_latency(mode: &str, latency_secs: f64) {
    RUN_LATENCY.with_label_values(&[mode]).observe(latency_secs);
}

/// Collects all metrics as Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

/// Observes run latency on drop.
pub struct RunTimer {
    mode: &'static str,
    start: std::time::Instant,
}

impl RunTimer {
    pub fn new(mode: &'static str) -> Self {
        Self {
            mode,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for RunTimer {
    fn drop(&mut self) {
        record_run_latency(self.mode, self.start.elapsed().as_secs_f64());
    }
}

// ============================================
// METRICS SERVER
// ============================================

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn handle_metrics(_req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let metrics = gather_metrics();
    Ok(Response::new(Full::new(Bytes::from(metrics))))
}

/// Serves Prometheus text metrics over HTTP.
pub async fn start_metrics_server(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, "Metrics server listening");

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(handle_metrics))
                .await
            {
                error!(error = %e, "Error serving metrics connection");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        record_run_counts("ai", 7, 6, 1);
        record_upstream_error("rate_limit");
        record_cache_event("hit");
        record_run_latency(MODE_HEADLINES, 0.2);

        let metrics = gather_metrics();
        assert!(metrics.contains("ingestion_articles_fetched_total"));
        assert!(metrics.contains("ingestion_upstream_errors_total"));
        assert!(metrics.contains("ingestion_headline_cache_events_total"));
        assert!(metrics.contains("ingestion_run_latency_seconds"));
    }

    #[test]
    fn test_run_timer() {
        {
            let _timer = RunTimer::new(MODE_TOPIC);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let metrics = gather_metrics();
        assert!(metrics.contains("ingestion_run_latency_seconds"));
    }
}
