//! Ingestion pipeline CLI.
//!
//! One-shot operational entry points mirroring what the scheduler calls:
//! topic, headlines, domain and batch ingestion plus a status probe.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use newsvector_ingestion::config::Config;
use newsvector_ingestion::http_client::{HttpClientConfig, SharedHttp};
use newsvector_ingestion::index::{HttpEmbedder, PineconeIndex};
use newsvector_ingestion::pipeline::{NewsPipeline, ProcessOptions};
use newsvector_ingestion::sources::NewsApiSource;
use newsvector_ingestion::{metrics, BatchResult, PipelineRunResult};

/// News ingestion and vector indexing pipeline
#[derive(Parser, Debug)]
#[command(name = "newsvector-ingestion")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch news articles and index them for semantic retrieval")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, default_value = "false", global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest articles for one topic
    Topic {
        /// Topic to search for
        topic: String,

        /// Article language (ISO 639-1)
        #[arg(long)]
        language: Option<String>,

        /// Upstream sort order (publishedAt, relevancy, popularity)
        #[arg(long)]
        sort_by: Option<String>,

        /// Fetch articles published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<chrono::NaiveDate>,

        /// Overall run deadline (e.g. "30s", "2m")
        #[arg(long)]
        timeout: Option<humantime::Duration>,
    },

    /// Ingest current top headlines (cache-backed)
    Headlines {
        /// Country code
        #[arg(short, long, default_value = "us")]
        country: String,

        /// Headline category (business, technology, ...)
        #[arg(long)]
        category: Option<String>,

        /// Maximum headlines kept in the cached result set
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Ingest articles from one publisher domain
    Domain {
        /// Domain to fetch, e.g. "bbc.co.uk"
        domain: String,

        /// Fetch articles published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<chrono::NaiveDate>,

        /// Overall run deadline (e.g. "30s", "2m")
        #[arg(long)]
        timeout: Option<humantime::Duration>,
    },

    /// Ingest multiple topics with bounded concurrency
    Batch {
        /// Topics to process
        #[arg(required = true)]
        topics: Vec<String>,

        /// Fetch articles published on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<chrono::NaiveDate>,
    },

    /// Probe the news source and the vector index
    Status,
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_pipeline(config: Config) -> Result<NewsPipeline> {
    let http_config = HttpClientConfig {
        max_concurrent_requests: config.max_concurrent_requests,
        request_timeout: config.request_timeout(),
        ..Default::default()
    };
    let shared = Arc::new(SharedHttp::new(&http_config)?);

    let source = Arc::new(NewsApiSource::new(
        shared.clone(),
        &config.news_api_url,
        config.news_api_key.clone().unwrap_or_default(),
        config.news_rate_limit_rpm,
    ));

    let index = Arc::new(PineconeIndex::new(
        shared.clone(),
        &config.pinecone_host,
        config.pinecone_api_key.clone().unwrap_or_default(),
        config.index_rate_limit_rpm,
    ));

    let embedder = Arc::new(HttpEmbedder::new(
        shared,
        &config.embedding_url,
        config.embedding_api_key.clone(),
        &config.embedding_model,
        config.embedding_dimension,
    ));

    Ok(NewsPipeline::new(config, source, index, embedder)?)
}

fn print_run(result: &PipelineRunResult) {
    println!("\n=== Pipeline Results ===");
    println!("Scope:              {}", result.scope);
    println!("Success:            {}", result.success);
    println!("Articles fetched:   {}", result.articles_fetched);
    println!("Articles processed: {}", result.articles_processed);
    println!("Articles failed:    {}", result.articles_failed);
    if let Some(ref error) = result.error {
        println!("Error:              {}", error);
    }
    println!("Timestamp:          {}", result.timestamp.to_rfc3339());
}

fn print_batch(batch: &BatchResult) {
    println!("\n=== Batch Results ===");
    println!("Topics succeeded: {}", batch.topics_succeeded);
    println!("Topics failed:    {}", batch.topics_failed);
    for result in &batch.results {
        println!(
            "  {} -> success={} fetched={} processed={} failed={}",
            result.scope,
            result.success,
            result.articles_fetched,
            result.articles_processed,
            result.articles_failed
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let config = Config::load()?;

    if config.metrics_enabled {
        let addr: SocketAddr = ([0, 0, 0, 0], config.metrics_port).into();
        tokio::spawn(async move {
            if let Err(e) = metrics::start_metrics_server(addr).await {
                error!(error = %e, "Metrics server failed");
            }
        });
    }

    let pipeline = build_pipeline(config)?;
    info!("Pipeline initialized");

    let success = match cli.command {
        Commands::Topic {
            topic,
            language,
            sort_by,
            from,
            timeout,
        } => {
            let mut opts = ProcessOptions::new();
            opts.language = language;
            opts.sort_by = sort_by;
            opts.from = from;
            opts.deadline = timeout.map(|d| *d);

            let result = pipeline.process_topic(&topic, &opts).await;
            print_run(&result);
            result.success
        }

        Commands::Headlines {
            country,
            category,
            limit,
        } => {
            let result = pipeline
                .process_headlines(&country, category.as_deref(), limit)
                .await;
            print_run(&result);
            result.success
        }

        Commands::Domain {
            domain,
            from,
            timeout,
        } => {
            let mut opts = ProcessOptions::new();
            opts.from = from;
            opts.deadline = timeout.map(|d| *d);

            let result = pipeline.process_domain(&domain, &opts).await;
            print_run(&result);
            result.success
        }

        Commands::Batch { topics, from } => {
            let mut opts = ProcessOptions::new();
            opts.from = from;

            let batch = pipeline.process_batch(&topics, &opts).await;
            print_batch(&batch);
            batch.topics_failed == 0
        }

        Commands::Status => {
            let status = pipeline.status().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            true
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
