//! Vector index and embedding collaborators.
//!
//! Both are trait seams: the pipeline depends on `VectorIndex` and
//! `Embedder`, never on a concrete service, so tests run against fakes
//! and the production wiring picks the REST implementations.

pub mod embedder;
pub mod pinecone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::IndexError;

/// One record in the vector index: id, embedding vector, metadata payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Statistics reported by the index service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStats {
    #[serde(rename = "totalVectorCount", default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub dimension: Option<u64>,
}

/// Remote vector index with upsert/fetch semantics. Each upsert is
/// independently committed; there is no cross-call atomicity.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Writes records into a namespace, returning the accepted count.
    async fn upsert(&self, namespace: &str, records: &[IndexRecord]) -> Result<usize, IndexError>;

    /// Fetches records by id; absent ids are simply missing from the map.
    async fn fetch(
        &self,
        namespace: &str,
        ids: &[String],
    ) -> Result<HashMap<String, IndexRecord>, IndexError>;

    /// Index-wide statistics, used for status probes.
    async fn describe_stats(&self) -> Result<IndexStats, IndexError>;
}

/// Turns embedding text into a vector of the configured dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError>;

    fn dimension(&self) -> usize;
}

pub use embedder::HttpEmbedder;
pub use pinecone::PineconeIndex;
