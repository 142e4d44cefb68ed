//! Pinecone REST implementation of the vector index.
//!
//! Talks to a single index host configured at startup; the index itself
//! (creation, scaling) is administered elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::{IndexRecord, IndexStats, VectorIndex};
use crate::error::IndexError;
use crate::http_client::{ServiceClient, SharedHttp, TransportError};

pub struct PineconeIndex {
    client: ServiceClient,
    host: String,
    api_key: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [IndexRecord],
    namespace: &'a str,
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, IndexRecord>,
}

impl PineconeIndex {
    pub fn new(shared: Arc<SharedHttp>, host: &str, api_key: String, rate_limit_rpm: u32) -> Self {
        Self {
            client: ServiceClient::new(shared, "pinecone", rate_limit_rpm),
            host: host.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn map_transport(e: TransportError) -> IndexError {
        match e {
            TransportError::Http(err) => IndexError::from(err),
            TransportError::Closed => IndexError::Network("http client shut down".to_string()),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, IndexError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            Err(IndexError::Network(format!("{}: {}", status, body)))
        } else {
            Err(IndexError::Write(format!("{}: {}", status, body)))
        }
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, namespace: &str, records: &[IndexRecord]) -> Result<usize, IndexError> {
        let url = format!("{}/vectors/upsert", self.host);
        let body = UpsertRequest {
            vectors: records,
            namespace,
        };

        let request = self
            .client
            .inner()
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(Self::map_transport)?;
        let response = Self::check_status(response).await?;

        let ack: UpsertResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Write(format!("malformed upsert ack: {}", e)))?;

        debug!(
            namespace = namespace,
            upserted = ack.upserted_count,
            "Upserted records"
        );
        Ok(ack.upserted_count)
    }

    async fn fetch(
        &self,
        namespace: &str,
        ids: &[String],
    ) -> Result<HashMap<String, IndexRecord>, IndexError> {
        let url = format!("{}/vectors/fetch", self.host);
        let mut params: Vec<(&str, String)> =
            ids.iter().map(|id| ("ids", id.clone())).collect();
        params.push(("namespace", namespace.to_string()));

        let request = self
            .client
            .inner()
            .get(&url)
            .header("Api-Key", &self.api_key)
            .query(&params);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(Self::map_transport)?;
        let response = Self::check_status(response).await?;

        let fetched: FetchResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Write(format!("malformed fetch response: {}", e)))?;

        Ok(fetched.vectors)
    }

    async fn describe_stats(&self) -> Result<IndexStats, IndexError> {
        let url = format!("{}/describe_index_stats", self.host);

        let request = self
            .client
            .inner()
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({}));

        let response = self
            .client
            .execute(request)
            .await
            .map_err(Self::map_transport)?;
        let response = Self::check_status(response).await?;

        let stats: IndexStats = response
            .json()
            .await
            .map_err(|e| IndexError::Write(format!("malformed stats response: {}", e)))?;

        info!(
            vectors = stats.total_vector_count,
            "Fetched index statistics"
        );
        Ok(stats)
    }
}
