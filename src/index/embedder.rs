//! HTTP embedding service client.
//!
//! Posts embedding text to an OpenAI-compatible `/embeddings` endpoint
//! and validates the returned dimension against configuration.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::Embedder;
use crate::error::IndexError;
use crate::http_client::{ServiceClient, SharedHttp, TransportError};

pub struct HttpEmbedder {
    client: ServiceClient,
    url: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(
        shared: Arc<SharedHttp>,
        url: &str,
        api_key: Option<String>,
        model: &str,
        dimension: usize,
    ) -> Self {
        Self {
            client: ServiceClient::new(shared, "embeddings", 300),
            url: url.to_string(),
            api_key,
            model: model.to_string(),
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError> {
        let body = serde_json::json!({
            "input": [text],
            "model": self.model,
        });

        let mut request = self.client.inner().post(&self.url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = self.client.execute(request).await.map_err(|e| match e {
            TransportError::Http(err) => {
                if err.is_timeout() || err.is_connect() {
                    IndexError::Network(err.to_string())
                } else {
                    IndexError::Embedding(err.to_string())
                }
            }
            TransportError::Closed => IndexError::Network("http client shut down".to_string()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Embedding(format!("{}: {}", status, body)));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Embedding(format!("malformed embedding response: {}", e)))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| IndexError::Embedding("empty embedding response".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(IndexError::Embedding(format!(
                "unexpected embedding dimension: got {}, expected {}",
                embedding.len(),
                self.dimension
            )));
        }

        debug!(chars = text.len(), dims = embedding.len(), "Generated embedding");
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_response_parsing() {
        let json = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "index": 0, "embedding": [0.1, -0.2, 0.3]}
            ],
            "model": "text-embedding-3-small"
        }"#;

        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding.len(), 3);
    }
}
