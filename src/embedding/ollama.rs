//! Embedder backed by a remote Ollama daemon.

use std::sync::OnceLock;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::embedding::backend::{DependencyHealth, Embedder, ModelInfo};
use crate::embedding::error::EmbeddingError;
use crate::remote::{OllamaClient, RemoteResult};

/// Sends one `/api/embeddings` call per text, sequentially.
///
/// The dimension is unknown until the first vector comes back; after that it
/// is fixed for the process and reported by `/info`.
#[derive(Debug)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    model_name: String,
    dimension: OnceLock<usize>,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model_name: impl Into<String>) -> RemoteResult<Self> {
        let client = OllamaClient::new(base_url)?;
        let model_name = model_name.into();

        info!(
            model = %model_name,
            url = %client.base_url(),
            "Configured remote embedder"
        );

        Ok(Self {
            client,
            model_name,
            dimension: OnceLock::new(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension.get().copied()
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::new(&self.model_name, "remote_embedding")
            .with_dimension(self.dimension())
            .with_remote_url(self.client.base_url())
    }

    async fn check_health(&self) -> DependencyHealth {
        let url = self.client.base_url().to_string();
        match self.client.ping().await {
            Ok(()) => DependencyHealth::Reachable { url },
            Err(e) => DependencyHealth::Unreachable {
                url,
                reason: e.to_string(),
            },
        }
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for (index, text) in texts.iter().enumerate() {
            let vector = self.client.embed(&self.model_name, text.trim()).await?;

            if vector.is_empty() {
                return Err(EmbeddingError::MalformedOutput {
                    reason: format!("empty embedding for text {index}"),
                });
            }

            let expected = *self.dimension.get_or_init(|| {
                debug!(dimension = vector.len(), "Discovered remote embedding dimension");
                vector.len()
            });
            if vector.len() != expected {
                return Err(EmbeddingError::MalformedOutput {
                    reason: format!(
                        "text {index} embedded to {} dimensions, expected {expected}",
                        vector.len()
                    ),
                });
            }

            vectors.push(vector);
        }

        Ok(vectors)
    }
}
