//! Backend traits shared by the embedder and reranker services.
//!
//! Each service shell (see [`crate::gateway`]) owns one trait object and never
//! knows which backend sits behind it. Backends are chosen at startup by
//! [`crate::embedding::factory`].

use async_trait::async_trait;
use serde::Serialize;

use super::error::EmbeddingError;
use super::reranker::RerankerError;

/// Model metadata reported by `GET /info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub model_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_seq_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_models: Option<Vec<String>>,
}

impl ModelInfo {
    pub fn new(model_name: impl Into<String>, model_type: &'static str) -> Self {
        Self {
            model_name: model_name.into(),
            model_type,
            dimension: None,
            max_seq_length: None,
            remote_url: None,
            supported_models: None,
        }
    }

    pub fn with_dimension(mut self, dimension: Option<usize>) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_max_seq_length(mut self, max_seq_length: usize) -> Self {
        self.max_seq_length = Some(max_seq_length);
        self
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    pub fn with_supported_models(mut self, models: Vec<String>) -> Self {
        self.supported_models = Some(models);
        self
    }
}

/// Reachability of whatever a backend depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyHealth {
    /// No external dependency (in-process model or mock).
    Local,
    /// Remote daemon answered its probe.
    Reachable { url: String },
    /// Remote daemon could not be probed.
    Unreachable { url: String, reason: String },
}

impl DependencyHealth {
    pub fn is_healthy(&self) -> bool {
        !matches!(self, DependencyHealth::Unreachable { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            DependencyHealth::Local => None,
            DependencyHealth::Reachable { url } | DependencyHealth::Unreachable { url, .. } => {
                Some(url)
            }
        }
    }
}

/// Texts → vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier echoed in responses.
    fn model_name(&self) -> &str;

    /// Output dimension, if known before the first request.
    fn dimension(&self) -> Option<usize>;

    /// Metadata for `GET /info`.
    fn info(&self) -> ModelInfo;

    /// Probes the backend's dependency (if any) for `GET /health`.
    async fn check_health(&self) -> DependencyHealth {
        DependencyHealth::Local
    }

    /// Embeds every text, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// (query, candidates) → relevance scores.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Model identifier echoed in responses.
    fn model_name(&self) -> &str;

    /// Largest candidate list a single request may carry.
    fn max_candidates(&self) -> usize {
        crate::constants::MAX_RERANK_CANDIDATES
    }

    /// Metadata for `GET /info`.
    fn info(&self) -> ModelInfo;

    /// Probes the backend's dependency (if any) for `GET /health`.
    async fn check_health(&self) -> DependencyHealth {
        DependencyHealth::Local
    }

    /// Scores non-blank, trimmed candidates against `query`.
    ///
    /// Returns exactly one score per candidate, in input order. Blank filtering,
    /// clamping and scatter-back happen in [`crate::scoring`].
    async fn score(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, RerankerError>;
}
