//! Startup-time backend selection.
//!
//! Both builders may block (library backends load weights and run a warm-up
//! pass), so they are meant to run on the blocking pool.

use std::sync::Arc;

use tracing::info;

use crate::config::{BackendKind, ServiceConfig};

use super::backend::{Embedder, Reranker};
use super::error::EmbeddingError;
use super::mock::MockEmbedder;
use super::ollama::OllamaEmbedder;
use super::reranker::{
    CrossEncoderConfig, CrossEncoderReranker, MockReranker, OllamaReranker, RerankerError,
};
use super::sentence::{LocalEmbedder, LocalEmbedderConfig};

/// Builds the embedder selected by `config.backend`.
pub fn build_embedder(config: &ServiceConfig) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    info!(backend = %config.backend, model = %config.model_name, "Building embedder");

    let embedder: Arc<dyn Embedder> = match config.backend {
        BackendKind::Library => Arc::new(LocalEmbedder::load(LocalEmbedderConfig::new(
            &config.model_name,
            config.model_dir(),
        ))?),
        BackendKind::Remote => Arc::new(OllamaEmbedder::new(
            &config.ollama_url,
            &config.model_name,
        )?),
        BackendKind::Mock => Arc::new(MockEmbedder::new()),
    };

    Ok(embedder)
}

/// Builds the reranker selected by `config.backend`.
pub fn build_reranker(config: &ServiceConfig) -> Result<Arc<dyn Reranker>, RerankerError> {
    info!(backend = %config.backend, model = %config.model_name, "Building reranker");

    let reranker: Arc<dyn Reranker> = match config.backend {
        BackendKind::Library => Arc::new(CrossEncoderReranker::load(CrossEncoderConfig::new(
            &config.model_name,
            config.model_dir(),
        ))?),
        BackendKind::Remote => Arc::new(OllamaReranker::new(
            &config.ollama_url,
            &config.model_name,
        )?),
        BackendKind::Mock => Arc::new(MockReranker::new()),
    };

    Ok(reranker)
}
