//! Embedding and reranking backends.
//!
//! - [`backend`] defines the [`Embedder`] and [`Reranker`] traits the HTTP
//!   layer is written against.
//! - [`sentence`], [`ollama`] and [`mock`] implement [`Embedder`].
//! - [`reranker`] holds the [`Reranker`] implementations.
//! - [`factory`] picks one of each at startup.

pub mod backend;
/// BERT and XLM-RoBERTa encoder and classifier wrappers.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
pub mod factory;
pub mod mock;
pub mod ollama;
pub mod reranker;
/// In-process sentence embedder.
pub mod sentence;
/// Tokenizer loading and vector helpers.
pub mod utils;

#[cfg(test)]
mod fixtures;

pub use backend::{DependencyHealth, Embedder, ModelInfo, Reranker};
pub use error::EmbeddingError;
pub use factory::{build_embedder, build_reranker};
pub use mock::MockEmbedder;
pub use ollama::OllamaEmbedder;
pub use reranker::{
    CrossEncoderConfig, CrossEncoderReranker, MockReranker, OllamaReranker, RerankerError, sigmoid,
};
pub use sentence::{LocalEmbedder, LocalEmbedderConfig};
