//! Reranker backends: cross-encoder, remote LLM judge and mock.
//!
//! Backends only score the candidates they are given. Blank filtering,
//! clamping and index scatter live in [`crate::scoring`].

pub mod config;
pub mod cross_encoder;
pub mod error;
pub mod mock;
pub mod ollama;


pub use config::CrossEncoderConfig;
pub use cross_encoder::CrossEncoderReranker;
pub use error::RerankerError;
pub use mock::MockReranker;
pub use ollama::OllamaReranker;

/// Logistic function mapping a raw logit into `(0, 1)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
