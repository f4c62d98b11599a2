//! Wire types for the Ollama HTTP API subset used here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct EmbeddingsRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
}

/// `embedding` is optional so a missing field surfaces as
/// [`RemoteError::Malformed`](super::RemoteError::Malformed) rather than a decode error.
#[derive(Debug, Deserialize)]
pub struct EmbeddingsResponse {
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

/// Sampling options forwarded to `/api/generate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

impl GenerateOptions {
    /// Near-deterministic settings for short numeric answers.
    pub const fn scoring() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            num_predict: 10,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}
