use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_SEQ_LEN;
use crate::embedding::error::EmbeddingError;

/// Embedding models with a known output dimension.
///
/// A model in this table must produce exactly this many dimensions; anything
/// else is treated as a misconfigured model directory.
pub const SUPPORTED_MODELS: &[(&str, usize)] = &[
    ("intfloat/multilingual-e5-large", 1024),
    ("nomic-ai/nomic-embed-text-v1.5", 768),
    ("sentence-transformers/all-MiniLM-L6-v2", 384),
    ("intfloat/e5-large-v2", 1024),
];

/// Returns the advertised dimension of a known model.
pub fn known_dimension(model_name: &str) -> Option<usize> {
    SUPPORTED_MODELS
        .iter()
        .find(|(name, _)| *name == model_name)
        .map(|(_, dim)| *dim)
}

/// Configuration for [`LocalEmbedder`](super::LocalEmbedder).
#[derive(Debug, Clone)]
pub struct LocalEmbedderConfig {
    /// Identifier reported in responses.
    pub model_name: String,
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens per text.
    pub max_seq_len: usize,
}

impl LocalEmbedderConfig {
    pub fn new(model_name: impl Into<String>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_name: model_name.into(),
            model_dir: model_dir.into(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Checks that the model directory carries every file the loader reads.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be > 0".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        for file in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !self.model_dir.join(file).exists() {
                return Err(EmbeddingError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", file, self.model_dir.display()),
                });
            }
        }

        Ok(())
    }
}
