use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_SEQ_LEN;

use super::error::RerankerError;

/// Configuration for [`CrossEncoderReranker`](super::CrossEncoderReranker).
#[derive(Debug, Clone)]
pub struct CrossEncoderConfig {
    /// Identifier reported in responses.
    pub model_name: String,

    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,

    /// Token limit applied to each (query, candidate) pair.
    pub max_seq_len: usize,
}

impl CrossEncoderConfig {
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

    /// Checks that the model directory has everything a load needs.
    pub fn validate(&self) -> Result<(), RerankerError> {
        if !self.model_dir.is_dir() {
            return Err(RerankerError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        for file in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !self.model_dir.join(file).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", file, self.model_dir.display()),
                });
            }
        }

        if self.max_seq_len == 0 {
            return Err(RerankerError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
