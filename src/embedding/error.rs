use std::path::PathBuf;
use thiserror::Error;

use crate::remote::RemoteError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid model configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedding backend returned malformed output: {reason}")]
    MalformedOutput { reason: String },

    #[error("remote embedding call failed: {0}")]
    Remote(#[from] RemoteError),
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for EmbeddingError {
    fn from(err: tokio::task::JoinError) -> Self {
        EmbeddingError::InferenceFailed {
            reason: format!("inference task aborted: {err}"),
        }
    }
}
