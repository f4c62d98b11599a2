//! In-process sentence embedder (BERT-family safetensors + tokenizer).
//!
//! Texts are encoded as one padded batch, mean-pooled and L2-normalized.
//! Inference runs on the blocking pool so request handlers stay responsive.

/// Local embedder configuration.
pub mod config;

#[cfg(test)]
mod tests;

pub use config::{LocalEmbedderConfig, SUPPORTED_MODELS, known_dimension};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use candle_core::Device;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::NORM_TOLERANCE;
use crate::embedding::backend::{Embedder, ModelInfo};
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{
    batch_tensors, is_unit_norm, l2_norm, load_batch_tokenizer, normalize_l2,
};

struct EncoderState {
    model: BertEncoder,
    tokenizer: Tokenizer,
    device: Device,
}

impl EncoderState {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = self.tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let batch = batch_tensors(&encodings, &self.device)?;
        debug!(
            batch_size = texts.len(),
            seq_len = encodings.first().map_or(0, |e| e.get_ids().len()),
            "Running encoder forward pass"
        );

        let pooled = self
            .model
            .forward(&batch.input_ids, &batch.type_ids, &batch.attention_mask)?;
        let mut vectors = pooled.to_vec2::<f32>()?;

        for (index, vector) in vectors.iter_mut().enumerate() {
            normalize_l2(vector);
            if !is_unit_norm(vector, NORM_TOLERANCE) {
                warn!(index, norm = l2_norm(vector), "Embedding vector is not normalized");
            }
        }

        Ok(vectors)
    }
}

/// Library-backed embedder holding a loaded model for the process lifetime.
pub struct LocalEmbedder {
    state: Arc<EncoderState>,
    config: LocalEmbedderConfig,
    dimension: usize,
}

impl std::fmt::Debug for LocalEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbedder")
            .field("device", &format!("{:?}", self.state.device))
            .field("config", &self.config)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl LocalEmbedder {
    /// Loads the model, tokenizer and runs a warm-up encode.
    ///
    /// Blocking; call from a blocking context.
    pub fn load(config: LocalEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = select_device();
        debug!(?device, "Selected compute device for embedder");

        let started = Instant::now();
        info!(
            model = %config.model_name,
            model_dir = %config.model_dir.display(),
            "Loading embedding model"
        );

        let model = BertEncoder::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;

        let tokenizer = load_batch_tokenizer(&config.model_dir, config.max_seq_len).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let dimension = match known_dimension(&config.model_name) {
            Some(dim) if dim != model.hidden_size() => {
                return Err(EmbeddingError::InvalidConfig {
                    reason: format!(
                        "{} is expected to produce {} dimensions, model hidden_size is {}",
                        config.model_name,
                        dim,
                        model.hidden_size()
                    ),
                });
            }
            Some(dim) => dim,
            None => model.hidden_size(),
        };

        let embedder = Self {
            state: Arc::new(EncoderState {
                model,
                tokenizer,
                device,
            }),
            config,
            dimension,
        };

        let warmup = embedder.state.encode(&["test".to_string()])?;
        info!(
            model = %embedder.config.model_name,
            dimension,
            warmup_shape = ?(warmup.len(), warmup.first().map_or(0, Vec::len)),
            load_ms = started.elapsed().as_millis() as u64,
            "Embedding model loaded"
        );

        Ok(embedder)
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::new(&self.config.model_name, "sentence_embedding")
            .with_dimension(Some(self.dimension))
            .with_max_seq_length(self.config.max_seq_len)
            .with_supported_models(
                SUPPORTED_MODELS
                    .iter()
                    .map(|(name, _)| name.to_string())
                    .collect(),
            )
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let state = Arc::clone(&self.state);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || state.encode(&texts)).await?
    }
}
