use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use candle_core::Device;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::backend::{ModelInfo, Reranker};
use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{batch_tensors, load_batch_tokenizer};

use super::config::CrossEncoderConfig;
use super::error::RerankerError;
use super::sigmoid;

struct ClassifierState {
    model: BertClassifier,
    tokenizer: Tokenizer,
    device: Device,
}

impl ClassifierState {
    fn score_pairs(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, RerankerError> {
        let pairs: Vec<(&str, &str)> = candidates.iter().map(|c| (query, c.as_str())).collect();

        let encodings = self.tokenizer.encode_batch(pairs, true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let batch = batch_tensors(&encodings, &self.device)?;
        debug!(
            pairs = candidates.len(),
            seq_len = encodings.first().map_or(0, |e| e.get_ids().len()),
            "Running cross-encoder forward pass"
        );

        let logits =
            self.model
                .forward(&batch.input_ids, &batch.type_ids, &batch.attention_mask)?;

        Ok(logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .into_iter()
            .map(sigmoid)
            .collect())
    }
}

/// Library-backed cross-encoder: one batched forward pass per request.
pub struct CrossEncoderReranker {
    state: Arc<ClassifierState>,
    config: CrossEncoderConfig,
}

impl std::fmt::Debug for CrossEncoderReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoderReranker")
            .field("device", &format!("{:?}", self.state.device))
            .field("config", &self.config)
            .finish()
    }
}

impl CrossEncoderReranker {
    /// Loads the classifier and tokenizer, then scores a warm-up pair.
    ///
    /// Blocking; call from a blocking context.
    pub fn load(config: CrossEncoderConfig) -> Result<Self, RerankerError> {
        config.validate()?;

        let device = select_device();
        debug!(?device, "Selected compute device for reranker");

        let started = Instant::now();
        info!(
            model = %config.model_name,
            model_dir = %config.model_dir.display(),
            "Loading reranker model"
        );

        let model = BertClassifier::load(&config.model_dir, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer = load_batch_tokenizer(&config.model_dir, config.max_seq_len).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let reranker = Self {
            state: Arc::new(ClassifierState {
                model,
                tokenizer,
                device,
            }),
            config,
        };

        let warmup = reranker
            .state
            .score_pairs("test query", &["test document".to_string()])?;
        info!(
            model = %reranker.config.model_name,
            warmup_score = warmup.first().copied(),
            load_ms = started.elapsed().as_millis() as u64,
            "Reranker model loaded"
        );

        Ok(reranker)
    }
}

#[async_trait]
impl Reranker for CrossEncoderReranker {
    fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::new(&self.config.model_name, "cross_encoder")
            .with_max_seq_length(self.config.max_seq_len)
    }

    async fn score(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, RerankerError> {
        let state = Arc::clone(&self.state);
        let query = query.to_string();
        let candidates = candidates.to_vec();
        tokio::task::spawn_blocking(move || state.score_pairs(&query, &candidates)).await?
    }
}
