use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{DEFAULT_MAX_SEQ_LEN, MOCK_RERANKER_MODEL};
use crate::embedding::backend::{ModelInfo, Reranker};

use super::error::RerankerError;

const OVERLAP_WEIGHT: f32 = 0.7;
const NOISE_WEIGHT: f32 = 0.3;

/// Fraction of distinct query words that also appear in `candidate`.
///
/// Words are lowercased and split on whitespace.
pub fn word_overlap(query: &str, candidate: &str) -> f32 {
    let query_lower = query.to_lowercase();
    let candidate_lower = candidate.to_lowercase();
    let query_words: HashSet<&str> = query_lower.split_whitespace().collect();
    let candidate_words: HashSet<&str> = candidate_lower.split_whitespace().collect();

    let shared = query_words.intersection(&candidate_words).count();
    (shared as f32 / query_words.len().max(1) as f32).min(1.0)
}

/// Lexical overlap blended with uniform noise.
pub struct MockReranker {
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for MockReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockReranker").finish_non_exhaustive()
    }
}

impl Default for MockReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReranker {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic noise for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl Reranker for MockReranker {
    fn model_name(&self) -> &str {
        MOCK_RERANKER_MODEL
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::new(MOCK_RERANKER_MODEL, "mock_cross_encoder")
            .with_max_seq_length(DEFAULT_MAX_SEQ_LEN)
    }

    async fn score(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, RerankerError> {
        let mut rng = self.rng.lock();
        Ok(candidates
            .iter()
            .map(|candidate| {
                let noise: f32 = rng.gen_range(0.1..0.9);
                OVERLAP_WEIGHT * word_overlap(query, candidate) + NOISE_WEIGHT * noise
            })
            .collect())
    }
}
