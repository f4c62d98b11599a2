//! Synthetic embedder for tests and local wiring.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    DEFAULT_MAX_SEQ_LEN, MOCK_EMBEDDER_MODEL, MOCK_EMBEDDING_DIM, MOCK_EMBEDDING_STD_DEV,
};
use crate::embedding::backend::{Embedder, ModelInfo};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::normalize_l2;

/// Returns Gaussian noise vectors of [`MOCK_EMBEDDING_DIM`] components,
/// L2-normalized. Input content is ignored.
pub struct MockEmbedder {
    rng: Mutex<StdRng>,
    dimension: usize,
}

impl std::fmt::Debug for MockEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEmbedder")
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic output for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            dimension: MOCK_EMBEDDING_DIM,
        }
    }

    fn sample_vector(&self) -> Vec<f32> {
        let mut rng = self.rng.lock();
        let mut vector: Vec<f32> = (0..self.dimension)
            .map(|_| (gaussian(&mut *rng) * MOCK_EMBEDDING_STD_DEV) as f32)
            .collect();
        drop(rng);

        normalize_l2(&mut vector);
        vector
    }
}

/// Standard normal draw (Box–Muller).
pub(crate) fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // u1 in (0, 1] keeps ln() finite.
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn model_name(&self) -> &str {
        MOCK_EMBEDDER_MODEL
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::new(MOCK_EMBEDDER_MODEL, "mock_embedding")
            .with_dimension(Some(self.dimension))
            .with_max_seq_length(DEFAULT_MAX_SEQ_LEN)
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| self.sample_vector()).collect())
    }
}
