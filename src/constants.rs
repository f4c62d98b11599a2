//! Cross-cutting, shared constants.
//!
//! Request caps and timeouts are part of the HTTP contract that upstream RAG
//! clients rely on, so they live here rather than next to individual backends.

use std::time::Duration;

/// Maximum number of texts accepted by a single embed request.
pub const MAX_EMBED_TEXTS: usize = 100;

/// Maximum number of candidates accepted by a rerank request (in-process backends).
pub const MAX_RERANK_CANDIDATES: usize = 64;

/// Maximum number of candidates accepted by the LLM-backed reranker.
pub const MAX_REMOTE_RERANK_CANDIDATES: usize = 20;

/// Allowed deviation from unit norm before a vector is reported as unnormalized.
pub const NORM_TOLERANCE: f32 = 0.01;

/// Default max token length for in-process models.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Mock embedder output dimension.
pub const MOCK_EMBEDDING_DIM: usize = 1024;

/// Standard deviation of the mock embedder's Gaussian components.
pub const MOCK_EMBEDDING_STD_DEV: f64 = 0.1;

/// Model identifier reported by the mock embedder.
pub const MOCK_EMBEDDER_MODEL: &str = "mock-embedder";

/// Model identifier reported by the mock reranker.
pub const MOCK_RERANKER_MODEL: &str = "mock-reranker";

/// Score used when an LLM answer cannot be interpreted as a relevance value.
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Per-request timeout for outbound inference calls.
pub const REMOTE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the dependency probe behind `/health`.
pub const REMOTE_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default base URL of the remote inference daemon.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Response header carrying a short machine-readable service status.
pub const SERVICE_STATUS_HEADER: &str = "X-Service-Status";
pub const SERVICE_STATUS_HEALTHY: &str = "healthy";
pub const SERVICE_STATUS_LOADING: &str = "loading";
pub const SERVICE_STATUS_FAILED: &str = "failed";
pub const SERVICE_STATUS_UNREACHABLE: &str = "unreachable";
