//! Embedding and reranking sidecars for retrieval-augmented generation.
//!
//! The crate backs two binaries, `embedder` and `reranker`. Each one serves a
//! small JSON API over a single backend chosen at startup.
//!
//! ## Modules
//! - [`config`]: environment-driven [`ServiceConfig`]
//! - [`embedding`]: the [`Embedder`] and [`Reranker`] traits and their library,
//!   remote and mock backends
//! - [`remote`]: [`OllamaClient`] used by the remote backends
//! - [`scoring`]: blank filtering, clamping and scatter shared by all rerankers
//! - [`lifecycle`]: [`ModelSlot`] readiness, background loading and shutdown
//! - [`gateway`]: Axum routers and handlers

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod lifecycle;
pub mod remote;
pub mod scoring;

pub use config::{BackendKind, ConfigError, ServiceConfig, ServiceKind};
pub use embedding::{
    DependencyHealth, Embedder, EmbeddingError, ModelInfo, Reranker, RerankerError,
    build_embedder, build_reranker,
};
pub use gateway::{
    EmbedderState, GatewayError, RerankerState, ServiceState, create_embedder_router,
    create_reranker_router,
};
pub use lifecycle::{
    LifecycleError, LifecycleResult, ModelSlot, Readiness, load_into_slot, serve_until_shutdown,
};
pub use remote::{OllamaClient, RemoteError};
pub use scoring::{CandidateScores, ScoringError, score_candidates};
