//! HTTP layer (Axum) shared by both services.
//!
//! Each router wraps one [`ModelSlot`](crate::lifecycle::ModelSlot). Until the
//! slot is ready, model-dependent routes answer `503`.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{embed_handler, rerank_handler};
pub use payload::{EmbedRequest, EmbedResponse, HealthResponse, RerankRequest, RerankResponse};
pub use state::{EmbedderState, RerankerState, ServiceState};

use crate::constants::{
    SERVICE_STATUS_FAILED, SERVICE_STATUS_HEADER, SERVICE_STATUS_HEALTHY, SERVICE_STATUS_LOADING,
    SERVICE_STATUS_UNREACHABLE,
};
use crate::embedding::{DependencyHealth, ModelInfo};
use crate::lifecycle::Readiness;

pub fn create_embedder_router(state: EmbedderState) -> Router {
    Router::new()
        .route("/health", get(embedder_health_handler))
        .route("/info", get(embedder_info_handler))
        .route("/embed", post(embed_handler))
        .route("/embed/batch", post(embed_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_reranker_router(state: RerankerState) -> Router {
    Router::new()
        .route("/health", get(reranker_health_handler))
        .route("/info", get(reranker_info_handler))
        .route("/rerank", post(rerank_handler))
        .route("/rerank/batch", post(rerank_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// What a ready model reports for `/health`.
struct Probe {
    dependency: DependencyHealth,
    dimension: Option<usize>,
}

fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

fn health_response<T: ?Sized>(state: &ServiceState<T>, probe: Result<Probe, Readiness>) -> Response {
    let (code, status, detail, dimension, remote_url) = match probe {
        Ok(Probe {
            dependency: DependencyHealth::Unreachable { url, reason },
            dimension,
        }) => {
            tracing::warn!(url = %url, reason = %reason, "Inference service unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                SERVICE_STATUS_UNREACHABLE,
                Some(format!("inference service unreachable at {}", url)),
                dimension,
                Some(url),
            )
        }
        Ok(Probe {
            dependency,
            dimension,
        }) => (
            StatusCode::OK,
            SERVICE_STATUS_HEALTHY,
            None,
            dimension,
            dependency.url().map(str::to_string),
        ),
        Err(Readiness::Failed) => (
            StatusCode::SERVICE_UNAVAILABLE,
            SERVICE_STATUS_FAILED,
            Some("model failed to load".to_string()),
            None,
            None,
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            SERVICE_STATUS_LOADING,
            Some("model is still loading".to_string()),
            None,
            None,
        ),
    };

    let mut headers = HeaderMap::new();
    headers.insert(SERVICE_STATUS_HEADER, HeaderValue::from_static(status));

    (
        code,
        headers,
        Json(HealthResponse {
            status,
            model: state.model_name.clone(),
            backend: state.backend.as_str(),
            dimension,
            remote_url,
            detail,
            timestamp: unix_timestamp(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn embedder_health_handler(State(state): State<EmbedderState>) -> Response {
    let probe = match state.slot.get() {
        Ok(embedder) => Ok(Probe {
            dependency: embedder.check_health().await,
            dimension: embedder.dimension(),
        }),
        Err(readiness) => Err(readiness),
    };
    health_response(&state, probe)
}

#[tracing::instrument(skip(state))]
pub async fn reranker_health_handler(State(state): State<RerankerState>) -> Response {
    let probe = match state.slot.get() {
        Ok(reranker) => Ok(Probe {
            dependency: reranker.check_health().await,
            dimension: None,
        }),
        Err(readiness) => Err(readiness),
    };
    health_response(&state, probe)
}

pub async fn embedder_info_handler(
    State(state): State<EmbedderState>,
) -> Result<Json<ModelInfo>, GatewayError> {
    Ok(Json(state.model()?.info()))
}

pub async fn reranker_info_handler(
    State(state): State<RerankerState>,
) -> Result<Json<ModelInfo>, GatewayError> {
    Ok(Json(state.model()?.info()))
}
