use std::time::Instant;

use axum::{Json, extract::State};
use tracing::{info, instrument, warn};

use crate::constants::MAX_EMBED_TEXTS;
use crate::scoring::score_candidates;

use super::error::GatewayError;
use super::payload::{EmbedRequest, EmbedResponse, RerankRequest, RerankResponse};
use super::state::{EmbedderState, RerankerState};

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

pub(crate) fn validate_texts(texts: &[String]) -> Result<(), GatewayError> {
    if texts.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "texts list is empty".to_string(),
        ));
    }
    if texts.len() > MAX_EMBED_TEXTS {
        return Err(GatewayError::InvalidRequest(format!(
            "too many texts ({}, max {})",
            texts.len(),
            MAX_EMBED_TEXTS
        )));
    }
    Ok(())
}

pub(crate) fn validate_rerank(
    request: &RerankRequest,
    max_candidates: usize,
) -> Result<(), GatewayError> {
    if request.query.trim().is_empty() {
        return Err(GatewayError::InvalidRequest("query is empty".to_string()));
    }
    if request.candidates.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "candidates list is empty".to_string(),
        ));
    }
    if request.candidates.len() > max_candidates {
        return Err(GatewayError::InvalidRequest(format!(
            "too many candidates ({}, max {})",
            request.candidates.len(),
            max_candidates
        )));
    }
    Ok(())
}

/// `POST /embed` and `POST /embed/batch`.
#[instrument(skip(state, body), fields(backend = %state.backend))]
pub async fn embed_handler(
    State(state): State<EmbedderState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<EmbedResponse>, GatewayError> {
    let embedder = state.model()?;
    let request: EmbedRequest = parse_body(body)?;
    validate_texts(&request.texts)?;

    let started = Instant::now();
    let vectors = embedder.embed(&request.texts).await?;

    if vectors.len() != request.texts.len() {
        return Err(GatewayError::DependencyMalformed(format!(
            "backend returned {} vectors for {} texts",
            vectors.len(),
            request.texts.len()
        )));
    }

    let dim = embedder
        .dimension()
        .or_else(|| vectors.first().map(Vec::len))
        .unwrap_or(0);
    if let Some(bad) = vectors.iter().position(|v| v.len() != dim) {
        return Err(GatewayError::DependencyMalformed(format!(
            "vector {} has {} dimensions, expected {}",
            bad,
            vectors[bad].len(),
            dim
        )));
    }

    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(
        count = vectors.len(),
        dim,
        processing_time_ms,
        "Embedded texts"
    );

    Ok(Json(EmbedResponse {
        vectors,
        dim,
        model: embedder.model_name().to_string(),
        processing_time_ms,
    }))
}

/// `POST /rerank` and `POST /rerank/batch`.
#[instrument(skip(state, body), fields(backend = %state.backend))]
pub async fn rerank_handler(
    State(state): State<RerankerState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<RerankResponse>, GatewayError> {
    let reranker = state.model()?;
    let request: RerankRequest = parse_body(body)?;
    validate_rerank(&request, reranker.max_candidates())?;

    let started = Instant::now();
    let result = score_candidates(reranker.as_ref(), &request.query, &request.candidates).await?;

    if result.blank() > 0 {
        warn!(
            blank = result.blank(),
            total = request.candidates.len(),
            "Blank candidates scored 0.0"
        );
    }

    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(
        count = result.scores.len(),
        scored = result.scored,
        top_score = result.scores.iter().copied().fold(0.0_f32, f32::max),
        processing_time_ms,
        "Reranked candidates"
    );

    Ok(Json(RerankResponse {
        scores: result.scores,
        processing_time_ms,
        model: reranker.model_name().to_string(),
    }))
}
