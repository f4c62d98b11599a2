use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::constants::{SERVICE_STATUS_FAILED, SERVICE_STATUS_HEADER, SERVICE_STATUS_LOADING};
use crate::embedding::{EmbeddingError, RerankerError};
use crate::lifecycle::Readiness;
use crate::remote::RemoteError;
use crate::scoring::ScoringError;

const DEPENDENCY_UNAVAILABLE_MESSAGE: &str = "inference service unavailable";
const DEPENDENCY_MALFORMED_MESSAGE: &str = "inference service returned an invalid response";
const INTERNAL_MESSAGE: &str = "internal error";

/// Everything a handler can fail with, mapped to one status code per variant.
///
/// Only [`GatewayError::InvalidRequest`] and [`GatewayError::NotReady`] echo
/// their message. The other variants log their detail and answer with fixed
/// text.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model not ready ({0})")]
    NotReady(Readiness),

    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("dependency returned malformed output: {0}")]
    DependencyMalformed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotReady(_) | GatewayError::DependencyUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::DependencyMalformed(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short code sent in the status header.
    pub fn status_label(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::NotReady(Readiness::Failed) => SERVICE_STATUS_FAILED,
            GatewayError::NotReady(_) => SERVICE_STATUS_LOADING,
            GatewayError::DependencyUnavailable(_) => "dependency_unavailable",
            GatewayError::DependencyMalformed(_) => "dependency_error",
            GatewayError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            GatewayError::InvalidRequest(_) => self.to_string(),
            GatewayError::NotReady(Readiness::Failed) => "model failed to load".to_string(),
            GatewayError::NotReady(_) => "model is still loading".to_string(),
            GatewayError::DependencyUnavailable(_) => DEPENDENCY_UNAVAILABLE_MESSAGE.to_string(),
            GatewayError::DependencyMalformed(_) => DEPENDENCY_MALFORMED_MESSAGE.to_string(),
            GatewayError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl From<RemoteError> for GatewayError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unavailable { .. } => GatewayError::DependencyUnavailable(err.to_string()),
            RemoteError::Status { .. } | RemoteError::Malformed { .. } => {
                GatewayError::DependencyMalformed(err.to_string())
            }
            RemoteError::Client { .. } => GatewayError::Internal(err.to_string()),
        }
    }
}

impl From<EmbeddingError> for GatewayError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Remote(remote) => remote.into(),
            EmbeddingError::MalformedOutput { .. } => {
                GatewayError::DependencyMalformed(err.to_string())
            }
            _ => GatewayError::Internal(err.to_string()),
        }
    }
}

impl From<RerankerError> for GatewayError {
    fn from(err: RerankerError) -> Self {
        match err {
            RerankerError::Remote(remote) => remote.into(),
            _ => GatewayError::Internal(err.to_string()),
        }
    }
}

impl From<ScoringError> for GatewayError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Reranker(inner) => inner.into(),
            ScoringError::CountMismatch { .. } => GatewayError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() && !matches!(self, GatewayError::NotReady(_)) {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            SERVICE_STATUS_HEADER,
            HeaderValue::from_static(self.status_label()),
        );

        let body = Json(ErrorResponse {
            error: self.public_message(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
