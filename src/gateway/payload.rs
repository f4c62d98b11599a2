use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmbedRequest {
    pub texts: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmbedResponse {
    pub vectors: Vec<Vec<f32>>,
    pub dim: usize,
    pub model: String,
    pub processing_time_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RerankRequest {
    pub query: String,
    pub candidates: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RerankResponse {
    pub scores: Vec<f32>,
    pub processing_time_ms: u64,
    pub model: String,
}

/// Body of `GET /health`.
#[derive(Serialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Unix time in seconds.
    pub timestamp: f64,
}
