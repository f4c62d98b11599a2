//! Minimal client for an Ollama-compatible inference daemon.
//!
//! One request per call, a fixed per-request timeout, no retries. Callers map
//! [`RemoteError`] into their own taxonomy.

pub mod error;
pub mod types;

pub use error::{RemoteError, RemoteResult};
pub use types::GenerateOptions;

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::constants::{REMOTE_HEALTH_TIMEOUT, REMOTE_REQUEST_TIMEOUT};
use types::{EmbeddingsRequest, EmbeddingsResponse, GenerateRequest, GenerateResponse};

const BODY_PREVIEW_CHARS: usize = 256;

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
}

impl OllamaClient {
    /// Creates a client with the default 30 s request timeout.
    pub fn new(base_url: impl Into<String>) -> RemoteResult<Self> {
        Self::with_timeout(base_url, REMOTE_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Probes `GET /api/tags` with the short health timeout.
    pub async fn ping(&self) -> RemoteResult<()> {
        let url = self.url("/api/tags");
        let response = self
            .http
            .get(&url)
            .timeout(REMOTE_HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| RemoteError::from_reqwest(&self.base_url, e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RemoteError::Unavailable {
                url: self.base_url.clone(),
                reason: format!("health probe returned {}", response.status()),
            })
        }
    }

    /// Embeds a single prompt via `POST /api/embeddings`.
    pub async fn embed(&self, model: &str, prompt: &str) -> RemoteResult<Vec<f32>> {
        let body: EmbeddingsResponse = self
            .post_json("/api/embeddings", &EmbeddingsRequest { model, prompt })
            .await?;

        body.embedding.ok_or_else(|| RemoteError::Malformed {
            reason: "response is missing the `embedding` field".to_string(),
        })
    }

    /// Runs a non-streaming completion via `POST /api/generate`.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: GenerateOptions,
    ) -> RemoteResult<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options,
        };
        let body: GenerateResponse = self.post_json("/api/generate", &request).await?;

        body.response.ok_or_else(|| RemoteError::Malformed {
            reason: "response is missing the `response` field".to_string(),
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> RemoteResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "Calling inference service");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::from_reqwest(&self.base_url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text.chars().take(BODY_PREVIEW_CHARS).collect(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::from_reqwest(&self.base_url, e))
    }
}
