use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::constants::{MAX_REMOTE_RERANK_CANDIDATES, NEUTRAL_SCORE};
use crate::embedding::backend::{DependencyHealth, ModelInfo, Reranker};
use crate::remote::{GenerateOptions, OllamaClient, RemoteResult};

use super::error::RerankerError;

/// Builds the relevance prompt sent for one (query, candidate) pair.
pub fn relevance_prompt(query: &str, candidate: &str) -> String {
    format!(
        "Rate the relevance of the following document to the query on a scale of 0.0 to 1.0.\n\n\
         Query: {query}\n\n\
         Document: {candidate}\n\n\
         Respond with only a number between 0.0 and 1.0 representing the relevance score:"
    )
}

/// Reads a relevance score from the first line of a completion.
///
/// Returns `None` unless the line is a finite number in `[0, 1]`.
pub fn parse_relevance(completion: &str) -> Option<f32> {
    let line = completion.trim().lines().next()?.trim();
    let value: f32 = line.parse().ok()?;
    (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(value)
}

/// LLM-as-judge reranker: one `/api/generate` call per candidate.
#[derive(Debug)]
pub struct OllamaReranker {
    client: OllamaClient,
    model_name: String,
}

impl OllamaReranker {
    pub fn new(base_url: &str, model_name: impl Into<String>) -> RemoteResult<Self> {
        let client = OllamaClient::new(base_url)?;
        let model_name = model_name.into();

        info!(
            model = %model_name,
            url = %client.base_url(),
            "Configured remote reranker"
        );

        Ok(Self { client, model_name })
    }
}

#[async_trait]
impl Reranker for OllamaReranker {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn max_candidates(&self) -> usize {
        MAX_REMOTE_RERANK_CANDIDATES
    }

    fn info(&self) -> ModelInfo {
        ModelInfo::new(&self.model_name, "llm_reranker").with_remote_url(self.client.base_url())
    }

    async fn check_health(&self) -> DependencyHealth {
        let url = self.client.base_url().to_string();
        match self.client.ping().await {
            Ok(()) => DependencyHealth::Reachable { url },
            Err(e) => DependencyHealth::Unreachable {
                url,
                reason: e.to_string(),
            },
        }
    }

    async fn score(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>, RerankerError> {
        let mut scores = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let prompt = relevance_prompt(query, candidate);
            let completion = self
                .client
                .generate(&self.model_name, &prompt, GenerateOptions::scoring())
                .await?;

            let score = match parse_relevance(&completion) {
                Some(score) => score,
                None => {
                    warn!(
                        index,
                        completion = %completion.trim(),
                        fallback = NEUTRAL_SCORE,
                        "Could not parse relevance score, using neutral score"
                    );
                    NEUTRAL_SCORE
                }
            };
            debug!(index, score, "Scored candidate");
            scores.push(score);
        }

        Ok(scores)
    }
}
