use tracing::debug;

use crate::embedding::Reranker;

use super::error::ScoringError;
use super::types::CandidateScores;

/// Pins a backend score into `[0, 1]`. NaN maps to `0.0`.
pub fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Scores `candidates` against `query` with any reranker backend.
///
/// Blank candidates are skipped and keep a `0.0` at their index. The rest are
/// trimmed, scored in one backend call, clamped, and scattered back in input
/// order. The backend is not called when nothing is left to score.
pub async fn score_candidates(
    reranker: &dyn Reranker,
    query: &str,
    candidates: &[String],
) -> Result<CandidateScores, ScoringError> {
    let (indices, valid): (Vec<usize>, Vec<String>) = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let trimmed = candidate.trim();
            (!trimmed.is_empty()).then(|| (index, trimmed.to_string()))
        })
        .unzip();

    if valid.is_empty() {
        debug!(
            num_candidates = candidates.len(),
            "No non-blank candidates, skipping backend"
        );
        return Ok(CandidateScores::zeros(candidates.len()));
    }

    debug!(
        query_len = query.len(),
        num_candidates = candidates.len(),
        num_valid = valid.len(),
        "Scoring candidates"
    );

    let raw = reranker.score(query.trim(), &valid).await?;
    if raw.len() != valid.len() {
        return Err(ScoringError::CountMismatch {
            expected: valid.len(),
            actual: raw.len(),
        });
    }

    let mut scores = vec![0.0; candidates.len()];
    for (index, score) in indices.into_iter().zip(raw) {
        scores[index] = clamp_score(score);
    }

    Ok(CandidateScores {
        scores,
        scored: valid.len(),
    })
}
