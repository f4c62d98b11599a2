//! Backend-independent candidate scoring.
//!
//! Every reranker backend goes through [`score_candidates`], so the response
//! invariants (one score per candidate, scores in `[0, 1]`, blank candidates
//! exactly `0.0`) hold regardless of which backend produced the numbers.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::{clamp_score, score_candidates};
pub use types::CandidateScores;
