/// Scores aligned with the caller's candidate list.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScores {
    /// One score per input candidate, each in `[0, 1]`. Blank candidates are `0.0`.
    pub scores: Vec<f32>,

    /// How many candidates were actually sent to the backend.
    pub scored: usize,
}

impl CandidateScores {
    /// All-zero result for a list with no scorable candidates.
    pub fn zeros(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
            scored: 0,
        }
    }

    pub fn blank(&self) -> usize {
        self.scores.len() - self.scored
    }
}
