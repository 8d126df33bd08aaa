use serde::Serialize;

use crate::error::ResolveError;
use crate::locator::locator_model::CandidateElement;

/// A candidate with its scores after one or both ranking stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: CandidateElement,
    /// Index in the normalized candidate list (document order).
    #[serde(skip)]
    pub position: usize,
    pub semantic_score: f32,
    pub heuristic_bonus: f32,
    pub final_score: f32,
}

impl RankedCandidate {
    /// Not yet ranked: all scores zero.
    pub fn unranked(candidate: CandidateElement, position: usize) -> Self {
        Self::semantic(candidate, position, 0.0)
    }

    /// Stage-1 result: no bonus yet.
    pub fn semantic(candidate: CandidateElement, position: usize, similarity: f32) -> Self {
        Self {
            candidate,
            position,
            semantic_score: similarity,
            heuristic_bonus: 0.0,
            final_score: similarity,
        }
    }

    pub fn with_bonus(mut self, bonus: f32) -> Self {
        self.heuristic_bonus = bonus;
        self.final_score = self.semantic_score + bonus;
        self
    }

    pub fn signature(&self) -> &str {
        &self.candidate.signature
    }
}

/// Per-request inputs shared by the ranking stages.
#[derive(Debug, Clone)]
pub struct RankContext {
    /// Instruction as given; Stage-2 reads this.
    pub instruction: String,
    /// Distilled query; Stage-1 embeds this.
    pub query: String,
    pub top_k: usize,
}

impl RankContext {
    pub fn new(instruction: &str, query: &str, top_k: usize) -> Self {
        Self {
            instruction: instruction.to_string(),
            query: query.to_string(),
            top_k,
        }
    }
}

/// One ranking pass.
pub trait RankingStrategy {
    fn rank(
        &self,
        candidates: Vec<RankedCandidate>,
        context: &RankContext,
    ) -> Result<Vec<RankedCandidate>, ResolveError>;
}

/// Descending sort on `final_score`; ties go to document order.
pub fn sort_by_final_score(ranked: &mut [RankedCandidate]) {
    ranked.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then(a.position.cmp(&b.position))
    });
}
