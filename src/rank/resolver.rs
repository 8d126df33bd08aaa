use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::embedding::provider::EmbeddingProvider;
use crate::error::ResolveError;
use crate::locator::locator_model::CandidateElement;
use crate::rank::distiller::distill;
use crate::rank::heuristic::{detect_action_type, ActionType, HeuristicRanker};
use crate::rank::rank_model::{RankContext, RankedCandidate, RankingStrategy};
use crate::rank::vector_ranker::VectorRanker;

pub const DEFAULT_TOP_K: usize = 10;

/// What to do when the embedding provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFailurePolicy {
    /// Surface `ResolveError::ProviderUnavailable`.
    #[default]
    Fail,
    /// Return the candidate with the highest static locator confidence,
    /// unranked.
    StaticBest,
}

/// Output of one resolution request.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub query: String,
    pub action: ActionType,
    /// True when the provider failed and the static fallback answered.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    pub ranked: Vec<RankedCandidate>,
}

/// Distill, rank by vector similarity, re-rank with heuristics.
///
/// Stateless per request; one resolver may serve concurrent callers.
pub struct TwoStageResolver {
    stage_one: VectorRanker,
    stage_two: HeuristicRanker,
    top_k: usize,
    on_provider_failure: ProviderFailurePolicy,
}

impl TwoStageResolver {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            stage_one: VectorRanker::new(provider),
            stage_two: HeuristicRanker,
            top_k: DEFAULT_TOP_K,
            on_provider_failure: ProviderFailurePolicy::Fail,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_failure_policy(mut self, policy: ProviderFailurePolicy) -> Self {
        self.on_provider_failure = policy;
        self
    }

    /// Distill, rank by similarity, then re-rank by action intent. A blank
    /// instruction is rejected before the provider is called.
    pub fn resolve(
        &self,
        instruction: &str,
        candidates: &[CandidateElement],
    ) -> Result<Resolution, ResolveError> {
        if instruction.trim().is_empty() {
            return Err(ResolveError::BlankInstruction);
        }

        let query = distill(instruction);
        let action = detect_action_type(instruction);
        let context = RankContext::new(instruction, &query, self.top_k);

        if candidates.is_empty() {
            return Ok(Resolution {
                query,
                action,
                fallback: false,
                ranked: Vec::new(),
            });
        }

        let unranked: Vec<RankedCandidate> = candidates
            .iter()
            .cloned()
            .enumerate()
            .map(|(position, c)| RankedCandidate::unranked(c, position))
            .collect();

        let stage_one = match self.stage_one.rank(unranked, &context) {
            Ok(ranked) => ranked,
            Err(ResolveError::ProviderUnavailable(err))
                if self.on_provider_failure == ProviderFailurePolicy::StaticBest =>
            {
                warn!(error = %err, "embedding provider failed, falling back to static best locator");
                return Ok(Resolution {
                    query,
                    action,
                    fallback: true,
                    ranked: static_best(candidates).into_iter().collect(),
                });
            }
            Err(err) => return Err(err),
        };

        let ranked = self.stage_two.rank(stage_one, &context)?;

        info!(
            query = %query,
            %action,
            candidates = candidates.len(),
            returned = ranked.len(),
            top = ranked.first().map(|r| r.signature()).unwrap_or(""),
            "resolved instruction"
        );

        Ok(Resolution {
            query,
            action,
            fallback: false,
            ranked,
        })
    }
}

/// Candidate whose best locator has the highest confidence; earliest wins ties.
pub fn static_best(candidates: &[CandidateElement]) -> Option<RankedCandidate> {
    let mut best: Option<(usize, f32)> = None;
    for (position, candidate) in candidates.iter().enumerate() {
        let confidence = candidate.best_locator().map(|l| l.confidence).unwrap_or(0.0);
        if best.map_or(true, |(_, top)| confidence > top) {
            best = Some((position, confidence));
        }
    }
    best.map(|(position, _)| RankedCandidate::unranked(candidates[position].clone(), position))
}
