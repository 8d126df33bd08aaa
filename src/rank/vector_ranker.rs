use std::sync::Arc;

use tracing::debug;

use crate::embedding::provider::{dot, EmbeddingProvider};
use crate::error::{EmbedError, ResolveError};
use crate::rank::rank_model::{RankContext, RankedCandidate, RankingStrategy};

/// Stage-1: cosine similarity between the distilled query and each signature.
pub struct VectorRanker {
    provider: Arc<dyn EmbeddingProvider>,
}

impl VectorRanker {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }
}

impl RankingStrategy for VectorRanker {
    fn rank(
        &self,
        candidates: Vec<RankedCandidate>,
        context: &RankContext,
    ) -> Result<Vec<RankedCandidate>, ResolveError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // One provider call: query first, then signatures in order
        let mut texts = Vec::with_capacity(candidates.len() + 1);
        texts.push(context.query.clone());
        texts.extend(candidates.iter().map(|c| c.signature().to_string()));

        let mut vectors = self.provider.embed(&texts)?;
        if vectors.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            }
            .into());
        }
        let signature_vectors = vectors.split_off(1);
        let query_vector = &vectors[0];

        let ranked = rank_by_similarity(query_vector, &signature_vectors, candidates, context.top_k);
        for r in &ranked {
            debug!(
                position = r.position,
                similarity = r.semantic_score,
                signature = %r.signature(),
                "stage-1"
            );
        }
        Ok(ranked)
    }
}

/// Score each candidate against `query`, drop negative similarities, and keep
/// the `top_k` best. Ties go to the earlier document position.
pub fn rank_by_similarity(
    query: &[f32],
    signature_vectors: &[Vec<f32>],
    candidates: Vec<RankedCandidate>,
    top_k: usize,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .zip(signature_vectors)
        .filter_map(|(candidate, vector)| {
            let similarity = dot(query, vector);
            (similarity >= 0.0).then(|| {
                RankedCandidate::semantic(candidate.candidate, candidate.position, similarity)
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.semantic_score
            .total_cmp(&a.semantic_score)
            .then(a.position.cmp(&b.position))
    });
    ranked.truncate(top_k);
    ranked
}
