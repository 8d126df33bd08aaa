use sha1::{Digest, Sha1};

use crate::embedding::provider::{normalize, EmbeddingProvider};
use crate::error::EmbedError;

pub const DEFAULT_DIMENSIONS: usize = 384;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// In-process embedder based on feature hashing.
///
/// Each lower-cased word and each boundary-marked character trigram
/// (`#si`, `sig`, ..., `gn#`) is hashed with SHA-1 into a signed bucket. The
/// result is stable across processes and platforms, so it doubles as the
/// test embedder. Shared vocabulary and spelling give positive similarity;
/// it has no notion of synonyms.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let mut vector = vec![0.0f32; self.dimensions];
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            // Symbols only: treat the whole string as one feature
            self.add_feature(&mut vector, "w", &lowered, WORD_WEIGHT);
        }

        for word in &words {
            self.add_feature(&mut vector, "w", word, WORD_WEIGHT);

            let marked: Vec<char> = format!("#{}#", word).chars().collect();
            for gram in marked.windows(3) {
                let gram: String = gram.iter().collect();
                self.add_feature(&mut vector, "g", &gram, TRIGRAM_WEIGHT);
            }
        }

        normalize(&mut vector);
        Ok(vector)
    }

    fn add_feature(&self, vector: &mut [f32], kind: &str, feature: &str, weight: f32) {
        let mut hasher = Sha1::new();
        hasher.update(kind.as_bytes());
        hasher.update(b":");
        hasher.update(feature.as_bytes());
        let digest = hasher.finalize();

        let bucket = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize
            % self.dimensions;
        let sign = if digest[4] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::provider::dot;

    fn embed(e: &HashEmbedder, text: &str) -> Vec<f32> {
        e.embed(&[text.to_string()]).unwrap().remove(0)
    }

    #[test]
    fn identical_text_has_unit_similarity() {
        let e = HashEmbedder::default();
        let a = embed(&e, "button: Sign In");
        let b = embed(&e, "button: Sign In");
        assert_eq!(a, b);
        assert!((dot(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_words_score_above_unrelated() {
        let e = HashEmbedder::default();
        let q = embed(&e, "Sign In");
        let related = embed(&e, "button: Sign In, id: login");
        let unrelated = embed(&e, "link: Privacy policy");
        assert!(dot(&q, &related) > dot(&q, &unrelated));
    }

    #[test]
    fn empty_text_is_rejected() {
        let e = HashEmbedder::default();
        let err = e.embed(&["   ".to_string()]).unwrap_err();
        assert!(matches!(err, EmbedError::EmptyInput));
    }

    #[test]
    fn symbol_only_text_still_embeds() {
        let e = HashEmbedder::new(16);
        let v = embed(&e, "→");
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }
}
