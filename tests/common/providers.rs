use std::sync::atomic::{AtomicUsize, Ordering};

use semantic_locator::embedding::hash_embedder::HashEmbedder;
use semantic_locator::embedding::provider::EmbeddingProvider;
use semantic_locator::error::EmbedError;

/// Provider that is always down.
pub struct FailingProvider;

impl EmbeddingProvider for FailingProvider {
    fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Err(EmbedError::BadResponse("model not loaded".into()))
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Hash embedder that counts provider calls.
#[derive(Default)]
pub struct CountingProvider {
    inner: HashEmbedder,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for CountingProvider {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(texts)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "counting"
    }
}
