use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::provider::{normalize, EmbeddingProvider};
use crate::error::EmbedError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/embed";
pub const DEFAULT_MODEL: &str = "all-minilm";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Embeddings served by an Ollama instance (`/api/embed`).
pub struct OllamaEmbedder {
    pub endpoint: String,
    pub model: String,
    dimensions: usize,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    pub fn new(endpoint: Option<&str>, model: Option<&str>, dimensions: usize) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            endpoint: endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            dimensions,
            client,
        }
    }

    fn request(&self, texts: &[String]) -> Result<EmbedResponse, EmbedError> {
        let request_error = |source: reqwest::Error| EmbedError::Request {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::BadResponse(format!("HTTP {}", status)));
        }

        response
            .json::<EmbedResponse>()
            .map_err(|e| EmbedError::BadResponse(e.to_string()))
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbedError::EmptyInput);
        }

        debug!(model = %self.model, count = texts.len(), "requesting embeddings");
        let response = self.request(texts)?;
        validate(response.embeddings, texts.len(), self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Check count and width, then unit-normalize. Models are not guaranteed to
/// return normalized vectors.
fn validate(
    mut embeddings: Vec<Vec<f32>>,
    expected: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>, EmbedError> {
    if embeddings.len() != expected {
        return Err(EmbedError::CountMismatch {
            expected,
            actual: embeddings.len(),
        });
    }
    for vector in embeddings.iter_mut() {
        if vector.len() != dimensions {
            return Err(EmbedError::DimensionMismatch {
                expected: dimensions,
                actual: vector.len(),
            });
        }
        normalize(vector);
    }
    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_shape_is_checked() {
        let err = validate(vec![vec![1.0, 0.0]], 2, 2).unwrap_err();
        assert!(matches!(err, EmbedError::CountMismatch { expected: 2, actual: 1 }));

        let err = validate(vec![vec![1.0, 0.0, 0.0]], 1, 2).unwrap_err();
        assert!(matches!(err, EmbedError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn vectors_are_renormalized() {
        let out = validate(vec![vec![0.0, 2.0]], 1, 2).unwrap();
        assert_eq!(out, vec![vec![0.0, 1.0]]);
    }

    #[test]
    fn unreachable_endpoint_is_a_request_error() {
        let embedder = OllamaEmbedder::new(Some("http://127.0.0.1:9/api/embed"), None, 4);
        let err = embedder.embed(&["hello".to_string()]).unwrap_err();
        assert!(matches!(err, EmbedError::Request { .. }));
    }
}
