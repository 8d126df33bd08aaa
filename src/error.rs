use thiserror::Error;

/// Failures raised by an `EmbeddingProvider`.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// HTTP transport failed (connection refused, timeout, ...)
    #[error("embedding request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered, but not with something we can use
    #[error("embedding provider returned a bad response: {0}")]
    BadResponse(String),

    #[error("embedding provider returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An input string had nothing to embed
    #[error("cannot embed an empty string")]
    EmptyInput,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The embedding provider failed; the request cannot be ranked semantically.
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(#[from] EmbedError),

    #[error("failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error ({context}): {source}")]
    SnapshotParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The instruction has no text to resolve
    #[error("instruction is blank")]
    BlankInstruction,
}
