pub mod hash_embedder;
pub mod ollama;
pub mod provider;
