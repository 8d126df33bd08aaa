pub mod accessibility;
pub mod loader;
pub mod markup;
pub mod normalizer;
