pub mod locator_model;
pub mod scorer;
pub mod signature;
pub mod synthesizer;
