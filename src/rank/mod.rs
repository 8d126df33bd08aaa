pub mod distiller;
pub mod heuristic;
pub mod rank_model;
pub mod resolver;
pub mod vector_ranker;
