pub mod evaluation;
pub mod generation;
pub mod simplification;
