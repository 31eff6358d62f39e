pub mod traits;
pub mod evaluation;
pub mod crossover;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evaluation::EvaluationConfig;
pub use crossover::CrossoverConfig;
pub use traits::ConfigSection;
