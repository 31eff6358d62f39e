use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackgpError {
    #[error("Invalid expression structure: {0}")]
    InvalidStructure(String),

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(i32),

    #[error("Feature index {index} out of range for input with {features} columns")]
    FeatureOutOfRange { index: usize, features: usize },

    #[error("Constant index {index} out of range for {available} constants")]
    ConstantOutOfRange { index: usize, available: usize },

    #[error("Constant at command {position} has no assigned index")]
    UnassignedConstant { position: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StackgpError>;
