use super::traits::ConfigSection;
use crate::error::StackgpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Fixed seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl ConfigSection for CrossoverConfig {
    fn validate(&self) -> Result<(), StackgpError> {
        Ok(())
    }
}
