use super::traits::ConfigSection;
use crate::error::StackgpError;
use crate::types::OverflowPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub overflow_policy: OverflowPolicy,
}

impl ConfigSection for EvaluationConfig {
    fn validate(&self) -> Result<(), StackgpError> {
        Ok(())
    }
}
