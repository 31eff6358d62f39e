use serde::{Deserialize, Serialize};

/// What the reverse pass differentiates with respect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivativeTarget {
    /// Input feature columns (Variable loads)
    Features,
    /// Free constants (Constant loads)
    Constants,
}

/// How an expression treats infinite results at its evaluation boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Hand back IEEE-754 results untouched
    #[default]
    Propagate,
    /// Replace any result containing an infinity with an all-NaN matrix
    MaskAsNan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_defaults_to_propagate() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Propagate);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&OverflowPolicy::MaskAsNan).unwrap();
        assert_eq!(json, "\"MaskAsNan\"");
        let back: OverflowPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OverflowPolicy::MaskAsNan);
    }
}
