//! Estimation configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the estimation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Confidence level used when the caller does not ask for one.
    pub default_confidence: f64,
    /// Multiplier added per unmet dependency.
    pub dependency_penalty: f64,
    /// Floor for the lower bound of any interval, in hours.
    pub min_lower_bound: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            default_confidence: 0.8,
            dependency_penalty: 0.1,
            min_lower_bound: 0.1,
        }
    }
}

impl EstimationConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default confidence level.
    pub fn with_default_confidence(mut self, level: f64) -> Self {
        self.default_confidence = level;
        self
    }

    /// Sets the per-dependency penalty.
    pub fn with_dependency_penalty(mut self, penalty: f64) -> Self {
        self.dependency_penalty = penalty;
        self
    }

    /// Sets the lower bound floor.
    pub fn with_min_lower_bound(mut self, hours: f64) -> Self {
        self.min_lower_bound = hours;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstimationConfig::default();

        assert_eq!(config.default_confidence, 0.8);
        assert_eq!(config.dependency_penalty, 0.1);
        assert_eq!(config.min_lower_bound, 0.1);
    }

    #[test]
    fn test_config_builder() {
        let config = EstimationConfig::new()
            .with_default_confidence(0.95)
            .with_dependency_penalty(0.25)
            .with_min_lower_bound(0.5);

        assert_eq!(config.default_confidence, 0.95);
        assert_eq!(config.dependency_penalty, 0.25);
        assert_eq!(config.min_lower_bound, 0.5);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: EstimationConfig =
            serde_json::from_str(r#"{"dependency_penalty": 0.2}"#).unwrap();

        assert_eq!(config.dependency_penalty, 0.2);
        assert_eq!(config.default_confidence, 0.8);
    }
}
