//! Inspector Configuration
//!
//! Scoring and alerting switches plus timeouts. Defaults come from
//! `constants.rs`; `from_env` applies environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::logic::model::ThresholdConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Runtime configuration of the capture pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// External score at or above this raises an alert
    pub threshold: f32,
    /// Request external scores for stored samples
    pub ml_enabled: bool,
    /// Forward alerts to the relay
    pub page_alert_enabled: bool,
    pub score_timeout_ms: u64,
    pub fetch_timeout_ms: u64,
    /// Directory holding `model.onnx` and `scaler.json`
    pub model_dir: Option<PathBuf>,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            threshold: constants::DEFAULT_THRESHOLD,
            ml_enabled: constants::DEFAULT_ML_ENABLED,
            page_alert_enabled: constants::DEFAULT_PAGE_ALERT_ENABLED,
            score_timeout_ms: constants::DEFAULT_SCORE_TIMEOUT_MS,
            fetch_timeout_ms: constants::DEFAULT_FETCH_TIMEOUT_MS,
            model_dir: None,
        }
    }
}

impl InspectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            threshold: constants::get_threshold(),
            ml_enabled: constants::is_ml_enabled(),
            page_alert_enabled: constants::is_page_alert_enabled(),
            score_timeout_ms: constants::get_score_timeout().as_millis() as u64,
            fetch_timeout_ms: constants::get_fetch_timeout().as_millis() as u64,
            model_dir: constants::get_model_dir(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.score_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("score"));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("fetch"));
        }
        Ok(())
    }

    pub fn threshold_config(&self) -> ThresholdConfig {
        ThresholdConfig::new(self.threshold)
    }

    pub fn score_timeout(&self) -> Duration {
        Duration::from_millis(self.score_timeout_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InspectorConfig::default();
        assert_eq!(config.threshold, 0.5);
        assert!(config.ml_enabled);
        assert!(config.page_alert_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = InspectorConfig { threshold: 1.5, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold(1.5)));

        let nan = InspectorConfig { threshold: f32::NAN, ..Default::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let config = InspectorConfig { score_timeout_ms: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout("score")));
    }
}
