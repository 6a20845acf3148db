//! Alert Threshold Configuration
//!
//! Maps an external score to the external label. Fixed per pipeline.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_THRESHOLD;
use crate::logic::labeling::WeakLabel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Score at or above this is labeled suspicious
    pub threshold: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

impl ThresholdConfig {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn is_alert(&self, score: f32) -> bool {
        score >= self.threshold
    }

    pub fn label_for(&self, score: f32) -> WeakLabel {
        WeakLabel::from_flag(self.is_alert(score))
    }
}
