//! Feature Vector - Core data structure for rule and ML input
//!
//! The dimension is part of the type: a `FeatureVector` always holds exactly
//! `FEATURE_COUNT` finite values. Dynamic input (imported JSON, foreign
//! arrays) goes through `TryFrom` and fails with `FeatureError`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layout::{self, FEATURE_COUNT, FEATURE_LAYOUT, RATIO_INDICES};

// ============================================================================
// ERRORS
// ============================================================================

/// Malformed feature data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("feature vector must have {expected} values, got {actual}")]
    WrongDimension { expected: usize, actual: usize },

    #[error("feature {name} is not finite")]
    NonFinite { name: &'static str },

    #[error("ratio feature {name} out of range: {value}")]
    RatioOutOfRange { name: &'static str, value: f64 },
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Fixed-size feature vector in `FEATURE_LAYOUT` order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// All-zero vector
    pub fn zeroed() -> Self {
        Self { values: [0.0; FEATURE_COUNT] }
    }

    /// Build from raw values, mapping NaN/Infinity to 0
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values: values.map(finite_or_zero) }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// Check the extractor contract: finite values, ratios in [0, 1]
    pub fn validate(&self) -> Result<(), FeatureError> {
        for (i, v) in self.values.iter().enumerate() {
            if !v.is_finite() {
                return Err(FeatureError::NonFinite { name: FEATURE_LAYOUT[i] });
            }
        }

        for i in RATIO_INDICES {
            let v = self.values[i];
            if !(0.0..=1.0).contains(&v) {
                return Err(FeatureError::RatioOutOfRange { name: FEATURE_LAYOUT[i], value: v });
            }
        }

        Ok(())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": layout::FEATURE_VERSION,
            "layout_hash": layout::layout_hash(),
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = FeatureError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let array: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| FeatureError::WrongDimension {
            expected: FEATURE_COUNT,
            actual: values.len(),
        })?;
        Ok(Self::from_values(array))
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = FeatureError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(values.as_slice())
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

// ============================================================================
// TESTS
// ============================================================================
