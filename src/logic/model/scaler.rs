//! Standardization parameters from training (`scaler.json`)
//!
//! Format: `{"mean": [14 numbers], "std": [14 numbers]}`. A zero (or NaN)
//! std entry divides by 1 instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::inference::ScoringError;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, Deserialize)]
struct RawScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scaler {
    pub mean: [f64; FEATURE_COUNT],
    pub std: [f64; FEATURE_COUNT],
}

impl Scaler {
    /// Mean 0, std 1
    pub fn identity() -> Self {
        Self { mean: [0.0; FEATURE_COUNT], std: [1.0; FEATURE_COUNT] }
    }

    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let raw: RawScaler = serde_json::from_str(json)
            .map_err(|e| ScoringError::InvalidScaler(format!("parse error: {}", e)))?;

        let mean: [f64; FEATURE_COUNT] = raw.mean.as_slice().try_into().map_err(|_| {
            ScoringError::InvalidScaler(format!("mean needs {} values, got {}", FEATURE_COUNT, raw.mean.len()))
        })?;
        let std: [f64; FEATURE_COUNT] = raw.std.as_slice().try_into().map_err(|_| {
            ScoringError::InvalidScaler(format!("std needs {} values, got {}", FEATURE_COUNT, raw.std.len()))
        })?;

        Ok(Self { mean, std })
    }

    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::ScalerLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// `(x - mean) / std` per feature, narrowed to f32 for the model
    pub fn standardize(&self, features: &FeatureVector) -> [f32; FEATURE_COUNT] {
        let x = features.as_array();
        let mut out = [0.0f32; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let s = self.std[i];
            let s = if s == 0.0 || s.is_nan() { 1.0 } else { s };
            out[i] = ((x[i] - self.mean[i]) / s) as f32;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_valid() {
        let json = serde_json::json!({ "mean": vec![1.0; 14], "std": vec![2.0; 14] }).to_string();
        let scaler = Scaler::from_json(&json).unwrap();

        let v = FeatureVector::from_values([5.0; FEATURE_COUNT]);
        assert_eq!(scaler.standardize(&v), [2.0f32; FEATURE_COUNT]);
    }

    #[test]
    fn test_from_json_wrong_length() {
        let json = serde_json::json!({ "mean": vec![0.0; 13], "std": vec![1.0; 14] }).to_string();
        let err = Scaler::from_json(&json).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidScaler(_)));
    }

    #[test]
    fn test_missing_field() {
        assert!(Scaler::from_json(r#"{"mean": []}"#).is_err());
    }

    #[test]
    fn test_zero_std_divides_by_one() {
        let mut scaler = Scaler::identity();
        scaler.mean[0] = 1.0;
        scaler.std[0] = 0.0;

        let mut raw = [0.0; FEATURE_COUNT];
        raw[0] = 4.0;
        let out = scaler.standardize(&FeatureVector::from_values(raw));
        assert_eq!(out[0], 3.0);
    }
}
