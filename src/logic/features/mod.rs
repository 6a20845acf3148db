//! Features Module - Feature Extraction Engine
//!
//! Turns a raw response body into the fixed 14-dimensional `FeatureVector`.
//! Each feature group lives in its own extractor and writes its own slots.

pub mod layout;
pub mod vector;
pub mod shape;
pub mod charset;
pub mod entropy;
pub mod keywords;

#[cfg(test)]
mod tests;

pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{FeatureError, FeatureVector};

use charset::CharClassFeatures;
use entropy::EntropyFeature;
use keywords::KeywordFeatures;
use shape::ShapeFeatures;

/// A feature group that fills its slots of the raw vector
pub trait FeatureExtractor {
    fn extract(&self, slots: &mut [f64; FEATURE_COUNT]);
}

/// Extract the feature vector of a body. Never fails.
pub fn extract(body: &str) -> FeatureVector {
    let mut slots = [0.0f64; FEATURE_COUNT];

    let shape = ShapeFeatures::from_body(body);
    let charset = CharClassFeatures::from_body(body);
    let entropy = EntropyFeature::from_body(body);
    let keywords = KeywordFeatures::from_body(body);

    let groups: [&dyn FeatureExtractor; 4] = [&shape, &charset, &entropy, &keywords];
    for group in groups {
        group.extract(&mut slots);
    }

    FeatureVector::from_values(slots)
}

/// Extract from an optional body; `None` reads as the empty body
pub fn extract_opt(body: Option<&str>) -> FeatureVector {
    extract(body.unwrap_or(""))
}
