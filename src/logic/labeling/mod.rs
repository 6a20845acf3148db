//! Labeling Module
//!
//! Rule-based weak labeling of feature vectors: benign (0) or suspicious (1).
//!
//! ## Structure
//! - `types`: WeakLabel, RuleHits, Classification
//! - `rules`: thresholds and the scheme identifier
//! - `classifier`: the rule evaluation
//!
//! ## Usage
//! ```ignore
//! use traffic_inspector::logic::{features, labeling};
//!
//! let result = labeling::classify(&features::extract(body));
//! if result.label.is_suspicious() {
//!     println!("{}", result.rule_hits);
//! }
//! ```

pub mod types;
pub mod rules;
pub mod classifier;

pub use types::{Classification, InvalidLabel, RuleHits, WeakLabel};
pub use rules::{RuleThresholds, LABELING_SCHEME};
pub use classifier::{classify, classify_with_thresholds};
