//! Weak Labeling Rules & Thresholds
//!
//! Constants only. The rule set is versioned by `LABELING_SCHEME`; changing
//! any threshold means a new scheme identifier.

use serde::{Deserialize, Serialize};

/// Labeling scheme identifier written into exports
pub const LABELING_SCHEME: &str = "weak_label_rules_v1 (0=benign, 1=suspicious)";

/// Minimum scripting-keyword sum for `hit_keywords`
pub const KEYWORD_SUM_MIN: u32 = 1;

/// `hit_entropy_len`: entropy floor (bits/char)
pub const ENTROPY_MIN: f64 = 6.5;

/// `hit_entropy_len`: length floor, keeps short high-entropy tokens out
pub const ENTROPY_LENGTH_MIN: f64 = 5000.0;

/// `hit_symbol_obf`: symbol ratio floor
pub const SYMBOL_RATIO_MIN: f64 = 0.28;

/// `hit_symbol_obf`: alpha ratio ceiling
pub const ALPHA_RATIO_MAX: f64 = 0.55;

/// `hit_symbol_obf`: length floor
pub const SYMBOL_LENGTH_MIN: f64 = 2000.0;

/// `hit_iframe_script`: minimum count of each tag
pub const TAG_COUNT_MIN: f64 = 1.0;

/// Rule thresholds as one value, for diagnostics and export metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    pub keyword_sum_min: u32,
    pub entropy_min: f64,
    pub entropy_length_min: f64,
    pub symbol_ratio_min: f64,
    pub alpha_ratio_max: f64,
    pub symbol_length_min: f64,
    pub tag_count_min: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            keyword_sum_min: KEYWORD_SUM_MIN,
            entropy_min: ENTROPY_MIN,
            entropy_length_min: ENTROPY_LENGTH_MIN,
            symbol_ratio_min: SYMBOL_RATIO_MIN,
            alpha_ratio_max: ALPHA_RATIO_MAX,
            symbol_length_min: SYMBOL_LENGTH_MIN,
            tag_count_min: TAG_COUNT_MIN,
        }
    }
}
