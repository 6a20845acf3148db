//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared with the scoring model
//! and with exported datasets.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    // === Shape (0-2) ===
    "length",           // 0: Character count of the body
    "lineCount",        // 1: Number of lines (split on \r\n, \r, \n)
    "avgLineLength",    // 2: length / lineCount

    // === Character classes (3-5) ===
    "digitRatio",       // 3: ASCII digits / length
    "alphaRatio",       // 4: ASCII letters / length
    "symbolRatio",      // 5: everything else except space/tab / length

    // === Randomness (6) ===
    "entropy",          // 6: Shannon entropy (bits) of the first 50k chars

    // === Keyword counters (7-13) ===
    "kw_eval",          // 7
    "kw_atob",          // 8
    "kw_fromCharCode",  // 9
    "kw_unescape",      // 10
    "kw_documentWrite", // 11
    "kw_script",        // 12
    "kw_iframe",        // 13
];

/// Total number of features
pub const FEATURE_COUNT: usize = 14;

// Indices used by the extractor and the rule classifier
pub const IDX_LENGTH: usize = 0;
pub const IDX_LINE_COUNT: usize = 1;
pub const IDX_AVG_LINE_LENGTH: usize = 2;
pub const IDX_DIGIT_RATIO: usize = 3;
pub const IDX_ALPHA_RATIO: usize = 4;
pub const IDX_SYMBOL_RATIO: usize = 5;
pub const IDX_ENTROPY: usize = 6;
pub const IDX_KW_EVAL: usize = 7;
pub const IDX_KW_ATOB: usize = 8;
pub const IDX_KW_FROM_CHAR_CODE: usize = 9;
pub const IDX_KW_UNESCAPE: usize = 10;
pub const IDX_KW_DOCUMENT_WRITE: usize = 11;
pub const IDX_KW_SCRIPT: usize = 12;
pub const IDX_KW_IFRAME: usize = 13;

/// Ratio features, bounded to [0, 1]
pub const RATIO_INDICES: [usize; 3] = [IDX_DIGIT_RATIO, IDX_ALPHA_RATIO, IDX_SYMBOL_RATIO];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information embedded in export metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check if layout is compatible (same version, same hash)
    pub fn is_compatible(&self) -> bool {
        self.feature_version == FEATURE_VERSION && self.layout_hash == layout_hash()
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 14);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("length"), Some(IDX_LENGTH));
        assert_eq!(feature_index("entropy"), Some(IDX_ENTROPY));
        assert_eq!(feature_index("kw_iframe"), Some(IDX_KW_IFRAME));
        assert_eq!(feature_index("cpu_percent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(IDX_SYMBOL_RATIO), Some("symbolRatio"));
        assert_eq!(feature_name(FEATURE_COUNT), None);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert!(info.is_compatible());
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);

        let stale = LayoutInfo { feature_version: FEATURE_VERSION + 1, ..info };
        assert!(!stale.is_compatible());
    }
}
