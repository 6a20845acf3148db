//! Rule Types
//!
//! Weak label and rule-hit records. No classification logic here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// WEAK LABEL
// ============================================================================

/// Heuristic label used as proxy ground truth. Serialized as `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WeakLabel {
    Benign,
    Suspicious,
}

impl WeakLabel {
    pub fn from_flag(suspicious: bool) -> Self {
        if suspicious { WeakLabel::Suspicious } else { WeakLabel::Benign }
    }

    pub fn is_suspicious(&self) -> bool {
        matches!(self, WeakLabel::Suspicious)
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            WeakLabel::Benign => 0,
            WeakLabel::Suspicious => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeakLabel::Benign => "benign",
            WeakLabel::Suspicious => "suspicious",
        }
    }
}

impl std::fmt::Display for WeakLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<WeakLabel> for u8 {
    fn from(label: WeakLabel) -> Self {
        label.as_u8()
    }
}

#[derive(Debug, Error)]
#[error("label must be 0 or 1, got {0}")]
pub struct InvalidLabel(pub u8);

impl TryFrom<u8> for WeakLabel {
    type Error = InvalidLabel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeakLabel::Benign),
            1 => Ok(WeakLabel::Suspicious),
            other => Err(InvalidLabel(other)),
        }
    }
}

// ============================================================================
// RULE HITS
// ============================================================================

/// Which heuristic conditions fired for a feature vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHits {
    pub hit_keywords: bool,
    pub hit_entropy_len: bool,
    pub hit_symbol_obf: bool,
    pub hit_iframe_script: bool,
    /// Raw sum of the five scripting-keyword counters
    #[serde(rename = "kwSum")]
    pub kw_sum: u32,
}

impl RuleHits {
    pub fn any(&self) -> bool {
        self.hit_keywords || self.hit_entropy_len || self.hit_symbol_obf || self.hit_iframe_script
    }

    /// Names of the rules that fired
    pub fn reasons(&self) -> Vec<&'static str> {
        let mut reasons = Vec::new();
        if self.hit_keywords {
            reasons.push("keywords");
        }
        if self.hit_entropy_len {
            reasons.push("entropy_len");
        }
        if self.hit_symbol_obf {
            reasons.push("symbol_obf");
        }
        if self.hit_iframe_script {
            reasons.push("iframe_script");
        }
        reasons
    }
}

impl std::fmt::Display for RuleHits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons = self.reasons();
        if reasons.is_empty() {
            write!(f, "none (kwSum={})", self.kw_sum)
        } else {
            write!(f, "{} (kwSum={})", reasons.join(","), self.kw_sum)
        }
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub label: WeakLabel,
    pub rule_hits: RuleHits,
}
