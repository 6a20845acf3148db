//! Keyword Features - scripting/obfuscation token counters
//!
//! Literal regex counts, case-insensitive, counting every match. Each token
//! must be followed by its delimiter so plain identifiers like `evaluate`
//! or `scripts` do not count.

use once_cell::sync::Lazy;
use regex::Regex;

use super::layout::{
    FEATURE_COUNT, IDX_KW_ATOB, IDX_KW_DOCUMENT_WRITE, IDX_KW_EVAL, IDX_KW_FROM_CHAR_CODE,
    IDX_KW_IFRAME, IDX_KW_SCRIPT, IDX_KW_UNESCAPE,
};
use super::FeatureExtractor;

/// (feature slot, pattern)
const KEYWORD_PATTERNS: [(usize, &str); 7] = [
    (IDX_KW_EVAL, r"(?i)\beval\s*\("),
    (IDX_KW_ATOB, r"(?i)\batob\s*\("),
    (IDX_KW_FROM_CHAR_CODE, r"(?i)fromcharcode\s*\("),
    (IDX_KW_UNESCAPE, r"(?i)\bunescape\s*\("),
    (IDX_KW_DOCUMENT_WRITE, r"(?i)document\.write\s*\("),
    (IDX_KW_SCRIPT, r"(?i)<\s*script\b"),
    (IDX_KW_IFRAME, r"(?i)<\s*iframe\b"),
];

static KEYWORD_REGEXES: Lazy<Vec<(usize, Regex)>> = Lazy::new(|| {
    KEYWORD_PATTERNS
        .iter()
        .map(|&(slot, pattern)| {
            (slot, Regex::new(pattern).expect("keyword pattern is a valid regex"))
        })
        .collect()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordFeatures {
    pub eval: usize,
    pub atob: usize,
    pub from_char_code: usize,
    pub unescape: usize,
    pub document_write: usize,
    pub script: usize,
    pub iframe: usize,
}

impl KeywordFeatures {
    pub fn from_body(body: &str) -> Self {
        let mut kw = Self::default();

        for (slot, re) in KEYWORD_REGEXES.iter() {
            let count = re.find_iter(body).count();
            match *slot {
                IDX_KW_EVAL => kw.eval = count,
                IDX_KW_ATOB => kw.atob = count,
                IDX_KW_FROM_CHAR_CODE => kw.from_char_code = count,
                IDX_KW_UNESCAPE => kw.unescape = count,
                IDX_KW_DOCUMENT_WRITE => kw.document_write = count,
                IDX_KW_SCRIPT => kw.script = count,
                IDX_KW_IFRAME => kw.iframe = count,
                _ => {}
            }
        }

        kw
    }
}

impl FeatureExtractor for KeywordFeatures {
    fn extract(&self, slots: &mut [f64; FEATURE_COUNT]) {
        slots[IDX_KW_EVAL] = self.eval as f64;
        slots[IDX_KW_ATOB] = self.atob as f64;
        slots[IDX_KW_FROM_CHAR_CODE] = self.from_char_code as f64;
        slots[IDX_KW_UNESCAPE] = self.unescape as f64;
        slots[IDX_KW_DOCUMENT_WRITE] = self.document_write as f64;
        slots[IDX_KW_SCRIPT] = self.script as f64;
        slots[IDX_KW_IFRAME] = self.iframe as f64;
    }
}
