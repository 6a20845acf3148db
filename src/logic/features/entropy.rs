//! Shannon entropy over the character distribution of a body prefix

use std::collections::HashMap;

use super::layout::{FEATURE_COUNT, IDX_ENTROPY};
use super::FeatureExtractor;
use crate::constants::ENTROPY_WINDOW_CHARS;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntropyFeature {
    /// Bits per character
    pub entropy: f64,
}

impl EntropyFeature {
    /// Entropy of the first `ENTROPY_WINDOW_CHARS` characters
    pub fn from_body(body: &str) -> Self {
        Self { entropy: shannon_entropy(body.chars().take(ENTROPY_WINDOW_CHARS)) }
    }
}

impl FeatureExtractor for EntropyFeature {
    fn extract(&self, slots: &mut [f64; FEATURE_COUNT]) {
        slots[IDX_ENTROPY] = self.entropy;
    }
}

/// `H = -Σ p_c log2(p_c)` over observed character frequencies
pub fn shannon_entropy<I>(chars: I) -> f64
where
    I: IntoIterator<Item = char>,
{
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut n = 0usize;
    for c in chars {
        *freq.entry(c).or_insert(0) += 1;
        n += 1;
    }

    if n == 0 {
        return 0.0;
    }

    let len = n as f64;
    freq.values().fold(0.0, |acc, &count| {
        let p = count as f64 / len;
        acc - p * p.log2()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_empty() {
        assert_eq!(shannon_entropy("".chars()), 0.0);
    }

    #[test]
    fn test_entropy_single_symbol() {
        assert_eq!(shannon_entropy("aaaaaaaa".chars()), 0.0);
    }

    #[test]
    fn test_entropy_two_symbols() {
        let h = shannon_entropy("abababab".chars());
        assert!((h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_uniform_256() {
        let s: String = (0u32..256).filter_map(char::from_u32).collect();
        let h = shannon_entropy(s.chars());
        assert!((h - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_truncates() {
        let mut body = "a".repeat(ENTROPY_WINDOW_CHARS);
        body.push_str("bcdefghijklmnop");
        assert_eq!(EntropyFeature::from_body(&body).entropy, 0.0);
    }
}
