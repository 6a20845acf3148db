//! Character Class Features - digit/alpha/symbol ratios
//!
//! Classification is ASCII-only. Anything that is not an ASCII digit, ASCII
//! letter, space or tab lands in the symbol bucket, including non-Latin
//! letters.

use super::layout::{FEATURE_COUNT, IDX_ALPHA_RATIO, IDX_DIGIT_RATIO, IDX_SYMBOL_RATIO};
use super::shape::safe_div;
use super::FeatureExtractor;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharClassFeatures {
    pub length: usize,
    pub digits: usize,
    pub alphas: usize,
    pub whitespace: usize,
}

impl CharClassFeatures {
    pub fn from_body(body: &str) -> Self {
        let mut counts = Self::default();

        for c in body.chars() {
            counts.length += 1;
            if c.is_ascii_digit() {
                counts.digits += 1;
            } else if c.is_ascii_alphabetic() {
                counts.alphas += 1;
            } else if c == ' ' || c == '\t' {
                counts.whitespace += 1;
            }
        }

        counts
    }

    pub fn symbols(&self) -> usize {
        self.length.saturating_sub(self.digits + self.alphas + self.whitespace)
    }

    pub fn digit_ratio(&self) -> f64 {
        safe_div(self.digits as f64, self.length as f64)
    }

    pub fn alpha_ratio(&self) -> f64 {
        safe_div(self.alphas as f64, self.length as f64)
    }

    pub fn symbol_ratio(&self) -> f64 {
        safe_div(self.symbols() as f64, self.length as f64)
    }
}

impl FeatureExtractor for CharClassFeatures {
    fn extract(&self, slots: &mut [f64; FEATURE_COUNT]) {
        slots[IDX_DIGIT_RATIO] = self.digit_ratio();
        slots[IDX_ALPHA_RATIO] = self.alpha_ratio();
        slots[IDX_SYMBOL_RATIO] = self.symbol_ratio();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let c = CharClassFeatures::from_body("ab 12\t;;");
        assert_eq!(c.length, 8);
        assert_eq!(c.alphas, 2);
        assert_eq!(c.digits, 2);
        assert_eq!(c.whitespace, 2);
        assert_eq!(c.symbols(), 2);
        assert_eq!(c.symbol_ratio(), 0.25);
    }

    #[test]
    fn test_empty_ratios_are_zero() {
        let c = CharClassFeatures::from_body("");
        assert_eq!(c.digit_ratio(), 0.0);
        assert_eq!(c.alpha_ratio(), 0.0);
        assert_eq!(c.symbol_ratio(), 0.0);
    }

    #[test]
    fn test_newlines_count_as_symbols() {
        let c = CharClassFeatures::from_body("a\nb");
        assert_eq!(c.symbols(), 1);
    }

    #[test]
    fn test_non_ascii_letters_are_symbols() {
        // Known boundary: Cyrillic text reads as fully symbolic
        let c = CharClassFeatures::from_body("привет");
        assert_eq!(c.alphas, 0);
        assert_eq!(c.symbol_ratio(), 1.0);
    }
}
