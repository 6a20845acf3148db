//! Shape Features - length, line count, average line length

use super::layout::{FEATURE_COUNT, IDX_AVG_LINE_LENGTH, IDX_LENGTH, IDX_LINE_COUNT};
use super::FeatureExtractor;

/// Size and line structure of a body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeFeatures {
    /// Character count
    pub length: usize,
    /// Segments after splitting on `\r\n`, `\r` or `\n` (always >= 1)
    pub line_count: usize,
}

impl ShapeFeatures {
    pub fn from_body(body: &str) -> Self {
        let mut length = 0usize;
        let mut breaks = 0usize;
        let mut chars = body.chars().peekable();

        while let Some(c) = chars.next() {
            length += 1;
            match c {
                '\n' => breaks += 1,
                '\r' => {
                    breaks += 1;
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        length += 1;
                    }
                }
                _ => {}
            }
        }

        Self { length, line_count: breaks + 1 }
    }

    pub fn avg_line_length(&self) -> f64 {
        safe_div(self.length as f64, self.line_count as f64)
    }
}

impl FeatureExtractor for ShapeFeatures {
    fn extract(&self, slots: &mut [f64; FEATURE_COUNT]) {
        slots[IDX_LENGTH] = self.length as f64;
        slots[IDX_LINE_COUNT] = self.line_count as f64;
        slots[IDX_AVG_LINE_LENGTH] = self.avg_line_length();
    }
}

pub(crate) fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 { 0.0 } else { a / b }
}
