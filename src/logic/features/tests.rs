//! Integration tests for the combined extractor

use super::layout::*;
use super::{extract, extract_opt, FeatureVector};

fn ratios(v: &FeatureVector) -> [f64; 3] {
    RATIO_INDICES.map(|i| v.as_array()[i])
}

#[test]
fn test_empty_body() {
    let v = extract("");
    assert_eq!(v.get(IDX_LENGTH), Some(0.0));
    assert_eq!(v.get(IDX_LINE_COUNT), Some(1.0));
    assert_eq!(v.get(IDX_AVG_LINE_LENGTH), Some(0.0));
    assert_eq!(ratios(&v), [0.0; 3]);
    assert_eq!(v.get(IDX_ENTROPY), Some(0.0));
    assert!(v.validate().is_ok());
}

#[test]
fn test_missing_body_matches_empty() {
    assert_eq!(extract_opt(None), extract(""));
}

#[test]
fn test_ratios_bounded_for_varied_bodies() {
    let bodies = [
        "plain text with words and 123 numbers",
        "{\"a\":[1,2,3],\"b\":{\"c\":null}}",
        "!!!@@@###$$$%%%^^^&&&***",
        "\t\t    \t",
        "日本語のテキスト mixed with ascii",
        "var _0x3f2a=['\\x61\\x62'];(function(_0x1,_0x2){})();",
    ];

    for body in bodies {
        let v = extract(body);
        assert!(v.validate().is_ok(), "invalid vector for {body:?}");
        for r in ratios(&v) {
            assert!((0.0..=1.0).contains(&r), "ratio {r} out of range for {body:?}");
        }
        let sum: f64 = ratios(&v).iter().sum();
        assert!(sum <= 1.0 + 1e-9);
    }
}

#[test]
fn test_repeated_single_char() {
    let body = "a".repeat(5000);
    let v = extract(&body);
    assert_eq!(v.get(IDX_LENGTH), Some(5000.0));
    assert_eq!(v.get(IDX_ENTROPY), Some(0.0));
    assert_eq!(v.get(IDX_ALPHA_RATIO), Some(1.0));
    assert_eq!(v.get(IDX_SYMBOL_RATIO), Some(0.0));
}

#[test]
fn test_obfuscated_loader() {
    let body = "eval(atob('ZG9jdW1lbnQud3JpdGUoMSk='));".repeat(60);
    let v = extract(&body);
    assert_eq!(v.get(IDX_KW_EVAL), Some(60.0));
    assert_eq!(v.get(IDX_KW_ATOB), Some(60.0));
    assert!(v.get(IDX_LENGTH).unwrap() > 2000.0);
}

#[test]
fn test_deterministic() {
    let body = "<html><script>document.write('x')</script></html>";
    assert_eq!(extract(body), extract(body));
}

#[test]
fn test_non_ascii_text_reads_as_symbols() {
    // Documented boundary: non-Latin scripts are not alphabetic here
    let body = "Привет мир, это обычный текст без кода";
    let v = extract(body);
    assert_eq!(v.get(IDX_ALPHA_RATIO), Some(0.0));
    assert!(v.get(IDX_SYMBOL_RATIO).unwrap() > 0.7);
}
