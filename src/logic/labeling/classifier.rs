//! Weak Label Classifier
//!
//! Input: FeatureVector. Output: Classification (label + rule hits).
//! Pure and total; four independent rules OR-ed together.

use super::rules::RuleThresholds;
use super::types::{Classification, RuleHits, WeakLabel};
use crate::logic::features::layout::{
    IDX_ALPHA_RATIO, IDX_ENTROPY, IDX_KW_ATOB, IDX_KW_DOCUMENT_WRITE, IDX_KW_EVAL,
    IDX_KW_FROM_CHAR_CODE, IDX_KW_IFRAME, IDX_KW_SCRIPT, IDX_KW_UNESCAPE, IDX_LENGTH,
    IDX_SYMBOL_RATIO,
};
use crate::logic::features::FeatureVector;

/// Classify with the `weak_label_rules_v1` thresholds
pub fn classify(features: &FeatureVector) -> Classification {
    classify_with_thresholds(features, &RuleThresholds::default())
}

pub fn classify_with_thresholds(features: &FeatureVector, t: &RuleThresholds) -> Classification {
    let rule_hits = evaluate_rules(features, t);
    Classification {
        label: WeakLabel::from_flag(rule_hits.any()),
        rule_hits,
    }
}

fn evaluate_rules(features: &FeatureVector, t: &RuleThresholds) -> RuleHits {
    let f = features.as_array();

    let length = f[IDX_LENGTH];
    let alpha_ratio = f[IDX_ALPHA_RATIO];
    let symbol_ratio = f[IDX_SYMBOL_RATIO];
    let entropy = f[IDX_ENTROPY];

    let kw_sum: f64 = [IDX_KW_EVAL, IDX_KW_ATOB, IDX_KW_FROM_CHAR_CODE, IDX_KW_UNESCAPE, IDX_KW_DOCUMENT_WRITE]
        .iter()
        .map(|&i| f[i])
        .sum();
    let kw_sum = kw_sum.max(0.0) as u32;

    RuleHits {
        hit_keywords: kw_sum >= t.keyword_sum_min,
        hit_entropy_len: entropy >= t.entropy_min && length >= t.entropy_length_min,
        hit_symbol_obf: symbol_ratio >= t.symbol_ratio_min
            && alpha_ratio <= t.alpha_ratio_max
            && length >= t.symbol_length_min,
        hit_iframe_script: f[IDX_KW_IFRAME] >= t.tag_count_min && f[IDX_KW_SCRIPT] >= t.tag_count_min,
        kw_sum,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{extract, FEATURE_COUNT};

    fn vector_with(pairs: &[(usize, f64)]) -> FeatureVector {
        let mut raw = [0.0; FEATURE_COUNT];
        for &(i, v) in pairs {
            raw[i] = v;
        }
        FeatureVector::from_values(raw)
    }

    #[test]
    fn test_zero_vector_is_benign() {
        let c = classify(&FeatureVector::zeroed());
        assert_eq!(c.label, WeakLabel::Benign);
        assert_eq!(c.rule_hits, RuleHits::default());
    }

    #[test]
    fn test_single_keyword_fires() {
        let c = classify(&vector_with(&[(IDX_KW_UNESCAPE, 1.0)]));
        assert!(c.rule_hits.hit_keywords);
        assert_eq!(c.rule_hits.kw_sum, 1);
        assert_eq!(c.label, WeakLabel::Suspicious);
    }

    #[test]
    fn test_tags_do_not_count_towards_kw_sum() {
        let c = classify(&vector_with(&[(IDX_KW_SCRIPT, 4.0)]));
        assert_eq!(c.rule_hits.kw_sum, 0);
        assert_eq!(c.label, WeakLabel::Benign);
    }

    #[test]
    fn test_entropy_rule_boundaries() {
        let at = classify(&vector_with(&[(IDX_ENTROPY, 6.5), (IDX_LENGTH, 5000.0)]));
        assert!(at.rule_hits.hit_entropy_len);

        let short = classify(&vector_with(&[(IDX_ENTROPY, 7.9), (IDX_LENGTH, 4999.0)]));
        assert!(!short.rule_hits.hit_entropy_len);

        let low = classify(&vector_with(&[(IDX_ENTROPY, 6.49), (IDX_LENGTH, 90000.0)]));
        assert!(!low.rule_hits.hit_entropy_len);
    }

    #[test]
    fn test_symbol_rule_boundaries() {
        let base = [(IDX_SYMBOL_RATIO, 0.28), (IDX_ALPHA_RATIO, 0.55), (IDX_LENGTH, 2000.0)];
        assert!(classify(&vector_with(&base)).rule_hits.hit_symbol_obf);

        let wordy = [(IDX_SYMBOL_RATIO, 0.40), (IDX_ALPHA_RATIO, 0.56), (IDX_LENGTH, 9000.0)];
        assert!(!classify(&vector_with(&wordy)).rule_hits.hit_symbol_obf);

        let small = [(IDX_SYMBOL_RATIO, 0.9), (IDX_ALPHA_RATIO, 0.0), (IDX_LENGTH, 1999.0)];
        assert!(!classify(&vector_with(&small)).rule_hits.hit_symbol_obf);
    }

    #[test]
    fn test_deterministic() {
        let v = extract("<iframe src=x></iframe><script>eval(1)</script>");
        assert_eq!(classify(&v), classify(&v));
    }

    #[test]
    fn test_scenario_repeated_char_is_benign() {
        let c = classify(&extract(&"a".repeat(5000)));
        assert!(!c.rule_hits.hit_entropy_len);
        assert!(!c.rule_hits.hit_symbol_obf);
        assert_eq!(c.label, WeakLabel::Benign);
    }

    #[test]
    fn test_scenario_eval_atob_is_suspicious() {
        let body = "eval(atob('...'));".repeat(150);
        let v = extract(&body);
        assert!(v.get(IDX_KW_EVAL).unwrap() >= 1.0);
        assert!(v.get(IDX_KW_ATOB).unwrap() >= 1.0);

        let c = classify(&v);
        assert!(c.rule_hits.hit_keywords);
        assert_eq!(c.label, WeakLabel::Suspicious);
    }

    #[test]
    fn test_scenario_iframe_script_is_suspicious() {
        let c = classify(&extract("<iframe src=x></iframe><script>1</script>"));
        assert!(c.rule_hits.hit_iframe_script);
        assert!(!c.rule_hits.hit_keywords);
        assert_eq!(c.label, WeakLabel::Suspicious);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = RuleThresholds { keyword_sum_min: 3, ..Default::default() };
        let v = vector_with(&[(IDX_KW_EVAL, 2.0)]);
        assert_eq!(classify_with_thresholds(&v, &strict).label, WeakLabel::Benign);
        assert_eq!(classify(&v).label, WeakLabel::Suspicious);
    }
}
