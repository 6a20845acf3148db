use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::BODY_PREVIEW_CHARS;
use crate::logic::features::FeatureVector;
use crate::logic::labeling::{Classification, RuleHits, WeakLabel};

/// Stable identity of a stored sample
pub type SampleId = Uuid;

/// One kept response: features, weak label, optional external opinion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: SampleId,
    pub timestamp: DateTime<Utc>,
    pub source_url: String,
    pub mime_type: String,
    pub status_code: u16,
    pub features: FeatureVector,
    pub label: WeakLabel,
    pub rule_hits: RuleHits,
    pub body_preview: String,
    pub external_score: Option<f32>,
    pub external_label: Option<WeakLabel>,
}

impl Sample {
    pub fn new(
        source_url: impl Into<String>,
        mime_type: impl Into<String>,
        status_code: u16,
        body: &str,
        features: FeatureVector,
        classification: Classification,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source_url: source_url.into(),
            mime_type: mime_type.into(),
            status_code,
            features,
            label: classification.label,
            rule_hits: classification.rule_hits,
            body_preview: body.chars().take(BODY_PREVIEW_CHARS).collect(),
            external_score: None,
            external_label: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.external_score.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{features, labeling};

    #[test]
    fn test_preview_is_char_bounded() {
        let body = "é".repeat(500);
        let fv = features::extract(&body);
        let sample = Sample::new("u", "text/html", 200, &body, fv, labeling::classify(&fv));

        assert_eq!(sample.body_preview.chars().count(), BODY_PREVIEW_CHARS);
        assert!(!sample.is_scored());
    }

    #[test]
    fn test_json_field_names() {
        let body = "x".repeat(60);
        let fv = features::extract(&body);
        let sample = Sample::new("https://a/", "text/html", 200, &body, fv, labeling::classify(&fv));
        let json = serde_json::to_value(&sample).unwrap();

        for key in ["id", "timestamp", "sourceUrl", "mimeType", "statusCode", "features", "label",
                    "ruleHits", "bodyPreview", "externalScore", "externalLabel"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["externalScore"].is_null());
        assert_eq!(json["features"].as_array().unwrap().len(), 14);
        assert_eq!(json["label"], 0);
    }
}
