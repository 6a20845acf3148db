//! Alert Relay - fire-and-forget delivery of external-score alerts
//!
//! The pipeline hands every alert to one `AlertRelay`. Delivery failures stay
//! inside the relay and never reach capture.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::logic::labeling::RuleHits;

/// Event names
pub mod events {
    pub const ML_ALERT: &str = "inspector:ml-alert";
}

/// What a page banner shows for one alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    pub score: f32,
    pub source_url: String,
    pub mime_type: String,
    pub rule_hits: RuleHits,
    pub threshold: f32,
    pub timestamp: DateTime<Utc>,
}

impl AlertPayload {
    pub fn banner_text(&self) -> String {
        let rules = self.rule_hits.reasons();
        let rules = if rules.is_empty() { "none".to_string() } else { rules.join(", ") };
        format!(
            "ML alert: score {:.3} (threshold {:.2})\nURL: {}\nMIME: {}\nRule hits: {}",
            self.score, self.threshold, self.source_url, self.mime_type, rules
        )
    }
}

pub trait AlertRelay: Send + Sync {
    fn notify(&self, payload: AlertPayload);
}

/// Writes alerts to the log at warn level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRelay;

impl AlertRelay for LogRelay {
    fn notify(&self, payload: AlertPayload) {
        log::warn!("[{}] {}", events::ML_ALERT, payload.banner_text().replace('\n', " | "));
    }
}

/// Forwards alerts to a receiver, e.g. a UI task
#[derive(Debug, Clone)]
pub struct ChannelRelay {
    tx: mpsc::UnboundedSender<AlertPayload>,
}

impl ChannelRelay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertRelay for ChannelRelay {
    fn notify(&self, payload: AlertPayload) {
        if self.tx.send(payload).is_err() {
            log::debug!("Alert receiver dropped, alert discarded");
        }
    }
}
