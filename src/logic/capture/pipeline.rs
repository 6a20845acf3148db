//! Capture Pipeline - filter, extract, dedup, classify, store, score
//!
//! Each exchange runs the full chain on its own. The only await points are the
//! body fetch and the spawned scoring task; the state lock is taken only
//! between them.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::exchange::NetworkExchange;
use super::state::CaptureState;
use super::{CaptureError, ScoreOutcome, SkipReason};
use crate::constants::{ALLOWED_MIME_TYPES, MIN_BODY_CHARS, STATUS_OK_END, STATUS_OK_START};
use crate::logic::alert::{AlertPayload, AlertRelay, LogRelay};
use crate::logic::config::InspectorConfig;
use crate::logic::dedup::DedupKey;
use crate::logic::features::{self, FeatureVector};
use crate::logic::labeling::{self, RuleHits, WeakLabel};
use crate::logic::model::{predict_async, Scorer};
use crate::logic::store::{Counters, ExportArtifact, ExportMeta, Sample, SampleId, StoreError};

/// Result of pushing one exchange through the pipeline
#[derive(Debug)]
pub enum CaptureOutcome {
    Skipped(SkipReason),
    /// A reset landed while the exchange was in flight; nothing was counted
    Dropped,
    Stored {
        sample_id: SampleId,
        label: WeakLabel,
        /// Pending external score, if one was requested
        scoring: Option<JoinHandle<ScoreOutcome>>,
    },
}

impl CaptureOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, CaptureOutcome::Stored { .. })
    }

    pub fn sample_id(&self) -> Option<SampleId> {
        match self {
            CaptureOutcome::Stored { sample_id, .. } => Some(*sample_id),
            _ => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            CaptureOutcome::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    /// Wait for the external score, if one was requested
    pub async fn scored(self) -> Option<ScoreOutcome> {
        match self {
            CaptureOutcome::Stored { scoring: Some(handle), .. } => Some(match handle.await {
                Ok(outcome) => outcome,
                Err(e) => ScoreOutcome::Failed(crate::logic::model::ScoringError::TaskFailed(e.to_string())),
            }),
            _ => None,
        }
    }
}

/// Text of the status panel
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub counters: Counters,
    pub samples: usize,
    pub last_alert: Option<String>,
    pub ml_enabled: bool,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        writeln!(f, "Total seen: {}", c.total)?;
        writeln!(f, "Kept: {} (benign: {}, suspicious: {})", c.kept, c.benign, c.suspicious)?;
        writeln!(f, "Skipped: {}", c.skipped)?;
        write!(f, "In-memory samples: {}", self.samples)?;
        if self.ml_enabled {
            if let Some(alert) = &self.last_alert {
                write!(f, "\n\nML Alert: {}", alert)?;
            }
        }
        Ok(())
    }
}

/// What the scoring task needs to know about its sample
struct PendingScore {
    sample_id: SampleId,
    features: FeatureVector,
    source_url: String,
    mime_type: String,
    rule_hits: RuleHits,
    timestamp: DateTime<Utc>,
}

pub struct CapturePipeline {
    state: Arc<Mutex<CaptureState>>,
    extractor: fn(&str) -> FeatureVector,
    config: InspectorConfig,
    scorer: Option<Arc<dyn Scorer>>,
    relay: Arc<dyn AlertRelay>,
    warned_no_scorer: AtomicBool,
}

impl CapturePipeline {
    /// Pipeline without a scorer, alerting to the log
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState::new())),
            extractor: features::extract,
            config,
            scorer: None,
            relay: Arc::new(LogRelay),
            warned_no_scorer: AtomicBool::new(false),
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_relay(mut self, relay: Arc<dyn AlertRelay>) -> Self {
        self.relay = relay;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_extractor(mut self, extractor: fn(&str) -> FeatureVector) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Run one exchange through the pipeline
    pub async fn process(&self, exchange: NetworkExchange) -> CaptureOutcome {
        let generation = self.state.lock().receive();

        let url = exchange.request_url;
        let Some(response) = exchange.response else {
            return self.skip(generation, &url, SkipReason::NoResponse);
        };

        let mime = response.mime_type;
        if !is_allowed_mime(&mime) {
            return self.skip(generation, &url, SkipReason::UnsupportedMime(mime));
        }
        if !(STATUS_OK_START..STATUS_OK_END).contains(&response.status) {
            return self.skip(generation, &url, SkipReason::BadStatus(response.status));
        }

        let fetch_timeout = self.config.fetch_timeout();
        let body = match tokio::time::timeout(fetch_timeout, response.body).await {
            Err(_) => {
                let err = CaptureError::FetchTimeout(fetch_timeout);
                log::warn!("Body fetch failed for {}: {}", url, err);
                return self.skip(generation, &url, SkipReason::FetchFailed(err));
            }
            Ok(Err(err)) => {
                log::warn!("Body fetch failed for {}: {}", url, err);
                return self.skip(generation, &url, SkipReason::FetchFailed(err));
            }
            Ok(Ok(None)) => return self.skip(generation, &url, SkipReason::EmptyBody),
            Ok(Ok(Some(body))) if body.is_empty() => {
                return self.skip(generation, &url, SkipReason::EmptyBody)
            }
            Ok(Ok(Some(body))) => body,
        };

        let chars = body.chars().take(MIN_BODY_CHARS).count();
        if chars < MIN_BODY_CHARS {
            return self.skip(generation, &url, SkipReason::TooShort(chars));
        }

        let features = (self.extractor)(&body);
        if let Err(err) = features.validate() {
            log::error!("Malformed features for {}: {} ({})", url, err, features.to_log_entry());
            return self.skip(generation, &url, SkipReason::MalformedFeatures(err));
        }

        let key = DedupKey::derive(&url, &mime, &body);
        let (sample_id, timestamp, classification) = {
            let mut state = self.state.lock();
            if !state.is_current(generation) {
                log::debug!("Dropped {}: capture state was reset", url);
                return CaptureOutcome::Dropped;
            }
            if state.dedup.check_and_remember(key) {
                state.store.note_skipped();
                log::debug!("Skipped {}: {}", url, SkipReason::Duplicate);
                return CaptureOutcome::Skipped(SkipReason::Duplicate);
            }

            let classification = labeling::classify(&features);
            let sample = Sample::new(url.as_str(), mime.as_str(), response.status, &body, features, classification);
            let timestamp = sample.timestamp;
            (state.store.add(sample), timestamp, classification)
        };

        if classification.label.is_suspicious() {
            log::warn!("[SUSPICIOUS][RULE] {} {}", url, classification.rule_hits);
        }

        let scoring = self.spawn_scoring(PendingScore {
            sample_id,
            features,
            source_url: url,
            mime_type: mime,
            rule_hits: classification.rule_hits,
            timestamp,
        });

        CaptureOutcome::Stored { sample_id, label: classification.label, scoring }
    }

    /// Process exchanges in order, then wait for every pending score
    pub async fn process_all<I>(&self, exchanges: I) -> Vec<(Option<SampleId>, Option<ScoreOutcome>)>
    where
        I: IntoIterator<Item = NetworkExchange>,
    {
        let mut outcomes = Vec::new();
        for exchange in exchanges {
            outcomes.push(self.process(exchange).await);
        }

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let id = outcome.sample_id();
            results.push((id, outcome.scored().await));
        }
        results
    }

    fn spawn_scoring(&self, pending: PendingScore) -> Option<JoinHandle<ScoreOutcome>> {
        if !self.config.ml_enabled {
            return None;
        }
        let Some(scorer) = self.scorer.clone() else {
            if !self.warned_no_scorer.swap(true, Ordering::Relaxed) {
                log::warn!("ML scoring is enabled but no scorer is configured");
            }
            return None;
        };

        let state = Arc::clone(&self.state);
        let relay = Arc::clone(&self.relay);
        let threshold = self.config.threshold_config();
        let timeout = self.config.score_timeout();
        let page_alert = self.config.page_alert_enabled;

        Some(tokio::spawn(async move {
            let PendingScore { sample_id, features, source_url: url, mime_type: mime, rule_hits, timestamp } = pending;
            let score = match predict_async(scorer, features, timeout).await {
                Ok(score) => score,
                Err(err) => {
                    log::warn!("ML predict failed for {}: {}", url, err);
                    return ScoreOutcome::Failed(err);
                }
            };

            let recorded = state
                .lock()
                .store
                .record_external_score(sample_id, score, &threshold)
                .map(|sample| sample.external_label);

            let label = match recorded {
                Ok(Some(label)) => label,
                Ok(None) => return ScoreOutcome::Discarded,
                Err(StoreError::NotFound(_)) => {
                    log::debug!("Sample {} was reset before its score arrived", sample_id);
                    return ScoreOutcome::Discarded;
                }
                Err(err) => {
                    log::warn!("Dropping score for {}: {}", url, err);
                    return ScoreOutcome::Discarded;
                }
            };

            if label.is_suspicious() {
                log::warn!("[SUSPICIOUS][ML] {} score={:.3}", url, score);
                if page_alert {
                    relay.notify(AlertPayload {
                        score,
                        source_url: url,
                        mime_type: mime,
                        rule_hits,
                        threshold: threshold.threshold,
                        timestamp,
                    });
                }
            }

            ScoreOutcome::Scored { score, label }
        }))
    }

    fn skip(&self, generation: u64, url: &str, reason: SkipReason) -> CaptureOutcome {
        let mut state = self.state.lock();
        if !state.is_current(generation) {
            log::debug!("Dropped {}: capture state was reset", url);
            return CaptureOutcome::Dropped;
        }
        state.store.note_skipped();
        log::debug!("Skipped {}: {}", url, reason);
        CaptureOutcome::Skipped(reason)
    }

    pub fn export(&self) -> ExportArtifact {
        let meta = ExportMeta::new(
            self.config.ml_enabled,
            self.config.threshold,
            self.config.page_alert_enabled,
        );
        self.state.lock().store.export(meta)
    }

    /// Clear samples, counters, last alert and the seen-set
    pub fn reset(&self) {
        self.state.lock().reset();
        log::info!("Capture state reset");
    }

    pub fn counters(&self) -> Counters {
        self.state.lock().store.counters()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.state.lock().store.samples().to_vec()
    }

    pub fn status(&self) -> StatusReport {
        let state = self.state.lock();
        StatusReport {
            counters: state.store.counters(),
            samples: state.store.len(),
            last_alert: state.store.last_alert().map(str::to_string),
            ml_enabled: self.config.ml_enabled,
        }
    }
}

fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.iter().any(|allowed| mime.contains(allowed))
}
