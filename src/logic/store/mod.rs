//! Store Module - In-memory sample collection
//!
//! Samples in capture order plus the session counters. Samples are addressed
//! by id so late external scores land on the right record even after other
//! samples were added.

pub mod sample;
pub mod export;


use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use export::{ExportArtifact, ExportMeta, MlMeta, PageAlertMeta};
pub use sample::{Sample, SampleId};

use crate::logic::labeling::WeakLabel;
use crate::logic::model::ThresholdConfig;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("sample {0} not found")]
    NotFound(SampleId),

    #[error("sample {0} already has an external score")]
    AlreadyScored(SampleId),
}

/// Session counters. `kept = suspicious + benign`, and
/// `total = kept + skipped` once no exchange is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total: u64,
    pub kept: u64,
    pub suspicious: u64,
    pub benign: u64,
    pub skipped: u64,
}

#[derive(Debug, Default)]
pub struct SampleStore {
    samples: Vec<Sample>,
    counters: Counters,
    last_alert: Option<String>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_received(&mut self) {
        self.counters.total += 1;
    }

    pub fn note_skipped(&mut self) {
        self.counters.skipped += 1;
    }

    /// Append a sample and count it under its rule label
    pub fn add(&mut self, sample: Sample) -> SampleId {
        self.counters.kept += 1;
        match sample.label {
            WeakLabel::Suspicious => self.counters.suspicious += 1,
            WeakLabel::Benign => self.counters.benign += 1,
        }
        let id = sample.id;
        self.samples.push(sample);
        id
    }

    pub fn get(&self, id: SampleId) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Set the external score and label of a sample. Each sample is scored
    /// at most once. A suspicious external label becomes the last alert.
    pub fn record_external_score(
        &mut self,
        id: SampleId,
        score: f32,
        threshold: &ThresholdConfig,
    ) -> Result<&Sample, StoreError> {
        let sample = self
            .samples
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if sample.is_scored() {
            return Err(StoreError::AlreadyScored(id));
        }

        let label = threshold.label_for(score);
        sample.external_score = Some(score);
        sample.external_label = Some(label);

        if label.is_suspicious() {
            self.last_alert = Some(format!("{:.3} | {}", score, sample.source_url));
        }
        Ok(sample)
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `"{score:.3} | {url}"` of the most recent external alert
    pub fn last_alert(&self) -> Option<&str> {
        self.last_alert.as_deref()
    }

    pub fn export(&self, meta: ExportMeta) -> ExportArtifact {
        ExportArtifact {
            meta,
            stats: self.counters,
            data: self.samples.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.counters = Counters::default();
        self.last_alert = None;
    }
}
