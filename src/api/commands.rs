//! Command implementations behind the CLI
//!
//! - `replay_har`: push a HAR capture through the pipeline and export
//! - `inspect_body` / `inspect_file`: features and weak label of one body

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use super::har::{HarArchive, HarError};
use crate::logic::alert::{AlertRelay, LogRelay};
use crate::logic::capture::{CapturePipeline, ScoreOutcome, StatusReport};
use crate::logic::config::{ConfigError, InspectorConfig};
use crate::logic::features::{self, FeatureVector, LayoutInfo};
use crate::logic::labeling::{self, Classification};
use crate::logic::model::{EngineStatus, OnnxScorer, Scorer, ScoringError};
use crate::logic::store::Counters;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Har(#[from] HarError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// SCORER SETUP
// ============================================================================

/// ONNX scorer for the configured model directory, if scoring is on
pub fn build_scorer(config: &InspectorConfig, checksum: Option<&str>) -> Option<Arc<dyn Scorer>> {
    if !config.ml_enabled {
        return None;
    }
    let Some(dir) = config.model_dir.as_deref() else {
        log::warn!("ML scoring enabled but no model directory configured (INSPECTOR_MODEL_DIR)");
        return None;
    };

    let mut scorer = OnnxScorer::from_dir(dir);
    if let Some(digest) = checksum {
        scorer = scorer.with_checksum(digest);
    }
    Some(Arc::new(scorer))
}

/// Load the model ahead of the first real request
pub async fn warm_up(scorer: Arc<dyn Scorer>, timeout: Duration) -> Result<f32, ScoringError> {
    let task = tokio::task::spawn_blocking(move || scorer.warm_up());
    match tokio::time::timeout(timeout, task).await {
        Err(_) => Err(ScoringError::Timeout(timeout)),
        Ok(Err(e)) => Err(ScoringError::TaskFailed(e.to_string())),
        Ok(Ok(result)) => result,
    }
}

// ============================================================================
// REPLAY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub har_path: PathBuf,
    /// Write the export artifact here
    pub out_dir: Option<PathBuf>,
    /// Expected SHA-256 of `model.onnx`
    pub model_checksum: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub entries: usize,
    pub status: StatusReport,
    pub scored: usize,
    pub alerts: usize,
    /// Scorer load state and latency after the run
    pub engine: Option<EngineStatus>,
    pub export_path: Option<PathBuf>,
}

impl ReplaySummary {
    pub fn counters(&self) -> Counters {
        self.status.counters
    }
}

pub async fn replay_har(config: InspectorConfig, options: ReplayOptions) -> Result<ReplaySummary, CommandError> {
    let scorer = build_scorer(&config, options.model_checksum.as_deref());
    replay_har_with(config, options, scorer, Arc::new(LogRelay)).await
}

/// `replay_har` with an explicit scorer and relay
pub async fn replay_har_with(
    config: InspectorConfig,
    options: ReplayOptions,
    scorer: Option<Arc<dyn Scorer>>,
    relay: Arc<dyn AlertRelay>,
) -> Result<ReplaySummary, CommandError> {
    config.validate()?;
    let archive = HarArchive::from_path(&options.har_path)?;
    let entries = archive.len();

    let engine_source = scorer.clone();
    let mut pipeline = CapturePipeline::new(config).with_relay(relay);
    if let Some(scorer) = scorer {
        match warm_up(Arc::clone(&scorer), pipeline.config().score_timeout()).await {
            Ok(_) => log::info!("Scorer '{}' warm-up ok", scorer.name()),
            Err(e) => log::warn!("Scorer '{}' warm-up failed: {}", scorer.name(), e),
        }
        pipeline = pipeline.with_scorer(scorer);
    }

    let results = pipeline.process_all(archive.into_exchanges()).await;

    let mut scored = 0;
    let mut alerts = 0;
    for (_, outcome) in &results {
        if let Some(ScoreOutcome::Scored { label, .. }) = outcome {
            scored += 1;
            if label.is_suspicious() {
                alerts += 1;
            }
        }
    }

    let export_path = match &options.out_dir {
        Some(dir) => Some(pipeline.export().write_to_dir(dir)?),
        None => None,
    };

    Ok(ReplaySummary {
        entries,
        status: pipeline.status(),
        scored,
        alerts,
        engine: engine_source.and_then(|s| s.engine_status()),
        export_path,
    })
}

// ============================================================================
// INSPECT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub source: String,
    pub layout: LayoutInfo,
    pub features: FeatureVector,
    #[serde(flatten)]
    pub classification: Classification,
}

pub fn inspect_body(source: &str, body: &str) -> InspectReport {
    let features = features::extract(body);
    InspectReport {
        source: source.to_string(),
        layout: LayoutInfo::current(),
        features,
        classification: labeling::classify(&features),
    }
}

pub fn inspect_file(path: &Path) -> Result<InspectReport, CommandError> {
    let bytes = std::fs::read(path)?;
    let body = String::from_utf8_lossy(&bytes);
    Ok(inspect_body(&path.display().to_string(), &body))
}
