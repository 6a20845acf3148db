//! Inference Engine - External scorer contract and ONNX Runtime scorer
//!
//! `Scorer::predict` is synchronous; the pipeline calls it through
//! `predict_async`, which moves it onto the blocking pool and bounds it with
//! a timeout so a hung model never stalls capture.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::Array2;
use once_cell::sync::OnceCell;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::scaler::Scaler;
use crate::constants::{MODEL_FILE_NAME, SCALER_FILE_NAME};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to load scaler: {0}")]
    ScalerLoad(String),

    #[error("invalid scaler: {0}")]
    InvalidScaler(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("scorer returned a non-finite score: {0}")]
    InvalidScore(f32),

    #[error("scoring timed out after {0:?}")]
    Timeout(Duration),

    #[error("scoring task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// External scorer: 14 features in, probability-like score out
pub trait Scorer: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f32, ScoringError>;

    /// Force lazy initialization with a dummy all-zero input
    fn warm_up(&self) -> Result<f32, ScoringError> {
        self.predict(&FeatureVector::zeroed())
    }

    fn name(&self) -> &str {
        "custom"
    }

    /// Load state and latency, for scorers that track them
    fn engine_status(&self) -> Option<EngineStatus> {
        None
    }
}

impl<F> Scorer for F
where
    F: Fn(&FeatureVector) -> Result<f32, ScoringError> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<f32, ScoringError> {
        self(features)
    }
}

/// Run `predict` on the blocking pool, bounded by `timeout`.
/// Non-finite scores are rejected rather than passed on.
pub async fn predict_async(
    scorer: Arc<dyn Scorer>,
    features: FeatureVector,
    timeout: Duration,
) -> Result<f32, ScoringError> {
    let task = tokio::task::spawn_blocking(move || scorer.predict(&features));

    let score = match tokio::time::timeout(timeout, task).await {
        Err(_) => return Err(ScoringError::Timeout(timeout)),
        Ok(Err(join_err)) => return Err(ScoringError::TaskFailed(join_err.to_string())),
        Ok(Ok(result)) => result?,
    };

    if !score.is_finite() {
        return Err(ScoringError::InvalidScore(score));
    }
    Ok(score)
}

// ============================================================================
// ONNX SCORER
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub scaler_path: String,
    pub features: usize,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Engine status for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

struct LoadedModel {
    session: Mutex<Session>,
    output_name: String,
    scaler: Scaler,
    metadata: ModelMetadata,
}

/// ONNX model + scaler, loaded on first use and kept for the process
pub struct OnnxScorer {
    model_path: PathBuf,
    scaler_path: PathBuf,
    expected_sha256: Option<String>,
    loaded: OnceCell<LoadedModel>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl OnnxScorer {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
            expected_sha256: None,
            loaded: OnceCell::new(),
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// `model.onnx` and `scaler.json` inside `dir`
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(dir.join(MODEL_FILE_NAME), dir.join(SCALER_FILE_NAME))
    }

    /// Refuse to load a model whose SHA-256 differs from `hex_digest`
    pub fn with_checksum(mut self, hex_digest: impl Into<String>) -> Self {
        self.expected_sha256 = Some(hex_digest.into().to_lowercase());
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn metadata(&self) -> Option<ModelMetadata> {
        self.loaded.get().map(|m| m.metadata.clone())
    }

    fn model(&self) -> Result<&LoadedModel, ScoringError> {
        self.loaded.get_or_try_init(|| self.load())
    }

    fn load(&self) -> Result<LoadedModel, ScoringError> {
        log::info!("Loading ONNX model from: {}", self.model_path.display());

        if !self.model_path.exists() {
            return Err(ScoringError::ModelNotFound(self.model_path.clone()));
        }

        let bytes = std::fs::read(&self.model_path)
            .map_err(|e| ScoringError::ModelLoad(format!("{}: {}", self.model_path.display(), e)))?;
        let sha256 = sha256_hex(&bytes);
        if let Some(expected) = &self.expected_sha256 {
            if *expected != sha256 {
                return Err(ScoringError::ChecksumMismatch { expected: expected.clone(), actual: sha256 });
            }
        }

        let scaler = Scaler::from_path(&self.scaler_path)?;

        let session = Session::builder()
            .map_err(|e| ScoringError::ModelLoad(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ScoringError::ModelLoad(format!("Failed to set optimization: {}", e)))?
            .commit_from_memory(&bytes)
            .map_err(|e| ScoringError::ModelLoad(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ScoringError::ModelLoad("No output defined".to_string()))?;

        log::info!("ONNX model loaded successfully (sha256 {})", &sha256[..12]);

        Ok(LoadedModel {
            session: Mutex::new(session),
            output_name,
            scaler,
            metadata: ModelMetadata {
                model_path: self.model_path.display().to_string(),
                scaler_path: self.scaler_path.display().to_string(),
                features: FEATURE_COUNT,
                sha256,
                loaded_at: chrono::Utc::now(),
            },
        })
    }
}

impl Scorer for OnnxScorer {
    fn predict(&self, features: &FeatureVector) -> Result<f32, ScoringError> {
        let start_time = Instant::now();
        let model = self.model()?;

        let scaled = model.scaler.standardize(features);
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), scaled.to_vec())
            .map_err(|e| ScoringError::Inference(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ScoringError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = model.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ScoringError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&model.output_name)
            .ok_or_else(|| ScoringError::Inference("No output".to_string()))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ScoringError::Inference(format!("Extract error: {}", e)))?;
        let score = data
            .first()
            .copied()
            .ok_or_else(|| ScoringError::Inference("Empty output tensor".to_string()))?;

        self.latency_sum_us
            .fetch_add(start_time.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(score)
    }

    fn name(&self) -> &str {
        "onnx"
    }

    fn engine_status(&self) -> Option<EngineStatus> {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        Some(EngineStatus {
            model_loaded: self.is_loaded(),
            model_name: self
                .metadata()
                .map(|m| m.model_path)
                .unwrap_or_else(|| "None".to_string()),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            avg_latency_ms: avg,
            inference_count: count,
        })
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ============================================================================
// TESTS
// ============================================================================
