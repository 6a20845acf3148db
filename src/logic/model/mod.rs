//! Model Module - External Scoring
//!
//! Keeps the scorer contract apart from capture, so any model (ONNX, a
//! remote service, a closure in tests) can sit behind it.

pub mod inference;
pub mod scaler;
pub mod threshold;

// Re-export common types
pub use inference::{predict_async, EngineStatus, ModelMetadata, OnnxScorer, Scorer, ScoringError};
pub use scaler::Scaler;
pub use threshold::ThresholdConfig;
