//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Default external-score alert threshold
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// External ML scoring on/off
pub const DEFAULT_ML_ENABLED: bool = true;

/// Page alert relay on/off
pub const DEFAULT_PAGE_ALERT_ENABLED: bool = true;

/// Bodies shorter than this (characters) are skipped
pub const MIN_BODY_CHARS: usize = 50;

/// Accepted HTTP status range `[start, end)`
pub const STATUS_OK_START: u16 = 200;
pub const STATUS_OK_END: u16 = 400;

/// MIME types worth analyzing (substring match)
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/json",
    "text/html",
    "application/javascript",
    "text/javascript",
];

/// Characters of the body that feed the dedup hash
pub const DEDUP_PREFIX_CHARS: usize = 2000;

/// Characters of the body that feed the entropy computation
pub const ENTROPY_WINDOW_CHARS: usize = 50_000;

/// Characters of the body kept on the sample
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Export schema version
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Default per-sample scoring timeout (milliseconds)
pub const DEFAULT_SCORE_TIMEOUT_MS: u64 = 10_000;

/// Default body fetch timeout (milliseconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Model artifacts inside the model directory
pub const MODEL_FILE_NAME: &str = "model.onnx";
pub const SCALER_FILE_NAME: &str = "scaler.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "traffic-inspector";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Alert threshold from `INSPECTOR_THRESHOLD`
pub fn get_threshold() -> f32 {
    std::env::var("INSPECTOR_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_THRESHOLD)
}

/// ML scoring switch from `INSPECTOR_ML_ENABLED`
pub fn is_ml_enabled() -> bool {
    env_flag("INSPECTOR_ML_ENABLED", DEFAULT_ML_ENABLED)
}

/// Page alert switch from `INSPECTOR_PAGE_ALERT`
pub fn is_page_alert_enabled() -> bool {
    env_flag("INSPECTOR_PAGE_ALERT", DEFAULT_PAGE_ALERT_ENABLED)
}

/// Scoring timeout from `INSPECTOR_SCORE_TIMEOUT_MS`
pub fn get_score_timeout() -> Duration {
    Duration::from_millis(env_u64("INSPECTOR_SCORE_TIMEOUT_MS", DEFAULT_SCORE_TIMEOUT_MS))
}

/// Body fetch timeout from `INSPECTOR_FETCH_TIMEOUT_MS`
pub fn get_fetch_timeout() -> Duration {
    Duration::from_millis(env_u64("INSPECTOR_FETCH_TIMEOUT_MS", DEFAULT_FETCH_TIMEOUT_MS))
}

/// Model directory from `INSPECTOR_MODEL_DIR`, if set
pub fn get_model_dir() -> Option<PathBuf> {
    std::env::var("INSPECTOR_MODEL_DIR").ok().map(PathBuf::from)
}

/// Export directory from `INSPECTOR_EXPORT_DIR`, else the user's download dir
pub fn get_export_dir() -> PathBuf {
    std::env::var("INSPECTOR_EXPORT_DIR")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
