//! Capture Module - Turns observed network exchanges into labeled samples
//!
//! ## Flow
//! ```text
//! exchange -> filter (mime, status) -> fetch body -> length check
//!          -> extract -> dedup -> classify -> store -> [score -> alert]
//! ```
//!
//! Every skip is counted and never affects other exchanges.

pub mod exchange;
pub mod state;
pub mod pipeline;


use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub use exchange::{BodyFetch, CapturedResponse, NetworkExchange};
pub use pipeline::{CaptureOutcome, CapturePipeline, StatusReport};
pub use state::CaptureState;

use crate::logic::features::FeatureError;
use crate::logic::labeling::WeakLabel;
use crate::logic::model::ScoringError;

/// Body retrieval failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("body unavailable: {0}")]
    BodyUnavailable(String),

    #[error("body fetch timed out after {0:?}")]
    FetchTimeout(Duration),
}

/// Why an exchange produced no sample
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoResponse,
    UnsupportedMime(String),
    BadStatus(u16),
    FetchFailed(CaptureError),
    EmptyBody,
    TooShort(usize),
    MalformedFeatures(FeatureError),
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoResponse => write!(f, "no response"),
            SkipReason::UnsupportedMime(mime) => write!(f, "unsupported mime type '{}'", mime),
            SkipReason::BadStatus(status) => write!(f, "status {}", status),
            SkipReason::FetchFailed(err) => write!(f, "{}", err),
            SkipReason::EmptyBody => write!(f, "empty body"),
            SkipReason::TooShort(len) => write!(f, "body too short ({} chars)", len),
            SkipReason::MalformedFeatures(err) => write!(f, "malformed features: {}", err),
            SkipReason::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// How the external score of a stored sample ended
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Scored { score: f32, label: WeakLabel },
    /// Sample keeps null external fields
    Failed(ScoringError),
    /// Sample no longer in the store (reset while scoring)
    Discarded,
}
