//! Traffic Inspector
//!
//! Samples HTTP response bodies, turns each into a 14-dimensional feature
//! vector, weakly labels it with heuristic rules and optionally asks an
//! external model for a second opinion.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::capture::{CaptureOutcome, CapturePipeline, NetworkExchange};
pub use logic::config::InspectorConfig;
