//! Logic Module - Capture, Feature & Labeling Engines
//!
//! ## Layout
//! - `features/` - 14-dim feature extraction from a response body
//! - `labeling/` - rule-based weak labels
//! - `dedup` - seen-key set
//! - `store/` - samples, counters, export
//! - `model/` - external scorer (ONNX), threshold
//! - `capture/` - the pipeline tying them together
//! - `alert` - alert relays

pub mod config;
pub mod features;
pub mod labeling;
pub mod dedup;
pub mod store;
pub mod model;
pub mod alert;
pub mod capture;
