//! API Module
//!
//! - `har.rs`: HAR archive as a capture source
//! - `commands.rs`: replay and inspect, used by the CLI

pub mod commands;
pub mod har;

pub use commands::*;
