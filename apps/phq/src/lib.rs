//! # PHQ Library
//!
//! This library exposes the server modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod rephraser;
pub mod scorer;

// Re-export phq_core for convenience
pub use phq_core;
