//! Input/output: CSV adapters, CLI, progress display, logging and errors

/// Command-line arguments and batch processing
pub mod cli;
/// Engine constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// CSV readers for observations and flow edges
pub mod input;
/// Tracing subscriber setup
pub mod logging;
/// Batch progress display
pub mod progress;
/// CSV and summary output
pub mod report;
