//! Mathematical utilities for the statistics engine

/// Mean, deviations and central moments of a value vector
pub mod moments;
/// Normal distribution and significance testing
pub mod probability;
