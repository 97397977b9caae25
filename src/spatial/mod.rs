//! Spatial inputs of the engine
//!
//! This module contains:
//! - Region identifiers, observations and flow edges
//! - Alignment of a weights matrix onto an observation set

/// Weights re-indexed by observation order
pub mod alignment;
/// Region identifiers, observations and flow edges
pub mod region;

pub use alignment::AlignedWeights;
pub use region::{FlowEdge, Observation, RegionId};
