//! Spatial autocorrelation analysis

/// Engine configuration and the combined analysis entry point
pub mod engine;
/// Global Moran's I
pub mod global;
/// Local Moran's I and LISA cluster classification
pub mod local;
/// Spatial weights built from flow edges
pub mod weights;

pub use engine::{ClusterSummary, EngineConfig, MoranEngine, SpatialAnalysis};
pub use global::{GlobalMoranResult, compute_global};
pub use local::{ClusterType, LocalMoranResult, compute_local};
pub use weights::{DuplicateEdgePolicy, SpatialWeights, WeightsBuilder, build_weights_matrix};
