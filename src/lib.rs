//! Spatial autocorrelation engine for regional market data
//!
//! Builds a symmetric, row-standardized spatial weights matrix from observed
//! trade flows between regions, then measures how strongly similar values
//! cluster: global Moran's I over all regions and local Moran's I (LISA) per
//! region, each with an analytic z-score, a two-tailed p-value and, locally,
//! a High-High / Low-Low / High-Low / Low-High cluster label.

#![forbid(unsafe_code)]

/// Weights construction, global and local Moran's I, and the engine entry point
pub mod analysis;
/// Input/output adapters, configuration and error handling
pub mod io;
/// Central moments and normal-approximation significance testing
pub mod math;
/// Region identifiers, observations, flow edges and weight alignment
pub mod spatial;

pub use analysis::{
    ClusterSummary, ClusterType, DuplicateEdgePolicy, EngineConfig, GlobalMoranResult,
    LocalMoranResult, MoranEngine, SpatialAnalysis, SpatialWeights, WeightsBuilder,
};
pub use io::error::{AnalysisError, Result};
pub use spatial::{FlowEdge, Observation, RegionId};
