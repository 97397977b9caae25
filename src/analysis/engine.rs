//! Engine entry point wiring weights construction to the global and local statistics

use crate::analysis::global::{GlobalMoranResult, compute_global};
use crate::analysis::local::{ClusterType, LocalMoranResult, compute_local};
use crate::analysis::weights::{DuplicateEdgePolicy, SpatialWeights, WeightsBuilder};
use crate::io::configuration::{NUMERICAL_FLOOR, SIGNIFICANCE_LEVEL};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::region::{FlowEdge, Observation, RegionId};
use std::collections::BTreeMap;

/// Parameters fixed when the engine is constructed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// p-value at or below which a statistic is significant
    pub significance_level: f64,
    /// Lower bound applied to variances and divisors
    pub numerical_floor: f64,
    /// How repeated edges for one pair of regions are combined
    pub duplicate_edges: DuplicateEdgePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            significance_level: SIGNIFICANCE_LEVEL,
            numerical_floor: NUMERICAL_FLOOR,
            duplicate_edges: DuplicateEdgePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Check that thresholds are usable
    ///
    /// # Errors
    ///
    /// Returns an error if the significance level is outside `(0, 1)` or the
    /// numerical floor is not a positive finite number
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(invalid_parameter(
                "significance_level",
                &self.significance_level,
                &"must lie strictly between 0 and 1",
            ));
        }
        if !(self.numerical_floor.is_finite() && self.numerical_floor > 0.0) {
            return Err(invalid_parameter(
                "numerical_floor",
                &self.numerical_floor,
                &"must be a positive finite number",
            ));
        }
        Ok(())
    }
}

/// Count of regions per cluster type
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterSummary {
    counts: BTreeMap<ClusterType, usize>,
}

impl ClusterSummary {
    /// Tally the cluster types of a set of local results
    pub fn from_local(local: &BTreeMap<RegionId, LocalMoranResult>) -> Self {
        let mut counts = BTreeMap::new();
        for result in local.values() {
            *counts.entry(result.cluster_type).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Number of regions classified as `cluster_type`
    pub fn count(&self, cluster_type: ClusterType) -> usize {
        self.counts.get(&cluster_type).copied().unwrap_or(0)
    }

    /// Regions in any significant cluster or outlier
    pub fn significant(&self) -> usize {
        self.counts
            .iter()
            .filter(|(cluster_type, _)| cluster_type.is_significant())
            .map(|(_, count)| count)
            .sum()
    }

    /// All regions counted
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Everything one analysis run produces
#[derive(Clone, Debug)]
pub struct SpatialAnalysis {
    /// Global Moran's I over all regions
    pub global: GlobalMoranResult,
    /// Local Moran's I per region
    pub local: BTreeMap<RegionId, LocalMoranResult>,
    /// Cluster counts over `local`
    pub summary: ClusterSummary,
}

/// Stateless spatial autocorrelation engine
///
/// Holds only its configuration; every call takes plain data in and returns
/// plain data out, so one engine can be shared across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoranEngine {
    config: EngineConfig,
}

impl MoranEngine {
    /// Create an engine after validating its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if [`EngineConfig::validate`] rejects the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the row-standardized weights for a set of flow edges
    pub fn build_weights(&self, edges: &[FlowEdge]) -> SpatialWeights {
        WeightsBuilder::new(self.config.duplicate_edges).build(edges)
    }

    /// Global Moran's I
    pub fn compute_global(
        &self,
        observations: &[Observation],
        weights: &SpatialWeights,
    ) -> GlobalMoranResult {
        compute_global(observations, weights, &self.config)
    }

    /// Local Moran's I keyed by region
    pub fn compute_local(
        &self,
        observations: &[Observation],
        weights: &SpatialWeights,
    ) -> BTreeMap<RegionId, LocalMoranResult> {
        compute_local(observations, weights, &self.config)
    }

    /// Global and local statistics against an already built matrix
    pub fn analyze_with_weights(
        &self,
        observations: &[Observation],
        weights: &SpatialWeights,
    ) -> SpatialAnalysis {
        let global = self.compute_global(observations, weights);
        let local = self.compute_local(observations, weights);
        let summary = ClusterSummary::from_local(&local);
        SpatialAnalysis {
            global,
            local,
            summary,
        }
    }

    /// Build the weights from `edges`, then run both statistics
    pub fn analyze(&self, observations: &[Observation], edges: &[FlowEdge]) -> SpatialAnalysis {
        let weights = self.build_weights(edges);
        self.analyze_with_weights(observations, &weights)
    }
}
