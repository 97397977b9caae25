//! Region identifiers and the two engine inputs: observations and flow edges

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque region identifier, unique within one analysis run
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Wrap a region name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for RegionId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One value per region for a single commodity and time slice
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Region the value was observed in
    pub region: RegionId,
    /// Observed value (price, conflict intensity, ...)
    pub value: f64,
}

impl Observation {
    /// Create an observation
    pub fn new(region: impl Into<RegionId>, value: f64) -> Self {
        Self {
            region: region.into(),
            value,
        }
    }
}

/// Observed trade flow between two regions
///
/// Direction is recorded but discarded when the weights matrix is built.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
    /// Origin region
    pub source: RegionId,
    /// Destination region
    pub target: RegionId,
    /// Average flow magnitude over the analysis period, expected `>= 0`
    pub average_flow: f64,
}

impl FlowEdge {
    /// Create a flow edge
    pub fn new(source: impl Into<RegionId>, target: impl Into<RegionId>, average_flow: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            average_flow,
        }
    }

    /// Whether the edge starts and ends in the same region
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
