//! Spatial weights construction from observed market flows
//!
//! Flow edges are symmetrized, scaled by the largest observed flow and then
//! row-standardized so each connected region distributes a total weight of one
//! across its neighbours.

use crate::spatial::region::{FlowEdge, RegionId};
use ndarray::{Array2, ArrayView1, Axis};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// How repeated edges between the same pair of regions are combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateEdgePolicy {
    /// The last edge naming an unordered pair replaces earlier ones
    #[default]
    LastWins,
    /// Flows naming the same unordered pair are added together
    Sum,
}

/// Symmetric, row-standardized spatial weights between regions
///
/// Rows and columns follow the order in which regions first appear in the
/// edge list. The diagonal is always zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpatialWeights {
    regions: Vec<RegionId>,
    index: HashMap<RegionId, usize>,
    raw: Array2<f64>,
    standardized: Array2<f64>,
}

impl SpatialWeights {
    /// Matrix with no regions
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of regions referenced by the edge list
    pub const fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when no edge was supplied
    pub const fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in matrix order
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    /// Matrix position of a region
    pub fn index_of(&self, region: &str) -> Option<usize> {
        self.index.get(region).copied()
    }

    /// Whether the region appears in any edge
    pub fn contains(&self, region: &str) -> bool {
        self.index.contains_key(region)
    }

    /// Row-standardized weight from `from` to `to`, zero when not connected
    pub fn weight(&self, from: &str, to: &str) -> f64 {
        match (self.index_of(from), self.index_of(to)) {
            (Some(i), Some(j)) => self.standardized.get([i, j]).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Neighbours of a region with their positive standardized weights
    pub fn neighbors(&self, region: &str) -> Vec<(&RegionId, f64)> {
        self.row(region)
            .map(|row| {
                self.regions
                    .iter()
                    .zip(row.iter())
                    .filter(|&(_, &w)| w > 0.0)
                    .map(|(neighbor, &w)| (neighbor, w))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sum of a region's standardized weights: one when connected, zero otherwise
    pub fn row_sum(&self, region: &str) -> f64 {
        self.row(region).map_or(0.0, |row| row.sum())
    }

    /// A region with no positive-weight neighbour, or one absent from the matrix
    pub fn is_isolated(&self, region: &str) -> bool {
        self.row(region)
            .is_none_or(|row| !row.iter().any(|&w| w > 0.0))
    }

    /// Dense row-standardized matrix in region order
    pub const fn standardized(&self) -> &Array2<f64> {
        &self.standardized
    }

    /// Dense symmetric matrix before row-standardization
    pub const fn raw(&self) -> &Array2<f64> {
        &self.raw
    }

    fn row(&self, region: &str) -> Option<ArrayView1<'_, f64>> {
        self.index_of(region)
            .map(|i| self.standardized.index_axis(Axis(0), i))
    }
}

/// Builds [`SpatialWeights`] from flow edges
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightsBuilder {
    duplicate_edges: DuplicateEdgePolicy,
}

impl WeightsBuilder {
    /// Create a builder with the given duplicate-edge policy
    pub const fn new(duplicate_edges: DuplicateEdgePolicy) -> Self {
        Self { duplicate_edges }
    }

    /// Duplicate-edge policy in use
    pub const fn duplicate_edges(&self) -> DuplicateEdgePolicy {
        self.duplicate_edges
    }

    /// Build the symmetric row-standardized weights for a set of flow edges
    ///
    /// Never fails: an empty edge list yields an empty matrix and a zero
    /// maximum flow yields a matrix in which every region is isolated. Pairs
    /// whose combined flow is not finite set no weight in either direction.
    pub fn build(&self, edges: &[FlowEdge]) -> SpatialWeights {
        if edges.is_empty() {
            return SpatialWeights::empty();
        }

        let mut regions = Vec::new();
        let mut index = HashMap::new();
        for edge in edges {
            for region in [&edge.source, &edge.target] {
                if let Entry::Vacant(slot) = index.entry(region.clone()) {
                    slot.insert(regions.len());
                    regions.push(region.clone());
                }
            }
        }

        // Unordered pairs keyed (low, high) so A->B and B->A collapse together
        let mut pair_flows: Vec<((usize, usize), f64)> = Vec::new();
        let mut pair_slots: HashMap<(usize, usize), usize> = HashMap::new();
        let mut self_loops = 0_usize;
        for edge in edges {
            if edge.is_self_loop() {
                self_loops += 1;
                continue;
            }
            let (Some(&a), Some(&b)) = (index.get(&edge.source), index.get(&edge.target)) else {
                continue;
            };
            let key = (a.min(b), a.max(b));
            match pair_slots.entry(key) {
                Entry::Occupied(slot) => {
                    if let Some((_, flow)) = pair_flows.get_mut(*slot.get()) {
                        match self.duplicate_edges {
                            DuplicateEdgePolicy::LastWins => *flow = edge.average_flow,
                            DuplicateEdgePolicy::Sum => *flow += edge.average_flow,
                        }
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(pair_flows.len());
                    pair_flows.push((key, edge.average_flow));
                }
            }
        }

        let non_finite = pair_flows
            .iter()
            .filter(|&&(_, flow)| !flow.is_finite())
            .count();
        if non_finite > 0 {
            debug!(pairs = non_finite, "skipping region pairs with non-finite flow");
        }

        let max_flow = match self.duplicate_edges {
            DuplicateEdgePolicy::LastWins => edges
                .iter()
                .map(|edge| edge.average_flow)
                .filter(|flow| flow.is_finite())
                .fold(f64::NEG_INFINITY, f64::max),
            DuplicateEdgePolicy::Sum => pair_flows
                .iter()
                .map(|&(_, flow)| flow)
                .filter(|flow| flow.is_finite())
                .fold(f64::NEG_INFINITY, f64::max),
        };

        let n = regions.len();
        let mut raw = Array2::<f64>::zeros((n, n));
        if max_flow.is_finite() && max_flow > 0.0 {
            for &((a, b), flow) in pair_flows.iter().filter(|(_, flow)| flow.is_finite()) {
                let scaled = flow / max_flow;
                if let Some(w) = raw.get_mut([a, b]) {
                    *w = scaled;
                }
                if let Some(w) = raw.get_mut([b, a]) {
                    *w = scaled;
                }
            }
        }

        let standardized = row_standardize(&raw);

        debug!(
            regions = n,
            edges = edges.len(),
            pairs = pair_flows.len(),
            self_loops,
            max_flow,
            "built spatial weights"
        );

        SpatialWeights {
            regions,
            index,
            raw,
            standardized,
        }
    }
}

/// Build weights with the default last-write-wins duplicate policy
pub fn build_weights_matrix(edges: &[FlowEdge]) -> SpatialWeights {
    WeightsBuilder::default().build(edges)
}

/// Divide each row by its sum; rows without positive mass become all zero
fn row_standardize(raw: &Array2<f64>) -> Array2<f64> {
    let mut standardized = raw.clone();
    for mut row in standardized.axis_iter_mut(Axis(0)) {
        let row_sum = row.sum();
        if row_sum > 0.0 {
            row.mapv_inplace(|w| w / row_sum);
        } else {
            row.fill(0.0);
        }
    }
    standardized
}
