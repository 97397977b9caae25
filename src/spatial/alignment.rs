//! Projection of a weights matrix onto the regions of one observation set

use crate::analysis::weights::SpatialWeights;
use crate::spatial::region::Observation;
use ndarray::{Array1, Array2, Axis};
use tracing::warn;

/// Weights indexed by matched observation rather than by matrix region
///
/// Only observations whose region appears in the weights take part. Entry
/// `[i, j]` is the standardized weight from the `i`-th matched observation
/// to the `j`-th; [`AlignedWeights::matched`] maps those positions back to
/// the observation slice.
#[derive(Clone, Debug)]
pub struct AlignedWeights {
    matrix: Array2<f64>,
    matched: Vec<usize>,
    unmatched: usize,
}

impl AlignedWeights {
    /// Align `weights` to the order of `observations`, skipping regions the
    /// weights do not know
    pub fn new(observations: &[Observation], weights: &SpatialWeights) -> Self {
        let mut matched = Vec::with_capacity(observations.len());
        let mut positions = Vec::with_capacity(observations.len());
        for (index, obs) in observations.iter().enumerate() {
            if let Some(position) = weights.index_of(obs.region.as_str()) {
                matched.push(index);
                positions.push(position);
            }
        }

        let unmatched = observations.len() - matched.len();
        if unmatched > 0 {
            warn!(
                unmatched,
                observations = observations.len(),
                "observations without flow edges are left out of the statistics"
            );
        }

        let source = weights.standardized();
        let m = positions.len();
        let mut matrix = Array2::<f64>::zeros((m, m));
        for (i, &a) in positions.iter().enumerate() {
            for (j, &b) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let w = source.get([a, b]).copied().unwrap_or(0.0);
                if let Some(cell) = matrix.get_mut([i, j]) {
                    *cell = w;
                }
            }
        }

        Self {
            matrix,
            matched,
            unmatched,
        }
    }

    /// Dense matched-by-matched weights
    pub const fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Indices into the aligned observation slice, in matrix order
    pub const fn matched(&self) -> &[usize] {
        self.matched.as_slice()
    }

    /// Number of matched observations
    pub const fn len(&self) -> usize {
        self.matched.len()
    }

    /// Whether no observation matched the weights
    pub const fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// Number of observations whose region was not found in the weights
    pub const fn unmatched(&self) -> usize {
        self.unmatched
    }

    /// Values of the matched observations in matrix order
    pub fn values(&self, observations: &[Observation]) -> Vec<f64> {
        self.matched
            .iter()
            .filter_map(|&index| observations.get(index))
            .map(|obs| obs.value)
            .collect()
    }

    /// Total weight `S0` over all ordered pairs `i != j`
    pub fn total_weight(&self) -> f64 {
        self.matrix.sum()
    }

    /// Outgoing weight per matched observation
    pub fn row_sums(&self) -> Array1<f64> {
        self.matrix.sum_axis(Axis(1))
    }

    /// Incoming weight per matched observation
    pub fn col_sums(&self) -> Array1<f64> {
        self.matrix.sum_axis(Axis(0))
    }

    /// Weighted sum of `values` over each matched observation's neighbours
    pub fn spatial_lag(&self, values: &Array1<f64>) -> Array1<f64> {
        self.matrix.dot(values)
    }

    /// Sum of squared weights per row
    pub fn squared_row_sums(&self) -> Array1<f64> {
        self.matrix.mapv(|w| w * w).sum_axis(Axis(1))
    }
}
