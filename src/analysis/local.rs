//! Local indicators of spatial association (local Moran's I) and cluster labels

use crate::analysis::engine::EngineConfig;
use crate::analysis::global::bounded_variance;
use crate::analysis::weights::SpatialWeights;
use crate::math::moments::CentralMoments;
use crate::math::probability::p_value_two_tailed;
use crate::spatial::alignment::AlignedWeights;
use crate::spatial::region::{Observation, RegionId};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// LISA quadrant of a region relative to its neighbours
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterType {
    /// High value surrounded by high values
    HighHigh,
    /// Low value surrounded by low values
    LowLow,
    /// High value surrounded by low values
    HighLow,
    /// Low value surrounded by high values
    LowHigh,
    /// No significant local association
    NotSignificant,
}

impl ClusterType {
    /// Every cluster type in reporting order
    pub const ALL: [Self; 5] = [
        Self::HighHigh,
        Self::LowLow,
        Self::HighLow,
        Self::LowHigh,
        Self::NotSignificant,
    ];

    /// Classify a region from its standardized deviation and neighbour lag
    ///
    /// The quadrant is the sign of the region's own deviation paired with the
    /// sign of its neighbours' weighted deviation. Anything above the
    /// significance level, or sitting exactly on an axis, is not significant.
    pub fn classify(
        standardized_deviation: f64,
        neighbor_lag: f64,
        p_value: f64,
        significance_level: f64,
    ) -> Self {
        if p_value.is_nan() || p_value > significance_level {
            return Self::NotSignificant;
        }

        let high = standardized_deviation > 0.0;
        let low = standardized_deviation < 0.0;
        if high && neighbor_lag > 0.0 {
            Self::HighHigh
        } else if low && neighbor_lag < 0.0 {
            Self::LowLow
        } else if high && neighbor_lag < 0.0 {
            Self::HighLow
        } else if low && neighbor_lag > 0.0 {
            Self::LowHigh
        } else {
            Self::NotSignificant
        }
    }

    /// Short code used in CSV output
    pub const fn code(self) -> &'static str {
        match self {
            Self::HighHigh => "HH",
            Self::LowLow => "LL",
            Self::HighLow => "HL",
            Self::LowHigh => "LH",
            Self::NotSignificant => "NS",
        }
    }

    /// Whether the region belongs to a significant cluster or outlier
    pub const fn is_significant(self) -> bool {
        !matches!(self, Self::NotSignificant)
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HighHigh => "High-High",
            Self::LowLow => "Low-Low",
            Self::HighLow => "High-Low",
            Self::LowHigh => "Low-High",
            Self::NotSignificant => "Not significant",
        };
        f.write_str(label)
    }
}

/// Local Moran's I for one region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalMoranResult {
    /// Local Moran's I
    pub local_i: f64,
    /// Standardized local I
    pub z_score: f64,
    /// Two-tailed p-value of the z-score
    pub p_value: f64,
    /// Variance of local I
    pub variance: f64,
    /// Neighbour lag divided by the region's own absolute deviation
    pub spatial_lag: f64,
    /// Quadrant classification
    pub cluster_type: ClusterType,
}

impl LocalMoranResult {
    /// Result for a region with no place in the weights matrix
    ///
    /// No variance estimate exists, so the variance is infinite and the
    /// region is never significant.
    pub const fn unconnected() -> Self {
        Self {
            local_i: 0.0,
            z_score: 0.0,
            p_value: 1.0,
            variance: f64::INFINITY,
            spatial_lag: 0.0,
            cluster_type: ClusterType::NotSignificant,
        }
    }
}

/// Compute local Moran's I for every observation
///
/// The shared mean and variance come from observations whose region appears
/// in `weights`. Regions with no neighbours get `local_i = 0` and are always
/// [`ClusterType::NotSignificant`]; regions missing from `weights` get
/// [`LocalMoranResult::unconnected`].
pub fn compute_local(
    observations: &[Observation],
    weights: &SpatialWeights,
    config: &EngineConfig,
) -> BTreeMap<RegionId, LocalMoranResult> {
    let mut results = BTreeMap::new();
    if observations.is_empty() {
        return results;
    }

    let aligned = AlignedWeights::new(observations, weights);
    let floor = config.numerical_floor;
    let moments = CentralMoments::from_values(&aligned.values(observations));
    let std_dev = moments.std_dev(floor);
    let variance0 = std_dev * std_dev;
    let n = aligned.len() as f64;

    let lags = aligned.spatial_lag(&moments.deviations);
    let squared_weights = aligned.squared_row_sums();

    for (((&index, &deviation), &lag), &sum_squared) in aligned
        .matched()
        .iter()
        .zip(moments.deviations.iter())
        .zip(lags.iter())
        .zip(squared_weights.iter())
    {
        let Some(obs) = observations.get(index) else {
            continue;
        };
        let local_i = (deviation / variance0) * lag;
        let variance = bounded_variance(
            (sum_squared * (n - 1.0)) / ((n - 2.0) * variance0),
            floor,
        );
        let z_score = local_i / variance.sqrt();
        let p_value = p_value_two_tailed(z_score);
        let spatial_lag = lag / deviation.abs().max(floor);
        let cluster_type =
            ClusterType::classify(deviation / std_dev, lag, p_value, config.significance_level);

        trace!(
            region = %obs.region,
            neighbors = weights.neighbors(obs.region.as_str()).len(),
            local_i, z_score, p_value, cluster = %cluster_type, "computed local Moran's I"
        );

        results.insert(
            obs.region.clone(),
            LocalMoranResult {
                local_i,
                z_score,
                p_value,
                variance,
                spatial_lag,
                cluster_type,
            },
        );
    }

    for obs in observations {
        results
            .entry(obs.region.clone())
            .or_insert_with(LocalMoranResult::unconnected);
    }

    debug!(
        regions = results.len(),
        isolated = squared_weights.iter().filter(|&&s| s <= 0.0).count(),
        unmatched = aligned.unmatched(),
        "computed local Moran's I"
    );

    results
}
