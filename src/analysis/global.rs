//! Global Moran's I with analytic inference under the randomization assumption

use crate::analysis::engine::EngineConfig;
use crate::analysis::weights::SpatialWeights;
use crate::math::moments::CentralMoments;
use crate::math::probability::p_value_two_tailed;
use crate::spatial::alignment::AlignedWeights;
use crate::spatial::region::Observation;
use tracing::debug;

/// Global spatial autocorrelation over every observed region in the network
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalMoranResult {
    /// Moran's I statistic
    pub moran_i: f64,
    /// Expected I under no autocorrelation, `-1 / (N - 1)`
    pub expected_i: f64,
    /// Variance of I under randomization
    pub variance: f64,
    /// Standardized deviation of I from its expectation
    pub z_score: f64,
    /// Two-tailed p-value of the z-score
    pub p_value: f64,
    /// Whether the p-value is within the significance level
    pub significant: bool,
}

impl GlobalMoranResult {
    /// Result reported when there is nothing to correlate
    pub const fn neutral() -> Self {
        Self {
            moran_i: 0.0,
            expected_i: 0.0,
            variance: 0.0,
            z_score: 0.0,
            p_value: 1.0,
            significant: false,
        }
    }
}

/// Compute global Moran's I for `observations` under `weights`
///
/// Only observations whose region appears in `weights` count toward `N` and
/// the moments. Degrades instead of failing: no observations, no weights or
/// a fully disconnected graph give [`GlobalMoranResult::neutral`], and a
/// constant field reports `I = 0` with `p = 1`.
pub fn compute_global(
    observations: &[Observation],
    weights: &SpatialWeights,
    config: &EngineConfig,
) -> GlobalMoranResult {
    if observations.is_empty() || weights.is_empty() {
        return GlobalMoranResult::neutral();
    }

    let aligned = AlignedWeights::new(observations, weights);
    let s0 = aligned.total_weight();
    if s0 <= 0.0 {
        debug!(
            observations = observations.len(),
            unmatched = aligned.unmatched(),
            "no connected observation pairs, global statistic is neutral"
        );
        return GlobalMoranResult::neutral();
    }

    let moments = CentralMoments::from_values(&aligned.values(observations));
    let n = aligned.len() as f64;
    let expected_i = -1.0 / (n - 1.0);

    if moments.sum_squares < config.numerical_floor {
        return GlobalMoranResult {
            expected_i,
            ..GlobalMoranResult::neutral()
        };
    }

    let deviations = &moments.deviations;
    let numerator = deviations.dot(&aligned.spatial_lag(deviations));
    let denominator = moments.sum_squares.max(config.numerical_floor);
    let moran_i = (n / s0) * (numerator / denominator);

    let matrix = aligned.matrix();
    let symmetric = matrix + &matrix.t();
    let s1 = 0.5 * symmetric.mapv(|w| w * w).sum();
    let degree = aligned.row_sums() + aligned.col_sums();
    let s2 = degree.mapv(|d| d * d).sum();

    let s0_squared = s0 * s0;
    let kurtosis = moments.kurtosis();
    let scale = (n - 1.0) * (n - 2.0) * (n - 3.0) * s0_squared;
    let normal_term = n * ((n * n - 3.0 * n + 3.0) * s1 - n * s2 + 3.0 * s0_squared);
    let kurtosis_term = kurtosis * ((n * n - n) * s1 - 2.0 * n * s2 + 6.0 * s0_squared);
    // N <= 3 zeroes the scale and leaves the ratio undefined
    let variance = bounded_variance(
        (normal_term - kurtosis_term - scale) / scale,
        config.numerical_floor,
    );

    let z_score = (moran_i - expected_i) / variance.sqrt();
    let p_value = p_value_two_tailed(z_score);
    let significant = p_value <= config.significance_level;

    debug!(
        observations = aligned.len(),
        unmatched = aligned.unmatched(),
        moran_i, expected_i, variance, z_score, p_value, "computed global Moran's I"
    );

    GlobalMoranResult {
        moran_i,
        expected_i,
        variance,
        z_score,
        p_value,
        significant,
    }
}

/// Floor a finite variance; a non-finite one means no variance estimate exists
///
/// An infinite variance drives the z-score to zero so the statistic is never
/// significant.
pub(crate) fn bounded_variance(variance: f64, floor: f64) -> f64 {
    if variance.is_finite() {
        variance.max(floor)
    } else {
        f64::INFINITY
    }
}
