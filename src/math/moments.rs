//! Central moments of an observation vector

use ndarray::Array1;

/// Deviations from the mean together with the moments both statistics share
#[derive(Clone, Debug)]
pub struct CentralMoments {
    /// Arithmetic mean of the values
    pub mean: f64,
    /// `value - mean` per observation
    pub deviations: Array1<f64>,
    /// Sum of squared deviations
    pub sum_squares: f64,
    /// Second central moment, `mean(d^2)`
    pub m2: f64,
    /// Fourth central moment, `mean(d^4)`
    pub m4: f64,
}

impl CentralMoments {
    /// Compute the moments of `values`; all zero for an empty slice
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: 0.0,
                deviations: Array1::zeros(0),
                sum_squares: 0.0,
                m2: 0.0,
                m4: 0.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let deviations: Array1<f64> = values.iter().map(|v| v - mean).collect();
        let sum_squares = deviations.mapv(|d| d * d).sum();
        let m4 = deviations.mapv(|d| d.powi(4)).sum() / n;

        Self {
            mean,
            deviations,
            sum_squares,
            m2: sum_squares / n,
            m4,
        }
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.deviations.len()
    }

    /// True when built from no values
    pub fn is_empty(&self) -> bool {
        self.deviations.is_empty()
    }

    /// Population standard deviation, floored so it can safely divide
    pub fn std_dev(&self, floor: f64) -> f64 {
        self.m2.sqrt().max(floor)
    }

    /// Sample kurtosis `m4 / m2^2`
    pub fn kurtosis(&self) -> f64 {
        self.m4 / (self.m2 * self.m2)
    }
}
