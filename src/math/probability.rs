//! Standard normal distribution helpers for analytic significance testing

/// Beyond this many standard deviations the CDF is reported as exactly 0 or 1
pub const CDF_SATURATION: f64 = 8.0;

/// 1/sqrt(2π)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal cumulative distribution function
///
/// Zelen & Severo rational polynomial approximation (Abramowitz and Stegun
/// 26.2.17), absolute error below 7.5e-8. Saturates outside
/// `[-CDF_SATURATION, CDF_SATURATION]` so the exponential never underflows.
pub fn normal_cdf(x: f64) -> f64 {
    if x < -CDF_SATURATION {
        return 0.0;
    }
    if x > CDF_SATURATION {
        return 1.0;
    }

    let b1 = 0.319_381_530_f64;
    let b2 = -0.356_563_782_f64;
    let b3 = 1.781_477_937_f64;
    let b4 = -1.821_255_978_f64;
    let b5 = 1.330_274_429_f64;
    let p = 0.231_641_9_f64;

    let t = 1.0 / p.mul_add(x.abs(), 1.0);
    let polynomial = (b5.mul_add(t, b4).mul_add(t, b3).mul_add(t, b2).mul_add(t, b1)) * t;
    let tail = INV_SQRT_2PI * (-0.5 * x * x).exp() * polynomial;

    if x > 0.0 { 1.0 - tail } else { tail }
}

/// Two-tailed p-value of a standard normal z-score
///
/// Non-finite scores carry no evidence and map to 1, so degenerate inputs
/// upstream (zero variance, no neighbours) register as non-significant.
pub fn p_value_two_tailed(z_score: f64) -> f64 {
    if !z_score.is_finite() {
        return 1.0;
    }

    (2.0 * (1.0 - normal_cdf(z_score.abs()))).clamp(0.0, 1.0)
}
