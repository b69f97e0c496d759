//! Statistics core shared by every estimator
//!
//! Conventions used throughout the crate:
//! - Variance and covariance are **sample** statistics (divisor n - 1)
//! - Quantiles interpolate linearly between closest ranks, h = (n - 1) * p

use crate::error::{Result, RiskError};
use statrs::distribution::Normal;

/// Check that a series holds at least `min_len` finite values
pub fn validate_series(series: &[f64], min_len: usize) -> Result<()> {
    if series.len() < min_len {
        return Err(RiskError::InsufficientData(format!(
            "Need at least {} observations, got {}",
            min_len,
            series.len()
        )));
    }

    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(RiskError::NonFiniteValue { index });
    }

    Ok(())
}

/// Check that two series are the same length
pub fn validate_paired(left: &[f64], right: &[f64]) -> Result<()> {
    if left.len() != right.len() {
        return Err(RiskError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(series: &[f64]) -> Result<f64> {
    validate_series(series, 1)?;
    ensure_finite(series.iter().sum::<f64>() / series.len() as f64, "Mean")
}

/// Sample covariance of two equally long series
///
/// Cov(x, y) = Σ (x_i - x̄)(y_i - ȳ) / (n - 1)
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64> {
    validate_paired(x, y)?;
    validate_series(x, 2)?;
    validate_series(y, 2)?;

    let x_mean = mean(x)?;
    let y_mean = mean(y)?;

    let sum: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - x_mean) * (b - y_mean))
        .sum();

    ensure_finite(sum / (x.len() - 1) as f64, "Covariance")
}

/// Sample variance (requires at least two observations)
pub fn variance(series: &[f64]) -> Result<f64> {
    // Same arithmetic as the covariance so Var(x) and Cov(x, x) agree exactly
    covariance(series, series)
}

/// Sample standard deviation
pub fn std_dev(series: &[f64]) -> Result<f64> {
    Ok(variance(series)?.sqrt())
}

/// Ascending copy of a series for quantile lookup
pub fn sorted_copy(series: &[f64]) -> Vec<f64> {
    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Linearly interpolated quantile of an ascending series
///
/// With h = (n - 1) * p the result is `x[⌊h⌋] + (h - ⌊h⌋) * (x[⌊h⌋ + 1] - x[⌊h⌋])`,
/// kept inside the bracketing pair.
///
/// `sorted` must already be ascending (see [`sorted_copy`]). Order is not
/// checked; on unsorted input the result is still a value between the two
/// bracketing elements but is not a quantile.
pub fn quantile(sorted: &[f64], p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(RiskError::InvalidProbability(p));
    }

    validate_series(sorted, 1)?;

    let last = sorted.len() - 1;
    let h = last as f64 * p;
    let lower_index = (h.floor() as usize).min(last);
    let upper_index = (lower_index + 1).min(last);
    let fraction = h - lower_index as f64;

    let lower = sorted[lower_index];
    let upper = sorted[upper_index];
    let value = lower + fraction * (upper - lower);

    Ok(value.max(lower.min(upper)).min(upper.max(lower)))
}

/// Reject a derived value that overflowed to ±∞ or NaN
pub(crate) fn ensure_finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RiskError::CalculationError(format!(
            "{} is not finite ({})",
            what, value
        )))
    }
}

/// Standard normal distribution N(0, 1)
pub(crate) fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| RiskError::CalculationError(e.to_string()))
}
