//! Benchmark-relative metrics
//!
//! - Beta: Cov(asset, benchmark) / Var(benchmark)
//! - Correlation: Pearson correlation of the two return series
//! - Tracking error: standard deviation of active returns
//!
//! All functions take two equally long, chronologically aligned series.

use crate::error::{Result, RiskError};
use crate::stats;

/// Sensitivity of asset returns to benchmark returns
///
/// A constant benchmark has no variance and is rejected. Series whose
/// moments overflow f64 are rejected with `CalculationError`.
pub fn beta(asset_returns: &[f64], benchmark_returns: &[f64]) -> Result<f64> {
    let covariance = stats::covariance(asset_returns, benchmark_returns)?;
    let benchmark_variance = stats::variance(benchmark_returns)?;

    if benchmark_variance == 0.0 {
        return Err(RiskError::DivisionByZero(
            "Benchmark variance is zero".to_string(),
        ));
    }

    stats::ensure_finite(covariance / benchmark_variance, "Beta")
}

/// Pearson correlation coefficient, in [-1, 1]
pub fn correlation(left: &[f64], right: &[f64]) -> Result<f64> {
    let covariance = stats::covariance(left, right)?;
    let left_std = stats::std_dev(left)?;
    let right_std = stats::std_dev(right)?;

    if left_std == 0.0 || right_std == 0.0 {
        return Err(RiskError::DivisionByZero(
            "Correlation of a constant series is undefined".to_string(),
        ));
    }

    let rho = stats::ensure_finite(covariance / (left_std * right_std), "Correlation")?;
    Ok(rho.clamp(-1.0, 1.0))
}

/// Standard deviation of portfolio minus benchmark returns
pub fn tracking_error(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Result<f64> {
    stats::validate_paired(portfolio_returns, benchmark_returns)?;
    stats::validate_series(benchmark_returns, 2)?;

    let active: Vec<f64> = portfolio_returns
        .iter()
        .zip(benchmark_returns.iter())
        .map(|(p, b)| p - b)
        .collect();

    stats::std_dev(&active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn market() -> Vec<f64> {
        vec![0.01, -0.02, 0.015, -0.005, 0.03, -0.01, 0.02]
    }

    #[test]
    fn test_beta_of_scaled_series() {
        let market = market();
        let levered: Vec<f64> = market.iter().map(|m| 1.5 * m + 0.001).collect();

        assert_relative_eq!(beta(&levered, &market).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_against_itself() {
        let market = market();
        assert_eq!(beta(&market, &market).unwrap(), 1.0);
    }

    #[test]
    fn test_beta_inverse_series() {
        let market = market();
        let hedge: Vec<f64> = market.iter().map(|m| -m).collect();

        assert_relative_eq!(beta(&hedge, &market).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_length_mismatch() {
        let result = beta(&[0.01, 0.02, 0.03], &[0.01, 0.02]);
        assert_eq!(result, Err(RiskError::LengthMismatch { left: 3, right: 2 }));
    }

    #[test]
    fn test_beta_needs_two_observations() {
        let result = beta(&[0.01], &[0.02]);
        assert!(matches!(result, Err(RiskError::InsufficientData(_))));
    }

    #[test]
    fn test_beta_zero_benchmark_variance() {
        let result = beta(&[0.01, 0.02, 0.03], &[0.5, 0.5, 0.5]);
        assert!(matches!(result, Err(RiskError::DivisionByZero(_))));
    }

    #[test]
    fn test_beta_overflow_is_an_error() {
        let extreme = [1e200, -1e200, 5e199];
        let result = beta(&extreme, &extreme);
        assert!(matches!(result, Err(RiskError::CalculationError(_))));
    }

    #[test]
    fn test_beta_of_tiny_benchmark_variance_is_an_error() {
        // Variance near the subnormal range divides a normal covariance to ∞
        let benchmark = [1e-160, -1e-160, 0.0];
        let asset = [1e160, -1e160, 0.0];
        let result = beta(&asset, &benchmark);
        assert!(matches!(result, Err(RiskError::CalculationError(_))));
    }

    #[test]
    fn test_correlation() {
        let market = market();
        let shifted: Vec<f64> = market.iter().map(|m| 2.0 * m - 0.004).collect();
        let inverted: Vec<f64> = market.iter().map(|m| -3.0 * m).collect();

        assert_relative_eq!(correlation(&market, &shifted).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(correlation(&market, &inverted).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_is_bounded() {
        let a = [0.013, -0.004, 0.021, -0.017, 0.002, 0.008];
        let b = [0.011, -0.006, 0.018, -0.020, 0.004, 0.005];

        let rho = correlation(&a, &b).unwrap();
        assert!(rho > 0.9 && rho <= 1.0);
    }

    #[test]
    fn test_correlation_constant_series() {
        let result = correlation(&market(), &[0.25; 7]);
        assert!(matches!(result, Err(RiskError::DivisionByZero(_))));
    }

    #[test]
    fn test_tracking_error() {
        let benchmark = [0.01, 0.02, -0.01, 0.00];
        let portfolio = [0.015, 0.015, -0.005, -0.005];

        // Active returns alternate +0.005 / -0.005
        let te = tracking_error(&portfolio, &benchmark).unwrap();
        assert_relative_eq!(te, (1.0e-4_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_tracking_error_of_identical_series() {
        let market = market();
        assert_eq!(tracking_error(&market, &market).unwrap(), 0.0);
    }

    #[test]
    fn test_tracking_error_length_mismatch() {
        let result = tracking_error(&[0.01, 0.02], &[0.01, 0.02, 0.03]);
        assert_eq!(result, Err(RiskError::LengthMismatch { left: 2, right: 3 }));
    }
}
