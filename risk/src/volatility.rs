//! Volatility estimation
//!
//! Volatility is the sample standard deviation of periodic returns,
//! optionally annualized by √(periods per year).

use crate::error::{Result, RiskError};
use crate::stats;

/// Sample standard deviation of a return series
pub fn volatility(returns: &[f64]) -> Result<f64> {
    stats::std_dev(returns)
}

/// Volatility scaled to an annual figure
///
/// Use 252 for daily trading returns, 52 for weekly, 12 for monthly.
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> Result<f64> {
    if !(periods_per_year.is_finite() && periods_per_year > 0.0) {
        return Err(RiskError::InvalidParameter(format!(
            "Periods per year must be positive, got {}",
            periods_per_year
        )));
    }

    Ok(volatility(returns)? * periods_per_year.sqrt())
}
