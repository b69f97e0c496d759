//! Value at Risk (VaR) and Conditional VaR estimation
//!
//! Implements three methodologies over a series of periodic returns:
//! - Historical: empirical quantile of the loss distribution, scaled by √T
//! - Parametric: normal distribution fitted to the series (VaR = z·σ·√T - μ·T)
//! - Monte Carlo: normal T-day returns simulated from the fitted moments
//!
//! Losses are negated returns, so a positive VaR is a potential loss.
//! CVaR (Expected Shortfall) is the mean loss at or beyond the VaR threshold.

use crate::config::MonteCarloConfig;
use crate::error::{Result, RiskError};
use crate::stats::{self, standard_normal};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF};

/// VaR calculation method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarMethod {
    #[default]
    Historical,
    Parametric,
    MonteCarlo,
}

/// VaR and CVaR for one return series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarEstimate {
    /// VaR as a positive loss fraction
    pub var: f64,

    /// CVaR (Expected Shortfall), never below `var`
    pub cvar: f64,

    /// Confidence level (e.g., 0.95, 0.99)
    pub confidence_level: f64,

    /// Time horizon in days
    pub horizon_days: u32,

    /// Calculation method used
    pub method: VarMethod,

    /// Number of return observations the estimate was fitted on
    pub observations: usize,
}

/// VaR backtesting result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarBacktest {
    /// Number of VaR forecasts
    pub num_forecasts: usize,

    /// Number of violations (realized loss exceeded forecast VaR)
    pub num_violations: usize,

    /// Violation rate (num_violations / num_forecasts)
    pub violation_rate: f64,

    /// Expected violation rate, 1 - confidence level
    pub expected_violation_rate: f64,

    /// Whether the violation rate sits inside a 2-sigma binomial band
    pub validated: bool,
}

/// Reject confidence levels outside the open interval (0, 1)
pub fn validate_confidence(confidence_level: f64) -> Result<()> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(RiskError::InvalidConfidenceLevel(confidence_level));
    }
    Ok(())
}

/// Reject a zero-day horizon
pub fn validate_horizon(horizon_days: u32) -> Result<()> {
    if horizon_days == 0 {
        return Err(RiskError::InvalidTimeHorizon(horizon_days));
    }
    Ok(())
}

/// Square-root-of-time scaling factor for an i.i.d. horizon
pub fn horizon_scale(horizon_days: u32) -> f64 {
    (horizon_days as f64).sqrt()
}

/// Estimate VaR and CVaR with the requested method
pub fn estimate(
    returns: &[f64],
    confidence_level: f64,
    horizon_days: u32,
    method: VarMethod,
    monte_carlo: &MonteCarloConfig,
) -> Result<VarEstimate> {
    validate_confidence(confidence_level)?;
    validate_horizon(horizon_days)?;

    let (var, cvar) = match method {
        VarMethod::Historical => historical(returns, confidence_level, horizon_days)?,
        VarMethod::Parametric => parametric(returns, confidence_level, horizon_days)?,
        VarMethod::MonteCarlo => {
            monte_carlo_simulation(returns, confidence_level, horizon_days, monte_carlo)?
        }
    };

    tracing::debug!(
        ?method,
        confidence_level,
        horizon_days,
        observations = returns.len(),
        var,
        cvar,
        "VaR estimated"
    );

    Ok(VarEstimate {
        var,
        cvar,
        confidence_level,
        horizon_days,
        method,
        observations: returns.len(),
    })
}

/// Historical VaR: the `confidence_level` quantile of losses, scaled by √T
pub fn historical_var(returns: &[f64], confidence_level: f64, horizon_days: u32) -> Result<f64> {
    validate_confidence(confidence_level)?;
    validate_horizon(horizon_days)?;
    Ok(historical(returns, confidence_level, horizon_days)?.0)
}

/// Historical CVaR: mean of losses at or beyond the historical VaR, scaled by √T
pub fn historical_cvar(returns: &[f64], confidence_level: f64, horizon_days: u32) -> Result<f64> {
    validate_confidence(confidence_level)?;
    validate_horizon(horizon_days)?;
    Ok(historical(returns, confidence_level, horizon_days)?.1)
}

/// Parametric (normal) VaR: z·σ·√T - μ·T
pub fn parametric_var(returns: &[f64], confidence_level: f64, horizon_days: u32) -> Result<f64> {
    validate_confidence(confidence_level)?;
    validate_horizon(horizon_days)?;
    Ok(parametric(returns, confidence_level, horizon_days)?.0)
}

/// Parametric (normal) CVaR: σ·√T·φ(z)/(1 - c) - μ·T
pub fn parametric_cvar(returns: &[f64], confidence_level: f64, horizon_days: u32) -> Result<f64> {
    validate_confidence(confidence_level)?;
    validate_horizon(horizon_days)?;
    Ok(parametric(returns, confidence_level, horizon_days)?.1)
}

/// Backtest VaR forecasts against realized returns
///
/// A violation is a period whose realized loss (negated return) exceeds the
/// VaR forecast for that period.
pub fn backtest(
    var_forecasts: &[f64],
    realized_returns: &[f64],
    confidence_level: f64,
) -> Result<VarBacktest> {
    validate_confidence(confidence_level)?;
    stats::validate_paired(var_forecasts, realized_returns)?;

    if var_forecasts.is_empty() {
        return Err(RiskError::InsufficientData(
            "No forecasts to backtest".to_string(),
        ));
    }
    stats::validate_series(var_forecasts, 1)?;
    stats::validate_series(realized_returns, 1)?;

    let num_forecasts = var_forecasts.len();
    let num_violations = var_forecasts
        .iter()
        .zip(realized_returns.iter())
        .filter(|(var, ret)| -**ret > **var)
        .count();

    let violation_rate = num_violations as f64 / num_forecasts as f64;
    let expected_violation_rate = 1.0 - confidence_level;

    let std_error =
        (expected_violation_rate * (1.0 - expected_violation_rate) / num_forecasts as f64).sqrt();
    let lower_bound = (expected_violation_rate - 2.0 * std_error).max(0.0);
    let upper_bound = (expected_violation_rate + 2.0 * std_error).min(1.0);

    let validated = violation_rate >= lower_bound && violation_rate <= upper_bound;

    Ok(VarBacktest {
        num_forecasts,
        num_violations,
        violation_rate,
        expected_violation_rate,
        validated,
    })
}

fn historical(returns: &[f64], confidence_level: f64, horizon_days: u32) -> Result<(f64, f64)> {
    stats::validate_series(returns, 1)?;
    warn_on_coarse_tail(returns.len(), confidence_level);

    let losses: Vec<f64> = returns.iter().map(|r| -r).collect();
    let sorted_losses = stats::sorted_copy(&losses);
    let (var, cvar) = tail_statistics(&sorted_losses, confidence_level)?;

    let scale = horizon_scale(horizon_days);
    finite_pair(var * scale, cvar * scale)
}

fn parametric(returns: &[f64], confidence_level: f64, horizon_days: u32) -> Result<(f64, f64)> {
    let mu = stats::mean(returns)?;
    let sigma = stats::std_dev(returns)?;

    let normal = standard_normal()?;
    let z = normal.inverse_cdf(confidence_level);

    let horizon = horizon_days as f64;
    let sigma_t = sigma * horizon.sqrt();
    let drift = mu * horizon;

    let var = z * sigma_t - drift;
    let cvar = sigma_t * normal.pdf(z) / (1.0 - confidence_level) - drift;

    finite_pair(var, cvar.max(var))
}

fn monte_carlo_simulation(
    returns: &[f64],
    confidence_level: f64,
    horizon_days: u32,
    config: &MonteCarloConfig,
) -> Result<(f64, f64)> {
    if config.simulations == 0 {
        return Err(RiskError::InvalidParameter(
            "Number of simulations must be positive".to_string(),
        ));
    }

    let mu = stats::mean(returns)?;
    let sigma = stats::std_dev(returns)?;

    let horizon = horizon_days as f64;
    let distribution = Normal::new(mu * horizon, sigma * horizon.sqrt())
        .map_err(|e| RiskError::CalculationError(e.to_string()))?;

    let mut rng = match config.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    // Simulated values are already T-day returns, so no √T scaling here
    let losses: Vec<f64> = (0..config.simulations)
        .map(|_| -distribution.sample(&mut rng))
        .collect();
    if losses.iter().any(|loss| !loss.is_finite()) {
        return Err(RiskError::CalculationError(
            "Simulated horizon return overflowed".to_string(),
        ));
    }
    let sorted_losses = stats::sorted_copy(&losses);

    let (var, cvar) = tail_statistics(&sorted_losses, confidence_level)?;
    finite_pair(var, cvar)
}

/// VaR and CVaR of an ascending loss distribution
fn tail_statistics(sorted_losses: &[f64], confidence_level: f64) -> Result<(f64, f64)> {
    let var = stats::quantile(sorted_losses, confidence_level)?;

    // The quantile never exceeds the largest loss, so the tail is never empty
    let start = sorted_losses.partition_point(|loss| *loss < var);
    let tail = &sorted_losses[start..];
    let cvar = stats::mean(tail)?;

    // Rounding in the tail mean can land a hair under the threshold
    Ok((var, cvar.max(var)))
}

fn finite_pair(var: f64, cvar: f64) -> Result<(f64, f64)> {
    Ok((
        stats::ensure_finite(var, "VaR")?,
        stats::ensure_finite(cvar, "CVaR")?,
    ))
}

fn warn_on_coarse_tail(observations: usize, confidence_level: f64) {
    let needed = (1.0 / (1.0 - confidence_level)).ceil();
    if (observations as f64) < needed {
        tracing::warn!(
            observations,
            confidence_level,
            needed = needed as u64,
            "Too few observations to resolve the loss tail; quantile is interpolated"
        );
    }
}
