//! Price and holdings transformations
//!
//! Turns raw price histories and holdings into the return series every
//! estimator consumes:
//! - Simple returns: p[i] / p[i-1] - 1
//! - Log returns: ln(p[i] / p[i-1])
//! - Cumulative returns: p[i] / p[0] - 1
//! - Portfolio returns: weighted sum of asset returns per period

use crate::error::{Result, RiskError};
use crate::stats;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Quantity of an instrument held at a price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Units held (negative = short)
    pub quantity: f64,

    /// Price per unit
    pub price: f64,
}

/// Period-over-period simple returns
pub fn simple_returns(prices: &[f64]) -> Result<Vec<f64>> {
    validate_prices(prices, 2)?;
    Ok(prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Period-over-period log returns
pub fn log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    validate_prices(prices, 2)?;
    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Return of every price relative to the first one
///
/// The first element is always 0.0.
pub fn cumulative_returns(prices: &[f64]) -> Result<Vec<f64>> {
    validate_prices(prices, 1)?;
    let base = prices[0];
    Ok(prices.iter().map(|p| p / base - 1.0).collect())
}

/// Total market value of a set of holdings
pub fn holdings_value(holdings: &[Holding]) -> Result<f64> {
    if holdings.is_empty() {
        return Err(RiskError::InsufficientData(
            "No holdings provided".to_string(),
        ));
    }

    let mut total = 0.0;
    for (index, holding) in holdings.iter().enumerate() {
        if !(holding.quantity.is_finite() && holding.price.is_finite()) {
            return Err(RiskError::NonFiniteValue { index });
        }
        total += holding.quantity * holding.price;
    }

    Ok(total)
}

/// Weighted portfolio return for each period
///
/// `asset_returns` holds one return series per asset, all the same length;
/// `weights` holds one weight per asset. Computed as R·w where R is the
/// periods × assets return matrix.
pub fn portfolio_returns(asset_returns: &[Vec<f64>], weights: &[f64]) -> Result<Vec<f64>> {
    if asset_returns.is_empty() {
        return Err(RiskError::InsufficientData(
            "No asset return series provided".to_string(),
        ));
    }

    if asset_returns.len() != weights.len() {
        return Err(RiskError::LengthMismatch {
            left: asset_returns.len(),
            right: weights.len(),
        });
    }
    stats::validate_series(weights, 1)?;

    let periods = asset_returns[0].len();
    for series in asset_returns {
        stats::validate_paired(&asset_returns[0], series)?;
        stats::validate_series(series, 1)?;
    }

    let returns = DMatrix::from_fn(periods, asset_returns.len(), |period, asset| {
        asset_returns[asset][period]
    });
    let weights = DVector::from_column_slice(weights);

    Ok((returns * weights).iter().copied().collect())
}

fn validate_prices(prices: &[f64], min_len: usize) -> Result<()> {
    stats::validate_series(prices, min_len)?;

    if let Some(index) = prices.iter().position(|p| *p <= 0.0) {
        return Err(RiskError::InvalidParameter(format!(
            "Price at index {} must be positive, got {}",
            index, prices[index]
        )));
    }

    Ok(())
}
