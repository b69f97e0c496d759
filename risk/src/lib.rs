//! # riskcalc: Risk Metrics for Return Series
//!
//! This library computes market risk metrics over in-memory return series.
//! Every function is pure and synchronous; invalid input is reported as a
//! [`RiskError`] instead of a sentinel value.
//!
//! ## Core Components
//!
//! - **Statistics core** (`stats`): mean, sample variance, interpolated quantiles
//! - **VaR / CVaR** (`var`): historical, parametric and Monte Carlo estimators
//! - **Volatility** (`volatility`): periodic and annualized standard deviation
//! - **Benchmark metrics** (`benchmark`): beta, correlation, tracking error
//! - **Greeks** (`greeks`): Black-Scholes price, delta, gamma, vega, theta, rho
//! - **Returns** (`returns`): price series to return series, portfolio aggregation
//! - **RiskEngine**: applies a YAML/JSON [`RiskConfig`] to return series
//!
//! ## Conventions
//!
//! - Variance is the sample variance (divisor n - 1)
//! - Quantiles interpolate linearly between closest ranks
//! - VaR and CVaR are positive for losses and scale by √horizon
//!
//! ## Example Usage
//!
//! ```rust
//! use riskcalc::{compute_cvar, compute_delta, compute_var};
//!
//! let returns = [0.01, -0.02, 0.015, -0.005, 0.03];
//!
//! let var = compute_var(&returns, 0.95, 1).unwrap();
//! let cvar = compute_cvar(&returns, 0.95, 1).unwrap();
//! assert!((var - 0.017).abs() < 1e-12);
//! assert!(cvar >= var);
//!
//! let delta = compute_delta(100.0, 100.0, 0.05, 0.2, 1.0, true).unwrap();
//! assert!(delta > 0.5 && delta < 1.0);
//! ```

pub mod benchmark;
pub mod config;
mod engine;
pub mod error;
pub mod greeks;
pub mod returns;
pub mod stats;
pub mod var;
pub mod volatility;

pub use config::{MonteCarloConfig, RiskConfig};
pub use engine::{BenchmarkMetrics, RiskEngine, RiskReport};
pub use error::{Result, RiskError};
pub use greeks::{Greeks, OptionKind, OptionParams};
pub use returns::Holding;
pub use var::{VarBacktest, VarEstimate, VarMethod};

/// Historical VaR of a return series at `confidence`, scaled to `horizon_days`
pub fn compute_var(series: &[f64], confidence: f64, horizon_days: u32) -> Result<f64> {
    var::historical_var(series, confidence, horizon_days)
}

/// Historical CVaR (Expected Shortfall) of a return series
pub fn compute_cvar(series: &[f64], confidence: f64, horizon_days: u32) -> Result<f64> {
    var::historical_cvar(series, confidence, horizon_days)
}

/// Sample standard deviation of a return series
pub fn compute_volatility(series: &[f64]) -> Result<f64> {
    volatility::volatility(series)
}

/// Beta of an asset against a benchmark
pub fn compute_beta(asset_series: &[f64], bench_series: &[f64]) -> Result<f64> {
    benchmark::beta(asset_series, bench_series)
}

/// Black-Scholes delta of a European call (`is_call`) or put
pub fn compute_delta(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    is_call: bool,
) -> Result<f64> {
    let kind = if is_call { OptionKind::Call } else { OptionKind::Put };
    greeks::delta(&OptionParams::new(spot, strike, rate, vol, time, kind))
}

/// Initialize tracing with `RUST_LOG`, defaulting to `info`
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _: RiskConfig = RiskConfig::default();
        let _: RiskEngine = RiskEngine::default();
        let _: VarMethod = VarMethod::Historical;
        let _: OptionKind = OptionKind::Put;
    }

    #[test]
    fn test_compute_functions_reject_bad_input() {
        assert!(matches!(compute_var(&[], 0.95, 1), Err(RiskError::InsufficientData(_))));
        assert_eq!(
            compute_cvar(&[0.01], 1.5, 1),
            Err(RiskError::InvalidConfidenceLevel(1.5))
        );
        assert!(matches!(compute_volatility(&[0.01]), Err(RiskError::InsufficientData(_))));
        assert_eq!(
            compute_beta(&[0.01, 0.02], &[0.01]),
            Err(RiskError::LengthMismatch { left: 2, right: 1 })
        );
        assert!(matches!(
            compute_delta(100.0, 100.0, 0.05, 0.2, 0.0, true),
            Err(RiskError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_compute_delta_put() {
        let call = compute_delta(100.0, 100.0, 0.05, 0.2, 1.0, true).unwrap();
        let put = compute_delta(100.0, 100.0, 0.05, 0.2, 1.0, false).unwrap();
        assert!((call - put - 1.0).abs() < 1e-12);
    }
}
