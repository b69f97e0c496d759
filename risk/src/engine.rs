//! Configuration-driven risk engine
//!
//! The RiskEngine applies a validated [`RiskConfig`] to return series so
//! callers do not repeat confidence, horizon and method on every call.

use crate::benchmark;
use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use crate::stats;
use crate::var::{self, VarEstimate, VarMethod};
use crate::volatility;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metrics of a return series measured against a benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    pub beta: f64,
    pub correlation: f64,
    pub tracking_error: f64,
}

/// Full risk snapshot for one return series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// VaR and CVaR at the configured confidence and horizon
    pub var: VarEstimate,

    /// Periodic volatility
    pub volatility: f64,

    /// Volatility scaled by √(periods per year)
    pub annualized_volatility: f64,

    /// Present only when a benchmark series was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkMetrics>,

    /// Number of return observations
    pub observations: usize,

    /// Timestamp of calculation
    pub timestamp: DateTime<Utc>,
}

/// Risk calculation engine
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    /// Create a new RiskEngine from a configuration
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load configuration from a YAML string
    ///
    /// # Example
    ///
    /// ```
    /// use riskcalc::RiskEngine;
    ///
    /// let yaml = r#"
    /// confidence_level: 0.95
    /// horizon_days: 1
    /// "#;
    ///
    /// let engine = RiskEngine::from_yaml(yaml).unwrap();
    /// let estimate = engine.var(&[0.01, -0.02, 0.015, -0.005, 0.03]).unwrap();
    /// assert!((estimate.var - 0.017).abs() < 1e-12);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::new(RiskConfig::from_yaml(yaml)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(RiskConfig::from_json(json)?)
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// VaR and CVaR with the configured confidence, horizon and method
    pub fn var(&self, returns: &[f64]) -> Result<VarEstimate> {
        self.var_with(
            returns,
            self.config.confidence_level,
            self.config.horizon_days,
            self.config.var_method,
        )
    }

    /// VaR and CVaR with explicit parameters
    pub fn var_with(
        &self,
        returns: &[f64],
        confidence_level: f64,
        horizon_days: u32,
        method: VarMethod,
    ) -> Result<VarEstimate> {
        self.check_observations(returns)?;
        var::estimate(
            returns,
            confidence_level,
            horizon_days,
            method,
            &self.config.monte_carlo,
        )
    }

    /// Periodic volatility
    pub fn volatility(&self, returns: &[f64]) -> Result<f64> {
        self.check_observations(returns)?;
        volatility::volatility(returns)
    }

    /// Volatility annualized with the configured periods per year
    pub fn annualized_volatility(&self, returns: &[f64]) -> Result<f64> {
        self.check_observations(returns)?;
        volatility::annualized_volatility(returns, self.config.periods_per_year)
    }

    /// Beta, correlation and tracking error against a benchmark
    pub fn benchmark_metrics(
        &self,
        returns: &[f64],
        benchmark_returns: &[f64],
    ) -> Result<BenchmarkMetrics> {
        self.check_observations(returns)?;

        Ok(BenchmarkMetrics {
            beta: benchmark::beta(returns, benchmark_returns)?,
            correlation: benchmark::correlation(returns, benchmark_returns)?,
            tracking_error: benchmark::tracking_error(returns, benchmark_returns)?,
        })
    }

    /// Compute every configured metric for one series
    pub fn report(
        &self,
        returns: &[f64],
        benchmark_returns: Option<&[f64]>,
    ) -> Result<RiskReport> {
        let var = self.var(returns)?;
        let volatility = self.volatility(returns)?;
        let annualized_volatility = volatility * self.config.periods_per_year.sqrt();

        let benchmark = benchmark_returns
            .map(|bench| self.benchmark_metrics(returns, bench))
            .transpose()?;

        tracing::info!(
            observations = returns.len(),
            var = var.var,
            cvar = var.cvar,
            volatility,
            has_benchmark = benchmark.is_some(),
            "Risk report computed"
        );

        Ok(RiskReport {
            var,
            volatility,
            annualized_volatility,
            benchmark,
            observations: returns.len(),
            timestamp: Utc::now(),
        })
    }

    /// VaR for many independent series, in input order
    ///
    /// Runs on the rayon thread pool when the `parallel` feature is enabled.
    pub fn var_batch(&self, series: &[Vec<f64>]) -> Vec<Result<VarEstimate>> {
        #[cfg(feature = "parallel")]
        let results: Vec<Result<VarEstimate>> = {
            use rayon::prelude::*;
            series.par_iter().map(|returns| self.var(returns)).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<VarEstimate>> =
            series.iter().map(|returns| self.var(returns)).collect();

        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                tracing::warn!(index, error = %e, "VaR batch item failed");
            }
        }

        results
    }

    fn check_observations(&self, returns: &[f64]) -> Result<()> {
        if returns.len() < self.config.min_observations {
            return Err(RiskError::InsufficientData(format!(
                "Need at least {} observations, got {}",
                self.config.min_observations,
                returns.len()
            )));
        }
        stats::validate_series(returns, 1)
    }
}
