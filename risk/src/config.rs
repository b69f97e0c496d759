//! Risk calculation configuration
//!
//! Defaults applied by [`crate::RiskEngine`] when a caller does not pass
//! explicit parameters. Typically loaded from YAML or JSON files.

use crate::error::{Result, RiskError};
use crate::var::{validate_confidence, validate_horizon, VarMethod};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Risk engine configuration
///
/// Unknown keys are rejected so a misspelled field cannot silently fall
/// back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    /// Default VaR confidence level
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    /// Default VaR horizon in days
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,

    /// Default VaR methodology
    #[serde(default)]
    pub var_method: VarMethod,

    /// Return periods per year, used for annualizing volatility
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Minimum number of return observations the engine accepts
    #[serde(default = "default_min_observations")]
    pub min_observations: usize,

    /// Monte Carlo VaR settings
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
}

/// Monte Carlo VaR configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonteCarloConfig {
    /// Number of simulated horizon returns
    #[serde(default = "default_simulations")]
    pub simulations: usize,

    /// Random seed for reproducible runs (None = random)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            confidence_level: default_confidence_level(),
            horizon_days: default_horizon_days(),
            var_method: VarMethod::default(),
            periods_per_year: default_periods_per_year(),
            min_observations: default_min_observations(),
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            simulations: default_simulations(),
            seed: None,
        }
    }
}

impl RiskConfig {
    /// Parse and validate a YAML configuration
    ///
    /// # Example
    ///
    /// ```
    /// use riskcalc::{RiskConfig, VarMethod};
    ///
    /// let yaml = r#"
    /// confidence_level: 0.99
    /// var_method: parametric
    /// "#;
    ///
    /// let config = RiskConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.confidence_level, 0.99);
    /// assert_eq!(config.var_method, VarMethod::Parametric);
    /// assert_eq!(config.horizon_days, 1);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RiskConfig = serde_yaml::from_str(yaml)
            .map_err(|e| RiskError::Config(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RiskConfig = serde_json::from_str(json)
            .map_err(|e| RiskError::Config(format!("Failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RiskError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            Some("json") => Self::from_json(&contents),
            _ => Err(RiskError::Config(format!(
                "Unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Check every field is usable
    pub fn validate(&self) -> Result<()> {
        validate_confidence(self.confidence_level)?;
        validate_horizon(self.horizon_days)?;

        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(RiskError::Config(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }

        if self.min_observations == 0 {
            return Err(RiskError::Config(
                "min_observations must be at least 1".to_string(),
            ));
        }

        if self.monte_carlo.simulations == 0 {
            return Err(RiskError::Config(
                "monte_carlo.simulations must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_horizon_days() -> u32 {
    1
}

fn default_periods_per_year() -> f64 {
    252.0
}

fn default_min_observations() -> usize {
    1
}

fn default_simulations() -> usize {
    10_000
}
