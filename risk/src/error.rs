//! Error types for risk metric calculations

use thiserror::Error;

/// Errors that can occur while computing a risk metric
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    #[error("Invalid time horizon: {0} (must be positive)")]
    InvalidTimeHorizon(u32),

    #[error("Invalid probability: {0} (must be within [0, 1])")]
    InvalidProbability(f64),

    #[error("Series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("Division by zero in calculation: {0}")]
    DivisionByZero(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RiskError>;
