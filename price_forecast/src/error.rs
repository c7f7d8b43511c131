//! Error types for the price_forecast crate

use price_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Invalid parameters: non-positive window or horizon, bad smoothing
    /// factor or blend weights, unknown products, malformed settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Fewer observations than the chosen method needs
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Invalid observations such as duplicate dates or non-positive prices
    #[error("Data error: {0}")]
    DataError(String),

    /// Numerical failure inside a forecasting kernel
    #[error("Math error: {0}")]
    MathError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::ConfigurationError(msg),
            MathError::CalculationError(msg) => ForecastError::MathError(msg),
        }
    }
}
