//! # Price Math
//!
//! Numerical kernels behind the price forecasts: least-squares trend lines,
//! exponential smoothing and a few descriptive helpers.

use thiserror::Error;

pub mod descriptive;
pub mod forecasting;

pub use forecasting::{ExponentialSmoothing, LinearRegression};

/// Errors that can occur in price calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for price math operations
pub type Result<T> = std::result::Result<T, MathError>;
