//! Small descriptive helpers shared by the price crates

use crate::{MathError, Result};

/// Mean of the day-over-day changes of `values`
pub fn mean_change(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(
            "Need at least 2 values to measure change".to_string(),
        ));
    }

    let total: f64 = values.windows(2).map(|w| w[1] - w[0]).sum();
    Ok(total / (values.len() - 1) as f64)
}

/// Percentage change from `previous` to `current`
pub fn percent_change(previous: f64, current: f64) -> Result<f64> {
    if previous == 0.0 || !previous.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Cannot compute a percentage change from {}",
            previous
        )));
    }
    Ok((current - previous) / previous * 100.0)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
