//! Forecasting kernels for daily price series
//!
//! Contains implementations of:
//! - Ordinary least-squares linear regression against the observation index
//! - Simple exponential smoothing with flat or slope extrapolation

use crate::{MathError, Result};

const EPSILON: f64 = 1e-10;

/// Ordinary least-squares fit of `value = intercept + slope * index`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    len: usize,
    r_squared: f64,
}

impl LinearRegression {
    /// Fit a regression line through `values`, using `0..values.len()` as x
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Linear regression needs at least 2 points, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Regression input contains non-finite values".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        if denominator.abs() < EPSILON {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let fitted = intercept + slope * i as f64;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - fitted).powi(2);
        }

        // A flat series is explained perfectly by a flat line.
        let r_squared = if ss_total < EPSILON {
            if ss_residual < EPSILON {
                1.0
            } else {
                0.0
            }
        } else {
            (1.0 - ss_residual / ss_total).clamp(0.0, 1.0)
        };

        Ok(Self {
            slope,
            intercept,
            len: values.len(),
            r_squared,
        })
    }

    /// Value of the fitted line at index `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Extrapolate `periods_ahead` steps past the last fitted point
    pub fn forecast(&self, periods_ahead: usize) -> f64 {
        self.predict((self.len + periods_ahead - 1) as f64)
    }

    /// Slope per index step
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Value of the line at index 0
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination of the fit, in `[0, 1]`
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Number of points the line was fitted on
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Simple exponential smoothing
///
/// The level starts at the first observation and is updated with
/// `level = alpha * value + (1 - alpha) * level` for each later one.
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
    previous_level: Option<f64>,
    values_seen: usize,
}

impl ExponentialSmoothing {
    /// Create a new Exponential Smoothing with the specified alpha, in `(0, 1]`
    pub fn new(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(MathError::InvalidInput(format!(
                "Alpha must be in (0, 1], got {}",
                alpha
            )));
        }

        Ok(Self {
            alpha,
            level: None,
            previous_level: None,
            values_seen: 0,
        })
    }

    /// Smooth a whole series in one go
    pub fn fit(alpha: f64, values: &[f64]) -> Result<Self> {
        let mut smoothing = Self::new(alpha)?;
        for &value in values {
            smoothing.update(value)?;
        }
        Ok(smoothing)
    }

    /// Update the level with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(
                "Cannot smooth a non-finite value".to_string(),
            ));
        }

        self.values_seen += 1;
        self.previous_level = self.level;
        self.level = Some(match self.level {
            None => value,
            Some(level) => self.alpha * value + (1.0 - self.alpha) * level,
        });

        Ok(())
    }

    /// Get the current smoothed value
    pub fn value(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Change between the last two smoothed levels (zero after a single value)
    pub fn slope(&self) -> Result<f64> {
        let level = self.value()?;
        Ok(self.previous_level.map_or(0.0, |previous| level - previous))
    }

    /// Forecast holding the last level flat
    pub fn forecast(&self) -> Result<f64> {
        self.value()
    }

    /// Forecast `periods_ahead` steps continuing the last smoothed slope
    pub fn forecast_with_slope(&self, periods_ahead: usize) -> Result<f64> {
        Ok(self.value()? + self.slope()? * periods_ahead as f64)
    }

    /// Get the current alpha value
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of values smoothed so far
    pub fn values_seen(&self) -> usize {
        self.values_seen
    }

    /// Reset the smoothing, clearing all state
    pub fn reset(&mut self) {
        self.level = None;
        self.previous_level = None;
        self.values_seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_regression() {
        let lr = LinearRegression::fit(&[10.0, 20.0, 30.0]).unwrap();

        assert!((lr.slope() - 10.0).abs() < 0.001);
        assert!((lr.intercept() - 10.0).abs() < 0.001);

        let forecast = lr.forecast(1);
        assert!((forecast - 40.0).abs() < 0.001);

        // Perfect linear data
        assert!(lr.r_squared() > 0.999);
    }

    #[test]
    fn test_linear_regression_noisy() {
        let lr = LinearRegression::fit(&[1.0, 3.0, 2.0, 4.0]).unwrap();

        assert!((lr.slope() - 0.8).abs() < 1e-9);
        assert!((lr.intercept() - 1.3).abs() < 1e-9);
        assert!((lr.r_squared() - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_linear_regression_constant_series() {
        let lr = LinearRegression::fit(&[5.0; 6]).unwrap();

        assert!(lr.slope().abs() < 1e-12);
        assert!((lr.forecast(3) - 5.0).abs() < 1e-12);
        assert_eq!(lr.r_squared(), 1.0);
    }

    #[test]
    fn test_linear_regression_rejects_short_input() {
        assert!(matches!(
            LinearRegression::fit(&[1.0]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearRegression::fit(&[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearRegression::fit(&[1.0, f64::NAN]),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_exponential_smoothing() {
        let mut es = ExponentialSmoothing::new(0.3).unwrap();

        es.update(10.0).unwrap(); // Initial level = 10
        assert!((es.value().unwrap() - 10.0).abs() < 0.001);
        assert_eq!(es.slope().unwrap(), 0.0);

        es.update(20.0).unwrap(); // New level = 0.3*20 + 0.7*10 = 13
        assert!((es.value().unwrap() - 13.0).abs() < 0.001);
        assert!((es.slope().unwrap() - 3.0).abs() < 0.001);

        assert!((es.forecast().unwrap() - 13.0).abs() < 0.001);
        assert!((es.forecast_with_slope(2).unwrap() - 19.0).abs() < 0.001);
    }

    #[test]
    fn test_exponential_smoothing_alpha_bounds() {
        assert!(ExponentialSmoothing::new(0.0).is_err());
        assert!(ExponentialSmoothing::new(-0.2).is_err());
        assert!(ExponentialSmoothing::new(1.5).is_err());
        assert!(ExponentialSmoothing::new(f64::NAN).is_err());

        // Alpha of one tracks the last observation exactly
        let es = ExponentialSmoothing::fit(1.0, &[3.0, 7.0, 11.0]).unwrap();
        assert_eq!(es.value().unwrap(), 11.0);
        assert_eq!(es.values_seen(), 3);
    }

    #[test]
    fn test_exponential_smoothing_empty_and_reset() {
        let mut es = ExponentialSmoothing::fit(0.5, &[4.0, 8.0]).unwrap();
        assert_eq!(es.value().unwrap(), 6.0);

        es.reset();
        assert!(matches!(es.value(), Err(MathError::InsufficientData(_))));
        assert_eq!(es.values_seen(), 0);
    }
}
