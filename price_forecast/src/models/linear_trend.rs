//! Least-squares trend line over the observation index

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastMethod, ForecastModel, TrainedForecastModel};
use crate::utils::validate_horizon;
use price_math::LinearRegression;
use tracing::{debug, warn};

/// Fits explaining less of the variance than this are logged as weak
const WEAK_FIT_R_SQUARED: f64 = 0.1;

/// Linear trend model
#[derive(Debug, Clone)]
pub struct LinearTrend {
    name: String,
}

/// Trained linear trend model
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    name: String,
    regression: LinearRegression,
}

impl LinearTrend {
    pub fn new() -> Self {
        Self {
            name: "Linear Trend".to_string(),
        }
    }
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, series: &PriceSeries) -> Result<Self::Trained> {
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Linear trend needs at least 2 observations of {}, got {}",
                series.product_id(),
                series.len()
            )));
        }

        let regression = LinearRegression::fit(&series.prices())?;
        debug!(
            "Fitted trend for {}: intercept={:.4} slope={:.4} r2={:.4}",
            series.product_id(),
            regression.intercept(),
            regression.slope(),
            regression.r_squared()
        );
        if regression.r_squared() < WEAK_FIT_R_SQUARED {
            warn!(
                "Weak trend for {}: the line explains {:.1}% of the variance",
                series.product_id(),
                regression.r_squared() * 100.0
            );
        }

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            regression,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearTrend {
    /// Price change per day
    pub fn slope(&self) -> f64 {
        self.regression.slope()
    }

    pub fn intercept(&self) -> f64 {
        self.regression.intercept()
    }

    /// Share of the price variance explained by the line
    pub fn r_squared(&self) -> f64 {
        self.regression.r_squared()
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        validate_horizon(horizon)?;
        Ok((1..=horizon)
            .map(|step| self.regression.forecast(step))
            .collect())
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::Linear
    }

    fn name(&self) -> &str {
        &self.name
    }
}
