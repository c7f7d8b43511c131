//! Exponential smoothing models for price forecasting

use crate::config::SmoothingExtrapolation;
use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastMethod, ForecastModel, TrainedForecastModel};
use crate::utils::validate_horizon;
use price_math::forecasting::ExponentialSmoothing as SmoothingKernel;
use tracing::debug;

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
    extrapolation: SmoothingExtrapolation,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    name: String,
    kernel: SmoothingKernel,
    extrapolation: SmoothingExtrapolation,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model holding its level flat
    pub fn new(alpha: f64) -> Result<Self> {
        // Validates the range once, up front.
        SmoothingKernel::new(alpha)?;

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
            extrapolation: SmoothingExtrapolation::Flat,
        })
    }

    pub fn with_extrapolation(mut self, extrapolation: SmoothingExtrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, series: &PriceSeries) -> Result<Self::Trained> {
        if series.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "No observations of {} to smooth",
                series.product_id()
            )));
        }

        let kernel = SmoothingKernel::fit(self.alpha, &series.prices())?;
        debug!(
            "Smoothed {} observations of {}: level={:.4}",
            kernel.values_seen(),
            series.product_id(),
            kernel.value()?
        );

        Ok(TrainedExponentialSmoothing {
            name: self.name.clone(),
            kernel,
            extrapolation: self.extrapolation,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedExponentialSmoothing {
    /// The last smoothed level
    pub fn level(&self) -> Result<f64> {
        Ok(self.kernel.value()?)
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        validate_horizon(horizon)?;

        match self.extrapolation {
            SmoothingExtrapolation::Flat => Ok(vec![self.kernel.forecast()?; horizon]),
            SmoothingExtrapolation::LastSlope => (1..=horizon)
                .map(|step| Ok(self.kernel.forecast_with_slope(step)?))
                .collect(),
        }
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::Exponential
    }

    fn name(&self) -> &str {
        &self.name
    }
}
