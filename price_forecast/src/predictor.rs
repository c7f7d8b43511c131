//! Blended trend prediction
//!
//! The predictor trains a [`LinearTrend`] and an [`ExponentialSmoothing`]
//! model on the same series and combines their forecasts with the blend
//! weights of its [`ForecastConfig`].

use crate::config::ForecastConfig;
use crate::data::{PriceSeries, ProductId};
use crate::error::{ForecastError, Result};
use crate::models::exponential_smoothing::ExponentialSmoothing;
use crate::models::linear_trend::LinearTrend;
use crate::models::{ForecastMethod, ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::utils::validate_horizon;
use price_math::descriptive::{mean_change, round_to};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Direction of the recent price movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    /// Classify the mean daily change of the last `window` prices
    pub fn from_prices(prices: &[f64], window: usize, threshold: f64) -> Self {
        let recent = &prices[prices.len().saturating_sub(window)..];
        match mean_change(recent) {
            Ok(change) if change > threshold => TrendDirection::Up,
            Ok(change) if change < -threshold => TrendDirection::Down,
            _ => TrendDirection::Stable,
        }
    }

    /// Market advice shown next to the forecast
    pub fn recommendation(&self) -> &'static str {
        match self {
            TrendDirection::Up => "Prices are expected to rise - consider buying now",
            TrendDirection::Down => "Prices are expected to fall - consider waiting",
            TrendDirection::Stable => "Prices are expected to remain stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendDirection::Up => "Up",
            TrendDirection::Down => "Down",
            TrendDirection::Stable => "Stable",
        };
        f.write_str(name)
    }
}

/// Forecast points of every method for the same horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBreakdown {
    pub linear: Vec<ForecastPoint>,
    pub exponential: Vec<ForecastPoint>,
    pub blended: Vec<ForecastPoint>,
    /// Goodness of fit of the linear component
    pub r_squared: f64,
}

/// Forecast summary for a product dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceForecastReport {
    pub product: ProductId,
    /// Blended forecast, prices rounded to cents
    pub forecast: Vec<ForecastPoint>,
    /// R² of the trend line, rounded to two decimals
    pub confidence: f64,
    pub trend: TrendDirection,
}

/// Blends a linear trend and exponential smoothing into one forecast
#[derive(Debug, Clone)]
pub struct TrendPredictor {
    config: ForecastConfig,
    linear: LinearTrend,
    smoothing: ExponentialSmoothing,
    weights: (f64, f64),
}

impl TrendPredictor {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;

        let smoothing = ExponentialSmoothing::new(config.smoothing_factor)?
            .with_extrapolation(config.extrapolation);
        let weights = config.blend_weights()?;

        Ok(Self {
            config,
            linear: LinearTrend::new(),
            smoothing,
            weights,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Blended forecast for the `horizon` days after the last observation
    pub fn predict(&self, series: &PriceSeries, horizon: usize) -> Result<Vec<ForecastPoint>> {
        Ok(self.breakdown(series, horizon)?.blended)
    }

    /// Linear, exponential and blended forecasts for the same horizon
    pub fn breakdown(&self, series: &PriceSeries, horizon: usize) -> Result<ForecastBreakdown> {
        validate_horizon(horizon)?;

        let last_date = match series.last_date() {
            Some(date) if series.len() >= 2 => date,
            _ => {
                return Err(ForecastError::InsufficientData(format!(
                    "Forecasting {} needs at least 2 observations, got {}",
                    series.product_id(),
                    series.len()
                )))
            }
        };

        let trend = self.linear.train(series)?;
        let smoothed = self.smoothing.train(series)?;

        let linear = trend.forecast_points(last_date, horizon)?;
        let exponential = smoothed.forecast_points(last_date, horizon)?;

        let (linear_weight, smoothing_weight) = self.weights;
        let blended = linear
            .iter()
            .zip(&exponential)
            .map(|(l, e)| ForecastPoint {
                date: l.date,
                predicted_price: linear_weight * l.predicted_price
                    + smoothing_weight * e.predicted_price,
                method: ForecastMethod::Blended,
            })
            .collect();

        debug!(
            "Forecast {} days of {} after {}",
            horizon,
            series.product_id(),
            last_date
        );

        Ok(ForecastBreakdown {
            linear,
            exponential,
            blended,
            r_squared: trend.r_squared(),
        })
    }

    /// Dashboard summary over the configured horizon
    pub fn report(&self, series: &PriceSeries) -> Result<PriceForecastReport> {
        let breakdown = self.breakdown(series, self.config.horizon)?;
        let trend = TrendDirection::from_prices(
            &series.prices(),
            self.config.trend_window,
            self.config.trend_threshold,
        );

        let report = PriceForecastReport {
            product: series.product_id().clone(),
            forecast: breakdown.blended.iter().map(ForecastPoint::rounded).collect(),
            confidence: round_to(breakdown.r_squared, 2),
            trend,
        };

        info!(
            "Forecast report for {}: trend={} confidence={:.2}",
            report.product, report.trend, report.confidence
        );

        Ok(report)
    }
}
