//! Forecasting models for daily price series

use crate::data::PriceSeries;
use crate::error::Result;
use crate::utils::{future_dates, round_cents};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Which model produced a forecast value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    Linear,
    Exponential,
    Blended,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ForecastMethod::Linear => "linear",
            ForecastMethod::Exponential => "exponential",
            ForecastMethod::Blended => "blended",
        };
        f.write_str(name)
    }
}

/// A predicted price for one future day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
    pub method: ForecastMethod,
}

impl ForecastPoint {
    /// Copy of the point with its price rounded to cents
    pub fn rounded(&self) -> Self {
        Self {
            predicted_price: round_cents(self.predicted_price),
            ..*self
        }
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast values for the `horizon` days after the training window
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// The method tag attached to this model's points
    fn method(&self) -> ForecastMethod;

    /// Name of the model
    fn name(&self) -> &str;

    /// Forecast points dated on the days following `last_date`
    fn forecast_points(&self, last_date: NaiveDate, horizon: usize) -> Result<Vec<ForecastPoint>> {
        let values = self.forecast(horizon)?;
        let dates = future_dates(last_date, horizon)?;
        Ok(dates
            .into_iter()
            .zip(values)
            .map(|(date, predicted_price)| ForecastPoint {
                date,
                predicted_price,
                method: self.method(),
            })
            .collect())
    }
}

/// Forecast model that can be trained on a price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a price series
    fn train(&self, series: &PriceSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod exponential_smoothing;
pub mod linear_trend;
