//! Summary statistics over the most recent prices

use crate::data::PriceSeries;
use crate::error::Result;
use crate::utils::round_cents;
use price_math::descriptive::{percent_change, round_to};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Market snapshot of a product over its latest observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceStatistics {
    pub current_price: f64,
    pub average_price: f64,
    /// Percentage change versus the previous observation, one decimal
    pub price_change: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceStatistics {
    /// Number of recent observations summarised
    pub const LOOKBACK: usize = 30;

    /// Statistics of the last [`Self::LOOKBACK`] observations
    ///
    /// An empty series yields all zeros.
    pub fn from_series(series: &PriceSeries) -> Result<Self> {
        let prices: Vec<f64> = series
            .tail(Self::LOOKBACK)
            .iter()
            .map(|o| o.price())
            .collect();

        let (current, previous) = match prices.as_slice() {
            [] => return Ok(Self::default()),
            [.., previous, current] => (*current, Some(*previous)),
            [current] => (*current, None),
        };

        let price_change = match previous {
            Some(previous) => round_to(percent_change(previous, current)?, 1),
            None => 0.0,
        };

        Ok(Self {
            current_price: round_cents(current),
            average_price: round_cents(Statistics::mean(&prices)),
            price_change,
            min_price: round_cents(Statistics::min(&prices)),
            max_price: round_cents(Statistics::max(&prices)),
        })
    }
}
