//! Market analysis service
//!
//! [`PriceAnalyzer`] owns its store and settings; every operation works on
//! that explicit context.

use crate::classifier::{classify, Classification, ImageFeatures};
use crate::config::Settings;
use crate::data::{PriceSeries, ProductId};
use crate::error::{ForecastError, Result};
use crate::generator::{ProductProfile, SeriesGenerator, CATALOG};
use crate::predictor::{PriceForecastReport, TrendPredictor};
use crate::statistics::PriceStatistics;
use crate::store::{AnalysisRecord, PriceStore};
use crate::utils::round_cents;
use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};
use price_math::descriptive::mean_change;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::{info, warn};

/// Amplitude of the intraday price wave
const INTRADAY_AMPLITUDE: f64 = 0.002;
/// Deviation of the relative tick noise
const TICK_NOISE: f64 = 0.001;
/// Number of recent observations feeding the next-hour estimate
pub const NEXT_HOUR_LOOKBACK: usize = 12;
/// Days of history the forecast report is fitted on
pub const FORECAST_WINDOW_DAYS: u64 = 90;

/// Simulated live price of a product
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RealTimeQuote {
    pub current_price: f64,
    pub next_hour_prediction: f64,
    pub updated_at: NaiveDateTime,
}

/// Price history, statistics, forecasts and image analyses over a store
#[derive(Debug)]
pub struct PriceAnalyzer<S: PriceStore> {
    store: S,
    predictor: TrendPredictor,
    generator: SeriesGenerator,
}

impl<S: PriceStore> PriceAnalyzer<S> {
    pub fn new(store: S, settings: &Settings) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            store,
            predictor: TrendPredictor::new(settings.forecast.clone())?,
            generator: SeriesGenerator::new(settings.generator.clone())?,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn predictor(&self) -> &TrendPredictor {
        &self.predictor
    }

    /// Catalog products use their canonical name, anything else is kept as given
    pub fn resolve(&self, product: &str) -> ProductId {
        ProductProfile::find(product)
            .map(ProductProfile::product_id)
            .unwrap_or_else(|| ProductId::new(product))
    }

    /// Generate and record a history ending at `end` for every catalog
    /// product that has none yet; returns the number of observations stored
    pub fn ensure_sample_data(&mut self, end: NaiveDate) -> Result<usize> {
        let missing: Vec<ProductId> = CATALOG
            .iter()
            .map(ProductProfile::product_id)
            .filter(|product_id| !self.store.contains_product(product_id))
            .collect();

        let mut stored = 0;
        for series in self.generator.generate_all(&missing, end)? {
            stored += self.store.record_series(&series)?;
        }

        if stored > 0 {
            info!("Seeded store with {} sample observations", stored);
        }
        Ok(stored)
    }

    /// Record an externally sourced series
    pub fn import(&mut self, series: &PriceSeries) -> Result<usize> {
        self.store.record_series(series)
    }

    /// Observations of the `days` days up to and including `as_of`
    pub fn price_history(&self, product: &str, days: usize, as_of: NaiveDate) -> Result<PriceSeries> {
        if days == 0 {
            return Err(ForecastError::ConfigurationError(
                "History window must be at least one day".to_string(),
            ));
        }

        let from = as_of
            .checked_sub_days(Days::new(days as u64 - 1))
            .unwrap_or(NaiveDate::MIN);
        let history = self.store.history(&self.resolve(product), from, as_of)?;
        if history.is_empty() {
            warn!("No price records found for {}", product);
        }
        Ok(history)
    }

    pub fn price_statistics(&self, product: &str) -> Result<PriceStatistics> {
        let series = self.store.series(&self.resolve(product))?;
        if series.is_empty() {
            warn!("No price records found for {}", product);
        }
        PriceStatistics::from_series(&series)
    }

    /// Blended forecast fitted on the last [`FORECAST_WINDOW_DAYS`] days of
    /// stored history, counted back from the latest observation
    pub fn forecast_report(&self, product: &str) -> Result<PriceForecastReport> {
        let series = self.store.series(&self.resolve(product))?;
        let recent = match series.last_date() {
            Some(last) => {
                let from = last
                    .checked_sub_days(Days::new(FORECAST_WINDOW_DAYS - 1))
                    .unwrap_or(NaiveDate::MIN);
                series.between(from, last)
            }
            None => series,
        };
        self.predictor.report(&recent)
    }

    /// Latest price moved by an hour-of-day wave and random noise
    ///
    /// The next-hour estimate adds the mean daily change of the last
    /// [`NEXT_HOUR_LOOKBACK`] observations to the quote. That change is in
    /// $/kg, so it is added rather than applied as a growth rate. A product
    /// without observations quotes zero.
    pub fn real_time_quote<R: Rng + ?Sized>(
        &self,
        product: &str,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<RealTimeQuote> {
        let series = self.store.series(&self.resolve(product))?;
        let latest = match series.latest() {
            Some(observation) => observation.price(),
            None => {
                return Ok(RealTimeQuote {
                    current_price: 0.0,
                    next_hour_prediction: 0.0,
                    updated_at: now,
                })
            }
        };

        let noise = Normal::new(0.0, TICK_NOISE)
            .map_err(|e| ForecastError::ConfigurationError(e.to_string()))?;
        let time_factor = (f64::from(now.hour()) / 24.0 * 2.0 * PI).sin() * INTRADAY_AMPLITUDE;
        let current_price = round_cents(latest * (1.0 + time_factor + noise.sample(rng)));

        let recent: Vec<f64> = series
            .tail(NEXT_HOUR_LOOKBACK)
            .iter()
            .map(|o| o.price())
            .collect();
        let next_hour = current_price + mean_change(&recent).unwrap_or(0.0);

        Ok(RealTimeQuote {
            current_price,
            next_hour_prediction: round_cents(next_hour),
            updated_at: now,
        })
    }

    /// Classify an image and record the result against the detected crop
    pub fn analyze_image<R: Rng + ?Sized>(
        &mut self,
        features: &ImageFeatures,
        at: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Classification> {
        let classification = classify(features, rng)?;
        info!(
            "Classified image as {} ({}, {}, confidence {:.2})",
            classification.crop,
            classification.quality,
            classification.health,
            classification.confidence
        );

        self.store.record_analysis(AnalysisRecord {
            product: classification.crop.product_id(),
            classification,
            recorded_at: at,
        })?;

        Ok(classification)
    }
}
