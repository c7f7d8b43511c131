//! Synthetic daily price history
//!
//! Prices are anchored on a per-product base price and move with a yearly
//! seasonal wave, a linear drift and Gaussian noise, clamped to a band
//! around the base.

use crate::config::GeneratorConfig;
use crate::data::{PriceObservation, PriceSeries, ProductId};
use crate::error::{ForecastError, Result};
use crate::utils::round_cents;
use chrono::{Datelike, Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use tracing::{debug, info};

/// Amplitude of the seasonal wave, relative to the base price
const SEASONAL_AMPLITUDE: f64 = 0.15;
const PRICE_FLOOR: f64 = 0.7;
const PRICE_CEILING: f64 = 1.5;

/// Market profile of a product the generator knows about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductProfile {
    pub name: &'static str,
    /// Base price in $/kg
    pub base_price: f64,
    /// Phase of the seasonal wave, in days
    pub seasonal_shift: u32,
    /// Relative volatility; the daily noise has a third of it as deviation
    pub volatility: f64,
}

pub const CATALOG: [ProductProfile; 8] = [
    ProductProfile { name: "Rice", base_price: 2.50, seasonal_shift: 90, volatility: 0.10 },
    ProductProfile { name: "Wheat", base_price: 1.80, seasonal_shift: 60, volatility: 0.12 },
    ProductProfile { name: "Corn", base_price: 1.50, seasonal_shift: 30, volatility: 0.15 },
    ProductProfile { name: "Soybeans", base_price: 2.20, seasonal_shift: 45, volatility: 0.13 },
    ProductProfile { name: "Tomatoes", base_price: 3.50, seasonal_shift: 0, volatility: 0.20 },
    ProductProfile { name: "Potatoes", base_price: 1.20, seasonal_shift: 120, volatility: 0.15 },
    ProductProfile { name: "Apples", base_price: 2.80, seasonal_shift: 180, volatility: 0.18 },
    ProductProfile { name: "Oranges", base_price: 2.60, seasonal_shift: 150, volatility: 0.16 },
];

impl ProductProfile {
    /// Case-insensitive catalog lookup
    pub fn find(name: &str) -> Option<&'static ProductProfile> {
        let name = name.trim();
        CATALOG.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Catalog lookup failing with a configuration error
    pub fn lookup(product_id: &ProductId) -> Result<&'static ProductProfile> {
        Self::find(product_id.as_str()).ok_or_else(|| {
            ForecastError::ConfigurationError(format!("Unknown product: {}", product_id))
        })
    }

    pub fn product_id(&self) -> ProductId {
        ProductId::new(self.name)
    }

    /// Lowest and highest price the generator may emit
    pub fn price_band(&self) -> (f64, f64) {
        (self.base_price * PRICE_FLOOR, self.base_price * PRICE_CEILING)
    }

    fn seasonal_factor(&self, date: NaiveDate) -> f64 {
        let phase = (date.ordinal() + self.seasonal_shift) as f64;
        SEASONAL_AMPLITUDE * (2.0 * PI * phase / 365.0).sin()
    }
}

/// Generates synthetic daily price series
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    config: GeneratorConfig,
}

impl SeriesGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the configured window ending at `end`
    ///
    /// Uses the configured seed, or fresh entropy when none is set.
    pub fn generate(&self, product_id: &ProductId, end: NaiveDate) -> Result<PriceSeries> {
        self.generate_with_rng(product_id, self.config.window_days, end, &mut self.rng())
    }

    /// Generate the configured window for several products from one RNG
    /// stream, so a seeded run still gives each product its own noise
    pub fn generate_all<'a, I>(&self, products: I, end: NaiveDate) -> Result<Vec<PriceSeries>>
    where
        I: IntoIterator<Item = &'a ProductId>,
    {
        let mut rng = self.rng();
        products
            .into_iter()
            .map(|product_id| {
                self.generate_with_rng(product_id, self.config.window_days, end, &mut rng)
            })
            .collect()
    }

    /// RNG from the configured seed, or fresh entropy when none is set
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Generate `window_days` consecutive observations ending at `end`
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        product_id: &ProductId,
        window_days: usize,
        end: NaiveDate,
        rng: &mut R,
    ) -> Result<PriceSeries> {
        if window_days == 0 {
            return Err(ForecastError::ConfigurationError(
                "Window must be at least one day".to_string(),
            ));
        }

        let profile = ProductProfile::lookup(product_id)?;
        let start = end
            .checked_sub_days(Days::new(window_days as u64 - 1))
            .ok_or_else(|| {
                ForecastError::ConfigurationError(format!(
                    "Window of {} days reaches before the calendar starts",
                    window_days
                ))
            })?;

        let noise = Normal::new(0.0, profile.volatility / 3.0)
            .map_err(|e| ForecastError::ConfigurationError(e.to_string()))?;
        let (floor, ceiling) = profile.price_band();
        let product_id = profile.product_id();

        debug!(
            "Generating {} days of {} prices from {} to {}",
            window_days, product_id, start, end
        );

        let mut observations = Vec::with_capacity(window_days);
        for (offset, date) in start.iter_days().take(window_days).enumerate() {
            let seasonal = profile.seasonal_factor(date);
            let trend = self.config.annual_drift * offset as f64 / 365.0;
            let price = profile.base_price * (1.0 + seasonal + trend + noise.sample(rng));
            let price = round_cents(price.clamp(floor, ceiling));

            observations.push(PriceObservation::new(date, price, product_id.clone())?);
        }

        info!(
            "Generated {} observations for {}",
            observations.len(),
            product_id
        );

        PriceSeries::new(product_id, observations)
    }
}
