//! Storage collaborator for observations and classification results

use crate::classifier::Classification;
use crate::data::{PriceObservation, PriceSeries, ProductId};
use crate::error::{ForecastError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// A stored classification of an uploaded product image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub product: ProductId,
    pub classification: Classification,
    pub recorded_at: NaiveDateTime,
}

/// Persistence of price observations and analyses
///
/// Observations are append-only: a second observation for the same product
/// and date is rejected.
pub trait PriceStore {
    /// Record one observation
    fn record(&mut self, observation: PriceObservation) -> Result<()>;

    /// All observations of a product, oldest first
    fn series(&self, product: &ProductId) -> Result<PriceSeries>;

    /// Products with at least one observation
    fn products(&self) -> Vec<ProductId>;

    fn record_analysis(&mut self, record: AnalysisRecord) -> Result<()>;

    /// Analyses of a product, in recording order
    fn analyses(&self, product: &ProductId) -> Vec<AnalysisRecord>;

    /// Record a whole series, returning how many observations were stored
    fn record_series(&mut self, series: &PriceSeries) -> Result<usize> {
        for observation in series.observations() {
            self.record(observation.clone())?;
        }
        Ok(series.len())
    }

    /// Observations dated within `from..=to`
    fn history(&self, product: &ProductId, from: NaiveDate, to: NaiveDate) -> Result<PriceSeries> {
        Ok(self.series(product)?.between(from, to))
    }

    fn latest(&self, product: &ProductId) -> Result<Option<PriceObservation>> {
        Ok(self.series(product)?.latest().cloned())
    }

    fn contains_product(&self, product: &ProductId) -> bool {
        self.products().contains(product)
    }
}

/// In-process store backed by ordered maps
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceStore {
    prices: BTreeMap<ProductId, BTreeMap<NaiveDate, PriceObservation>>,
    analyses: Vec<AnalysisRecord>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored observations
    pub fn observation_count(&self) -> usize {
        self.prices.values().map(BTreeMap::len).sum()
    }
}

impl PriceStore for InMemoryPriceStore {
    fn record(&mut self, observation: PriceObservation) -> Result<()> {
        let by_date = self
            .prices
            .entry(observation.product_id().clone())
            .or_default();

        if by_date.contains_key(&observation.date()) {
            return Err(ForecastError::DataError(format!(
                "{} already has a price recorded on {}",
                observation.product_id(),
                observation.date()
            )));
        }

        by_date.insert(observation.date(), observation);
        Ok(())
    }

    /// All or nothing: a clash on any date leaves the store untouched
    fn record_series(&mut self, series: &PriceSeries) -> Result<usize> {
        if let Some(by_date) = self.prices.get(series.product_id()) {
            if let Some(clash) = series
                .observations()
                .iter()
                .find(|o| by_date.contains_key(&o.date()))
            {
                return Err(ForecastError::DataError(format!(
                    "{} already has a price recorded on {}",
                    series.product_id(),
                    clash.date()
                )));
            }
        }

        let by_date = self.prices.entry(series.product_id().clone()).or_default();
        for observation in series.observations() {
            by_date.insert(observation.date(), observation.clone());
        }
        Ok(series.len())
    }

    fn series(&self, product: &ProductId) -> Result<PriceSeries> {
        match self.prices.get(product) {
            Some(by_date) => PriceSeries::new(product.clone(), by_date.values().cloned().collect()),
            None => Ok(PriceSeries::empty(product.clone())),
        }
    }

    fn products(&self) -> Vec<ProductId> {
        self.prices
            .iter()
            .filter(|(_, by_date)| !by_date.is_empty())
            .map(|(product, _)| product.clone())
            .collect()
    }

    fn record_analysis(&mut self, record: AnalysisRecord) -> Result<()> {
        self.analyses.push(record);
        Ok(())
    }

    fn analyses(&self, product: &ProductId) -> Vec<AnalysisRecord> {
        self.analyses
            .iter()
            .filter(|r| &r.product == product)
            .cloned()
            .collect()
    }
}
