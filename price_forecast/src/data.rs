//! Price observations and series handling for forecasting

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Identifier of an agricultural product, e.g. `"Wheat"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A recorded daily price of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceObservation {
    date: NaiveDate,
    price: f64,
    product_id: ProductId,
}

impl PriceObservation {
    /// Create an observation; the price must be finite and positive
    pub fn new(date: NaiveDate, price: f64, product_id: ProductId) -> Result<Self> {
        if !price.is_finite() || price <= 0.0 {
            return Err(ForecastError::DataError(format!(
                "Price of {} on {} must be positive, got {}",
                product_id, date, price
            )));
        }

        Ok(Self {
            date,
            price,
            product_id,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }
}

/// Date-ordered observations of a single product with no duplicate dates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    product_id: ProductId,
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    /// Build a series, sorting by date
    ///
    /// Fails when an observation belongs to another product or when two
    /// observations share a date.
    pub fn new(product_id: ProductId, mut observations: Vec<PriceObservation>) -> Result<Self> {
        if let Some(foreign) = observations.iter().find(|o| o.product_id != product_id) {
            return Err(ForecastError::DataError(format!(
                "Observation for {} found in series of {}",
                foreign.product_id, product_id
            )));
        }

        observations.sort_by_key(|o| o.date);

        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ForecastError::DataError(format!(
                "Duplicate observation for {} on {}",
                product_id, pair[0].date
            )));
        }

        Ok(Self {
            product_id,
            observations,
        })
    }

    /// A series with no observations
    pub fn empty(product_id: ProductId) -> Self {
        Self {
            product_id,
            observations: Vec::new(),
        }
    }

    /// Build a series of consecutive days starting at `start`
    pub fn from_prices(product_id: ProductId, start: NaiveDate, prices: &[f64]) -> Result<Self> {
        let observations = prices
            .iter()
            .enumerate()
            .map(|(offset, &price)| {
                let date = start
                    .checked_add_days(Days::new(offset as u64))
                    .ok_or_else(|| {
                        ForecastError::DataError(format!("Date overflow after {}", start))
                    })?;
                PriceObservation::new(date, price, product_id.clone())
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(product_id, observations)
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Get the prices as a vector
    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    pub fn latest(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    /// The most recent `n` observations, oldest first
    pub fn tail(&self, n: usize) -> &[PriceObservation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    /// Observations dated within `from..=to`
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            product_id: self.product_id.clone(),
            observations: self
                .observations
                .iter()
                .filter(|o| o.date >= from && o.date <= to)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    price: f64,
}

/// Reads and writes `date,price` CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a price series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, product_id: ProductId) -> Result<PriceSeries> {
        let file = File::open(path)?;
        Self::from_reader(file, product_id)
    }

    /// Load a price series from any CSV source with `date` and `price` columns
    pub fn from_reader<R: Read>(reader: R, product_id: ProductId) -> Result<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?;
        for required in ["date", "price"] {
            if !headers.iter().any(|h| h == required) {
                return Err(ForecastError::DataError(format!(
                    "CSV is missing the `{}` column",
                    required
                )));
            }
        }

        let mut observations = Vec::new();
        for row in csv_reader.deserialize() {
            let row: CsvRow = row?;
            observations.push(PriceObservation::new(row.date, row.price, product_id.clone())?);
        }

        PriceSeries::new(product_id, observations)
    }

    /// Write a price series to a CSV file
    pub fn to_csv<P: AsRef<Path>>(series: &PriceSeries, path: P) -> Result<()> {
        let file = File::create(path)?;
        Self::to_writer(series, file)
    }

    pub fn to_writer<W: Write>(series: &PriceSeries, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for observation in series.observations() {
            csv_writer.serialize(CsvRow {
                date: observation.date,
                price: observation.price,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
