//! # Price Forecast
//!
//! Price-trend estimation for agricultural products.
//!
//! ## Features
//!
//! - Synthetic daily price histories anchored on a product catalog
//! - Linear trend and exponential smoothing forecasts, blended with
//!   configurable weights
//! - Dashboard summaries: statistics, trend direction, simulated live quotes
//! - A rule-based mock classifier for product images
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use price_forecast::{ForecastConfig, PriceSeries, ProductId, TrendPredictor};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let series = PriceSeries::from_prices(ProductId::new("Wheat"), start, &[10.0, 12.0, 14.0])?;
//!
//! let predictor = TrendPredictor::new(ForecastConfig::default())?;
//! let forecast = predictor.predict(&series, 2)?;
//!
//! assert_eq!(forecast.len(), 2);
//! assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2024, 5, 4).unwrap());
//! # Ok::<(), price_forecast::ForecastError>(())
//! ```

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod generator;
pub mod models;
pub mod predictor;
pub mod statistics;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use crate::analyzer::{PriceAnalyzer, RealTimeQuote};
pub use crate::config::{ForecastConfig, GeneratorConfig, Settings, SmoothingExtrapolation};
pub use crate::data::{DataLoader, PriceObservation, PriceSeries, ProductId};
pub use crate::error::{ForecastError, Result};
pub use crate::generator::{ProductProfile, SeriesGenerator};
pub use crate::models::{ForecastMethod, ForecastModel, ForecastPoint, TrainedForecastModel};
pub use crate::predictor::{ForecastBreakdown, PriceForecastReport, TrendDirection, TrendPredictor};
pub use crate::statistics::PriceStatistics;
pub use crate::store::{InMemoryPriceStore, PriceStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
