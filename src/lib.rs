//! # Agri Analyzer
//!
//! `agri_analyzer` bundles the workspace crates behind one dependency:
//!
//! - [`math`]: regression and smoothing kernels (`price_math`)
//! - [`forecast`]: price series, forecasting and market summaries
//!   (`price_forecast`)
//!
//! ## Example
//!
//! ```
//! use agri_analyzer::forecast::{InMemoryPriceStore, PriceAnalyzer, Settings};
//! use chrono::NaiveDate;
//!
//! let mut settings = Settings::default();
//! settings.generator.seed = Some(7);
//!
//! let mut analyzer = PriceAnalyzer::new(InMemoryPriceStore::new(), &settings)?;
//! analyzer.ensure_sample_data(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())?;
//!
//! let report = analyzer.forecast_report("rice")?;
//! assert_eq!(report.forecast.len(), 7);
//! # Ok::<(), agri_analyzer::forecast::ForecastError>(())
//! ```

pub use price_forecast as forecast;
pub use price_math as math;

/// Catalog product names known to the generator and the classifier
pub fn product_names() -> Vec<&'static str> {
    forecast::generator::CATALOG.iter().map(|p| p.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_names() {
        let names = product_names();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "Rice");
        assert!(names.contains(&"Oranges"));
    }

    #[test]
    fn test_reexports() {
        let trend = math::LinearRegression::fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!((trend.slope() - 1.0).abs() < 1e-12);
        assert_eq!(forecast::NAME, "price_forecast");
    }
}
