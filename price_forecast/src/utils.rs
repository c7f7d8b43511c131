//! Utility functions for the price_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};

/// Convert a signed day count from user input into a positive count
pub fn positive_days(value: i64, name: &str) -> Result<usize> {
    if value <= 0 {
        return Err(ForecastError::ConfigurationError(format!(
            "{} must be a positive number of days, got {}",
            name, value
        )));
    }
    usize::try_from(value).map_err(|_| {
        ForecastError::ConfigurationError(format!("{} is too large: {}", name, value))
    })
}

/// Reject a zero forecast horizon
pub fn validate_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::ConfigurationError(
            "Horizon must be at least one day".to_string(),
        ));
    }
    Ok(())
}

/// The `horizon` calendar days strictly following `last_date`
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last_date.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Forecast date overflows {} days after {}",
                    offset, last_date
                ))
            })
        })
        .collect()
}

/// Round a price to cents for display
pub fn round_cents(value: f64) -> f64 {
    price_math::descriptive::round_to(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_dates_cross_month_boundary() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let dates = future_dates(last, 3).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            ]
        );
        assert!(future_dates(last, 0).unwrap().is_empty());
    }

    #[test]
    fn test_future_dates_overflow() {
        assert!(matches!(
            future_dates(NaiveDate::MAX, 1),
            Err(ForecastError::DataError(_))
        ));
    }

    #[test]
    fn test_positive_days() {
        assert_eq!(positive_days(7, "horizon").unwrap(), 7);
        assert!(matches!(
            positive_days(0, "horizon"),
            Err(ForecastError::ConfigurationError(_))
        ));
        assert!(matches!(
            positive_days(-3, "window"),
            Err(ForecastError::ConfigurationError(_))
        ));
    }
}
