use approx::assert_relative_eq;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use price_forecast::generator::SeriesGenerator;
use price_forecast::{
    ForecastConfig, ForecastError, ForecastMethod, GeneratorConfig, PriceSeries, ProductId,
    SmoothingExtrapolation, TrendDirection, TrendPredictor,
};
use rstest::rstest;

fn series(prices: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    PriceSeries::from_prices(ProductId::new("Wheat"), start, prices).unwrap()
}

fn predictor() -> TrendPredictor {
    TrendPredictor::new(ForecastConfig::default()).unwrap()
}

#[test]
fn test_breakdown_of_rising_series() {
    let breakdown = predictor().breakdown(&series(&[10.0, 12.0, 14.0]), 2).unwrap();

    let linear: Vec<f64> = breakdown.linear.iter().map(|p| p.predicted_price).collect();
    let exponential: Vec<f64> = breakdown.exponential.iter().map(|p| p.predicted_price).collect();
    let blended: Vec<f64> = breakdown.blended.iter().map(|p| p.predicted_price).collect();

    assert_relative_eq!(linear[0], 16.0, epsilon = 1e-9);
    assert_relative_eq!(linear[1], 18.0, epsilon = 1e-9);
    assert_relative_eq!(exponential[0], 11.62, epsilon = 1e-9);
    assert_relative_eq!(exponential[1], 11.62, epsilon = 1e-9);
    assert_relative_eq!(blended[0], 13.81, epsilon = 1e-9);
    assert_relative_eq!(blended[1], 14.81, epsilon = 1e-9);
    assert_relative_eq!(breakdown.r_squared, 1.0, epsilon = 1e-9);
}

#[test]
fn test_predict_dates_follow_last_observation() {
    let forecast = predictor().predict(&series(&[10.0, 12.0, 14.0]), 3).unwrap();

    let dates: Vec<NaiveDate> = forecast.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        ]
    );
    assert!(forecast.iter().all(|p| p.method == ForecastMethod::Blended));
}

#[rstest]
#[case(13.5, -0.25, 20, 10)]
#[case(1.2, 0.03, 45, 7)]
#[case(80.0, 1.75, 3, 30)]
fn test_linear_series_forecast_on_the_line(
    #[case] a: f64,
    #[case] b: f64,
    #[case] n: usize,
    #[case] horizon: usize,
) {
    let prices: Vec<f64> = (0..n).map(|day| a + b * day as f64).collect();
    let data = series(&prices);
    let breakdown = predictor().breakdown(&data, horizon).unwrap();

    assert_eq!(breakdown.linear.len(), horizon);
    let mut expected_date = data.last_date().unwrap();
    for (h, point) in (1..=horizon).zip(&breakdown.linear) {
        let day = (n - 1 + h) as f64;
        assert_relative_eq!(point.predicted_price, a + b * day, epsilon = 1e-9);

        expected_date = expected_date.succ_opt().unwrap();
        assert_eq!(point.date, expected_date);
    }
    assert_relative_eq!(breakdown.r_squared, 1.0, epsilon = 1e-9);
}

#[rstest]
#[case(SmoothingExtrapolation::Flat)]
#[case(SmoothingExtrapolation::LastSlope)]
fn test_constant_series_forecasts_constant(#[case] extrapolation: SmoothingExtrapolation) {
    let config = ForecastConfig::default().with_extrapolation(extrapolation);
    let breakdown = TrendPredictor::new(config)
        .unwrap()
        .breakdown(&series(&[4.2; 10]), 5)
        .unwrap();

    for points in [&breakdown.linear, &breakdown.exponential, &breakdown.blended] {
        assert_eq!(points.len(), 5);
        for point in points {
            assert_relative_eq!(point.predicted_price, 4.2, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_prediction_is_deterministic() {
    let data = series(&[3.1, 2.9, 3.4, 3.3, 3.8, 3.6]);
    let p = predictor();
    assert_eq!(p.predict(&data, 7).unwrap(), p.predict(&data, 7).unwrap());
}

#[test]
fn test_blend_stays_between_components() {
    let data = series(&[5.0, 4.0, 6.5, 5.5, 7.0, 6.0, 8.0]);
    let breakdown = predictor().breakdown(&data, 4).unwrap();

    for ((l, e), b) in breakdown
        .linear
        .iter()
        .zip(&breakdown.exponential)
        .zip(&breakdown.blended)
    {
        let (low, high) = if l.predicted_price < e.predicted_price {
            (l.predicted_price, e.predicted_price)
        } else {
            (e.predicted_price, l.predicted_price)
        };
        assert!(b.predicted_price >= low - 1e-9 && b.predicted_price <= high + 1e-9);
    }
}

#[test]
fn test_weights_are_normalised() {
    let config = ForecastConfig::default().with_weights(3.0, 1.0);
    let p = TrendPredictor::new(config).unwrap();
    let blended = p.predict(&series(&[10.0, 12.0, 14.0]), 1).unwrap();

    // 0.75 * 16 + 0.25 * 11.62
    assert_relative_eq!(blended[0].predicted_price, 14.905, epsilon = 1e-9);
}

#[test]
fn test_linear_only_weights() {
    let config = ForecastConfig::default().with_weights(1.0, 0.0);
    let p = TrendPredictor::new(config).unwrap();
    let blended = p.predict(&series(&[10.0, 12.0, 14.0]), 2).unwrap();

    assert_relative_eq!(blended[0].predicted_price, 16.0, epsilon = 1e-9);
    assert_relative_eq!(blended[1].predicted_price, 18.0, epsilon = 1e-9);
}

#[test]
fn test_last_slope_extrapolation() {
    let config = ForecastConfig::default().with_extrapolation(SmoothingExtrapolation::LastSlope);
    let breakdown = TrendPredictor::new(config)
        .unwrap()
        .breakdown(&series(&[10.0, 12.0, 14.0]), 2)
        .unwrap();

    assert_relative_eq!(breakdown.exponential[0].predicted_price, 12.64, epsilon = 1e-9);
    assert_relative_eq!(breakdown.exponential[1].predicted_price, 13.66, epsilon = 1e-9);
}

#[test]
fn test_zero_horizon_is_configuration_error() {
    assert!(matches!(
        predictor().predict(&series(&[1.0, 2.0, 3.0]), 0),
        Err(ForecastError::ConfigurationError(_))
    ));
    // The horizon is checked before the data
    assert!(matches!(
        predictor().predict(&series(&[1.0]), 0),
        Err(ForecastError::ConfigurationError(_))
    ));
}

#[rstest]
#[case(&[])]
#[case(&[2.5])]
fn test_short_series_is_insufficient(#[case] prices: &[f64]) {
    assert!(matches!(
        predictor().predict(&series(prices), 3),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[rstest]
#[case(&[1.0, 1.1, 1.2, 1.3, 1.4], TrendDirection::Up)]
#[case(&[1.4, 1.3, 1.2, 1.1, 1.0], TrendDirection::Down)]
#[case(&[1.0, 1.005, 1.0, 1.005, 1.0], TrendDirection::Stable)]
#[case(&[1.0], TrendDirection::Stable)]
fn test_trend_direction(#[case] prices: &[f64], #[case] expected: TrendDirection) {
    assert_eq!(TrendDirection::from_prices(prices, 7, 0.01), expected);
}

#[test]
fn test_trend_direction_uses_recent_window() {
    // Falling overall, rising over the last three prices
    let prices = [9.0, 8.0, 7.0, 6.0, 6.5, 7.0];
    assert_eq!(TrendDirection::from_prices(&prices, 3, 0.01), TrendDirection::Up);
    assert_eq!(TrendDirection::from_prices(&prices, 6, 0.01), TrendDirection::Down);
}

#[test]
fn test_report_rounds_and_summarises() {
    let config = ForecastConfig::default().with_horizon(2);
    let report = TrendPredictor::new(config)
        .unwrap()
        .report(&series(&[10.0, 12.0, 14.0]))
        .unwrap();

    assert_eq!(report.product, ProductId::new("Wheat"));
    assert_eq!(report.forecast.len(), 2);
    assert_eq!(report.forecast[0].predicted_price, 13.81);
    assert_eq!(report.forecast[1].predicted_price, 14.81);
    assert_eq!(report.confidence, 1.0);
    assert_eq!(report.trend, TrendDirection::Up);
    assert_eq!(
        report.trend.recommendation(),
        "Prices are expected to rise - consider buying now"
    );
}

#[test]
fn test_report_on_generated_series() {
    let generator = SeriesGenerator::new(GeneratorConfig {
        seed: Some(7),
        ..GeneratorConfig::default()
    })
    .unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let data = generator.generate(&ProductId::new("Potatoes"), end).unwrap();

    let report = predictor().report(&data).unwrap();
    assert_eq!(report.forecast.len(), 7);
    assert_eq!(report.forecast[0].date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    assert!((0.0..=1.0).contains(&report.confidence));
    assert!(report.forecast.iter().all(|p| p.predicted_price.is_finite()));
}

#[test]
fn test_invalid_config_rejected() {
    for config in [
        ForecastConfig::default().with_horizon(0),
        ForecastConfig::default().with_smoothing_factor(0.0),
        ForecastConfig::default().with_smoothing_factor(1.2),
        ForecastConfig::default().with_weights(0.0, 0.0),
        ForecastConfig::default().with_weights(-1.0, 2.0),
    ] {
        assert!(matches!(
            TrendPredictor::new(config),
            Err(ForecastError::ConfigurationError(_))
        ));
    }
}
