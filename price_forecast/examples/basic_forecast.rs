use chrono::NaiveDate;
use price_forecast::generator::SeriesGenerator;
use price_forecast::{
    ForecastConfig, GeneratorConfig, PriceStatistics, ProductId, SmoothingExtrapolation,
    TrendPredictor,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Basic Forecasting Example");
    println!("=========================\n");

    // Generate 90 days of synthetic corn prices
    let generator = SeriesGenerator::new(GeneratorConfig {
        seed: Some(42),
        ..GeneratorConfig::default()
    })?;
    let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let series = generator.generate(&ProductId::new("Corn"), end)?;

    let stats = PriceStatistics::from_series(&series)?;
    println!(
        "Corn: ${:.2}/kg now, ${:.2} average, {:+.1}% on the day\n",
        stats.current_price, stats.average_price, stats.price_change
    );

    // Compare flat and sloped smoothing
    for extrapolation in [SmoothingExtrapolation::Flat, SmoothingExtrapolation::LastSlope] {
        let config = ForecastConfig::default()
            .with_horizon(5)
            .with_extrapolation(extrapolation);
        let predictor = TrendPredictor::new(config)?;
        let breakdown = predictor.breakdown(&series, 5)?;

        println!("Smoothing extrapolation: {:?}", extrapolation);
        println!("{:<12} {:>8} {:>12} {:>8}", "date", "linear", "exponential", "blended");
        for ((l, e), b) in breakdown
            .linear
            .iter()
            .zip(&breakdown.exponential)
            .zip(&breakdown.blended)
        {
            println!(
                "{:<12} {:>8.2} {:>12.2} {:>8.2}",
                l.date.to_string(),
                l.predicted_price,
                e.predicted_price,
                b.predicted_price
            );
        }
        println!("R² of the trend line: {:.2}\n", breakdown.r_squared);
    }

    let report = TrendPredictor::new(ForecastConfig::default())?.report(&series)?;
    println!("Trend: {} - {}", report.trend, report.trend.recommendation());

    Ok(())
}
