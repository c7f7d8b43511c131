use chrono::Local;
use clap::Parser;
use price_forecast::{
    utils::positive_days, DataLoader, InMemoryPriceStore, PriceAnalyzer, PriceForecastReport,
    PriceStatistics, RealTimeQuote, Result, Settings,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Market dashboard for one agricultural product
#[derive(Parser, Debug)]
#[command(author, version, about = "Price statistics and forecasts for agricultural products")]
struct Args {
    /// Product name, e.g. Wheat
    product: String,

    /// Days to forecast
    #[arg(long, allow_negative_numbers = true)]
    horizon: Option<i64>,

    /// Days of history to generate
    #[arg(long, allow_negative_numbers = true)]
    days: Option<i64>,

    /// Exponential smoothing factor in (0, 1]
    #[arg(long)]
    alpha: Option<f64>,

    /// Seed for the synthetic history
    #[arg(long)]
    seed: Option<u64>,

    /// Read the history from a date,price CSV instead
    #[arg(long)]
    csv: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the dashboard as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Layer CLI overrides on top of file and environment settings
    fn settings(&self) -> Result<Settings> {
        let settings = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };
        let mut settings = settings.apply_env()?;

        if let Some(horizon) = self.horizon {
            settings.forecast.horizon = positive_days(horizon, "horizon")?;
        }
        if let Some(days) = self.days {
            settings.generator.window_days = positive_days(days, "days")?;
        }
        if let Some(alpha) = self.alpha {
            settings.forecast.smoothing_factor = alpha;
        }
        if let Some(seed) = self.seed {
            settings.generator.seed = Some(seed);
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Serialize)]
struct Dashboard {
    statistics: PriceStatistics,
    quote: RealTimeQuote,
    report: PriceForecastReport,
    recommendation: &'static str,
}

fn run(args: &Args) -> Result<Dashboard> {
    let settings = args.settings()?;
    let mut analyzer = PriceAnalyzer::new(InMemoryPriceStore::new(), &settings)?;
    let now = Local::now().naive_local();
    let product = analyzer.resolve(&args.product);

    match &args.csv {
        Some(path) => {
            let series = DataLoader::from_csv(path, product.clone())?;
            info!("Loaded {} observations from {}", series.len(), path.display());
            analyzer.import(&series)?;
        }
        None => {
            analyzer.ensure_sample_data(now.date())?;
        }
    }

    let statistics = analyzer.price_statistics(product.as_str())?;
    let quote = analyzer.real_time_quote(product.as_str(), now, &mut rand::thread_rng())?;
    let report = analyzer.forecast_report(product.as_str())?;

    Ok(Dashboard {
        statistics,
        quote,
        recommendation: report.trend.recommendation(),
        report,
    })
}

fn print_dashboard(dashboard: &Dashboard) {
    let stats = &dashboard.statistics;
    let report = &dashboard.report;

    println!("{} market insights", report.product);
    println!("  Current price:   ${:.2}/kg ({:+.1}%)", stats.current_price, stats.price_change);
    println!("  30-day average:  ${:.2}/kg", stats.average_price);
    println!("  30-day range:    ${:.2} - ${:.2}/kg", stats.min_price, stats.max_price);
    println!(
        "  Real-time price: ${:.2}/kg (next hour ${:.2}/kg)",
        dashboard.quote.current_price, dashboard.quote.next_hour_prediction
    );
    println!();
    println!(
        "Forecast: trend {} (confidence {:.1}%)",
        report.trend,
        report.confidence * 100.0
    );
    for point in &report.forecast {
        println!("  {}  ${:>8.2}  {}", point.date, point.predicted_price, point.method);
    }
    println!();
    println!("{}", dashboard.recommendation);
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("price_forecast=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(dashboard) if args.json => match serde_json::to_string_pretty(&dashboard) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to encode dashboard: {}", e);
                process::exit(1);
            }
        },
        Ok(dashboard) => print_dashboard(&dashboard),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
