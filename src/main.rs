use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use house_price::config::{DEFAULT_CITY, DEFAULT_COLUMNS_FILE, DEFAULT_DATASET_FILE, DEFAULT_MODEL_FILE};
use house_price::{Config, Estimator, HouseFeatures, RecommenderConfig};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "house-price")]
#[command(about = "Estimate a house price and find locations with a similar price per square foot")]
#[command(version)]
struct Cli {
    /// Reference dataset (CSV)
    #[arg(long, env = "HOUSE_PRICE_DATASET", default_value = DEFAULT_DATASET_FILE, global = true)]
    dataset: PathBuf,

    /// Trained model artifact (JSON)
    #[arg(long, env = "HOUSE_PRICE_MODEL", default_value = DEFAULT_MODEL_FILE, global = true)]
    model: PathBuf,

    /// Column list the model was trained on (JSON)
    #[arg(long, env = "HOUSE_PRICE_COLUMNS", default_value = DEFAULT_COLUMNS_FILE, global = true)]
    columns: PathBuf,

    /// City appended to map search links
    #[arg(long, env = "HOUSE_PRICE_CITY", default_value = DEFAULT_CITY, global = true)]
    city: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict a price and list comparable locations
    Predict(PredictArgs),
    /// List the accepted locations, area types and availabilities
    Options,
}

#[derive(Args)]
struct PredictArgs {
    #[arg(long)]
    location: String,
    /// Bedrooms
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=10))]
    bhk: u32,
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=10))]
    bath: u32,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(0..=5))]
    balcony: u32,
    /// Total area in square feet
    #[arg(long, default_value_t = 1000.0)]
    sqft: f64,
    #[arg(long)]
    area_type: String,
    #[arg(long)]
    availability: String,
    /// Band half-width around the predicted price per square foot, in [0, 1)
    #[arg(long, default_value_t = 0.10, value_parser = parse_tolerance)]
    tolerance: f64,
    /// Maximum number of comparable locations
    #[arg(long, default_value_t = 5, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    limit: usize,
}

fn parse_tolerance(value: &str) -> std::result::Result<f64, String> {
    let tolerance: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..1.0).contains(&tolerance) {
        return Err(format!("{tolerance} is not in [0, 1)"));
    }
    Ok(tolerance)
}

impl PredictArgs {
    fn features(&self) -> HouseFeatures {
        HouseFeatures {
            location: self.location.trim().to_string(),
            room_count: self.bhk,
            bathroom_count: self.bath,
            balcony_count: self.balcony,
            area: self.sqft,
            area_type: self.area_type.clone(),
            availability: self.availability.clone(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config {
        dataset_path: cli.dataset,
        model_path: cli.model,
        columns_path: cli.columns,
        city: cli.city,
        ..Config::default()
    };

    match cli.command {
        Command::Predict(args) => {
            config.recommender = RecommenderConfig {
                tolerance: args.tolerance,
                limit: args.limit,
            };
            let estimator = Estimator::load(&config).context("Failed to start estimator")?;
            predict(&estimator, &args)
        }
        Command::Options => {
            let estimator = Estimator::load(&config).context("Failed to start estimator")?;
            print_options(&estimator);
            Ok(())
        }
    }
}

fn predict(estimator: &Estimator, args: &PredictArgs) -> Result<()> {
    let features = args.features();
    let estimate = estimator.estimate(&features).context("Prediction failed")?;

    println!("Estimated Price: {}", estimate.prediction);
    println!();
    println!("Similar Price Locations:");
    if estimate.recommendations.is_empty() {
        println!("  No similar locations found, try adjusting values");
    } else {
        for location in &estimate.recommendations {
            println!("  - {}", location);
        }
    }
    println!();
    println!("View on map: {}", estimate.map_url);

    Ok(())
}

fn print_options(estimator: &Estimator) {
    let options = estimator.options();
    for (title, values) in [
        ("Locations", options.locations),
        ("Area types", options.area_types),
        ("Availability", options.availabilities),
    ] {
        println!("{} ({}):", title, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
}
