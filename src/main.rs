// src/main.rs
mod charts;
mod extractors;
mod storage;
mod utils;
mod wiki;

use std::time::Duration;

use clap::Parser;
use utils::AppError;
use storage::StorageManager;
use wiki::models::{ChartKey, YearRange, DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use wiki::WikiClient;

/// Compiles monthly number-one songs per genre from Wikipedia's weekly chart lists
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output directory for the CSV files
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// First year to compile
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    start_year: i32,

    /// Last year to compile (inclusive)
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    end_year: i32,

    /// Only build these charts (repeatable); defaults to all five
    #[arg(short, long = "chart", value_enum)]
    charts: Vec<ChartKey>,

    /// Pause between charts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pause_ms: u64,

    /// Delay before every page request, in milliseconds
    #[arg(long, default_value_t = wiki::client::DEFAULT_REQUEST_DELAY_MS)]
    request_delay_ms: u64,

    /// Debug mode - save annotated copies of every fetched page
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// Selected charts in the fixed build order.
    fn selected_charts(&self) -> Vec<ChartKey> {
        ChartKey::ALL
            .into_iter()
            .filter(|key| self.charts.is_empty() || self.charts.contains(key))
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    let range = YearRange::new(args.start_year, args.end_year).ok_or_else(|| {
        AppError::Config(format!(
            "start year {} is after end year {}",
            args.start_year, args.end_year
        ))
    })?;

    // 3. Initialize storage and the page client
    let storage = StorageManager::new(&args.output_dir)?;
    let debug_dir = args.debug.then(|| storage.debug_dir());
    let client = WikiClient::new(Duration::from_millis(args.request_delay_ms), debug_dir)?;

    // 4. Build each chart in turn
    let mut results = serde_json::Map::new();
    for key in args.selected_charts() {
        println!("Building {}...", key);
        tracing::info!("Building {} for {}-{}", key, range.start, range.end);

        let path = charts::build_chart_csv(&client, key.config(), range, &storage).await?;
        println!(" -> {}", path.display());
        results.insert(key.to_string(), path.display().to_string().into());

        // Be gentle to Wikipedia between charts
        tokio::time::sleep(Duration::from_millis(args.pause_ms)).await;
    }

    // 5. Report what was written
    let summary = storage.save_summary(&results)?;
    println!("{}", summary);

    tracing::info!("Processing finished. {} charts written.", results.len());
    Ok(())
}
