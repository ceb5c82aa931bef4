//! Street-furniture ingest batch.
//!
//! Reads each configured GeoJSON dataset, resolves addresses,
//! and writes one JSON array of points of interest per category.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wayside::config::Config;
use wayside::geocode::GoogleGeocoder;
use wayside::pipeline::{CategoryBatchRunner, JobOutcome};

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Convert street-furniture GeoJSON into point-of-interest JSON")]
struct Args {
    /// Job configuration file (TOML). Without it the built-in five datasets are processed.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run the job with this output name, e.g. "benches" (repeatable)
    #[arg(long)]
    only: Vec<String>,

    /// Reverse geocoding API key
    #[arg(long, env = "WAYSIDE_GEOCODER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum geocoding requests in flight per job
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log every record
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => {
            info!("Config: {}", path.display());
            Config::load_from_file(path)?
        }
        None => {
            info!("No config given, using the reference batch");
            Config::reference()
        }
    };

    if let Some(n) = args.concurrency {
        config.geocoder.concurrency = n;
    }
    config.validate()?;

    let known: Vec<String> = config.jobs.iter().map(|j| j.name()).collect();
    let unknown: Vec<&String> = args.only.iter().filter(|n| !known.contains(*n)).collect();
    if !unknown.is_empty() {
        bail!(
            "Unknown job(s) in --only: {:?}; available: {}",
            unknown,
            known.join(", ")
        );
    }

    let jobs: Vec<_> = config
        .jobs
        .iter()
        .filter(|j| args.only.is_empty() || args.only.contains(&j.name()))
        .cloned()
        .collect();

    let api_key = match args.api_key.or_else(|| config.geocoder.api_key.clone()) {
        Some(key) => key,
        None => {
            warn!("No geocoding API key configured; features without an address will fail");
            String::new()
        }
    };

    let geocoder = GoogleGeocoder::new(&config.geocoder, api_key)?;
    let runner = CategoryBatchRunner::new(geocoder, &config);
    let report = runner.run(&jobs).await;

    for job in &report.jobs {
        match &job.outcome {
            JobOutcome::Completed { records } => {
                info!("{}: {} records -> {}", job.name, records, job.output.display())
            }
            JobOutcome::Failed { error } => error!("{}: FAILED: {}", job.name, error),
        }
    }

    let failed = report.failed().count();
    if failed > 0 {
        bail!("{} of {} jobs failed", failed, report.jobs.len());
    }

    info!(
        "Batch complete: {} records across {} jobs",
        report.total_records(),
        report.jobs.len()
    );
    Ok(())
}
