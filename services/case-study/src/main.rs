//! Moisture-uptake case study runner.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use case_study::{load_case_config, run_case};

#[derive(Parser, Debug)]
#[command(name = "case-study")]
#[command(about = "Plot moisture uptake at genesis and along a transect")]
struct Args {
    /// YAML configuration file (defaults reproduce case 029)
    #[arg(short, long, env = "CASE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_case_config(args.config.as_deref())?;
    info!(
        archive = %config.archive.display(),
        output_dir = %config.output_dir.display(),
        dpi = config.style.dpi,
        "Starting case study"
    );

    match run_case(&config) {
        Ok(outputs) => {
            info!(
                map = %outputs.map.display(),
                section = %outputs.section.display(),
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Case study failed");
            Err(e)
        }
    }
}
