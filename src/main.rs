use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

use epocrs::logging::init_logging;
use epocrs::{estimate_epoc, AthleteCalibration, EpocConfig};

/// epocrs - EPOC estimation demo
///
/// Runs the EPOC estimator over a short built-in workout and prints the
/// final value and the per-sample trajectory.
#[derive(Parser)]
#[command(name = "epocrs")]
#[command(version = "0.1.0")]
#[command(about = "EPOC estimation demo", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const DEMO_POWER: [f64; 7] = [100.0, 150.0, 200.0, 250.0, 300.0, 150.0, 100.0];
const DEMO_HR: [f64; 7] = [120.0, 130.0, 140.0, 160.0, 170.0, 150.0, 120.0];

fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicitly requested config file must load; the default one is optional
    let (mut config, fallback_error) = match &cli.config {
        Some(path) => (EpocConfig::load_from_file(path)?, None),
        None => EpocConfig::load_with_fallback(None),
    };
    config.logging.level = config.logging.level.raised_by(cli.verbose);
    init_logging(&config.logging)?;

    if let Some(e) = fallback_error {
        e.log();
    }

    let calibration = AthleteCalibration::new(300.0, 60.0, 180.0);
    let result = estimate_epoc(DEMO_POWER, DEMO_HR, &calibration, &config.model);

    println!("{}", format!("Total EPOC: {:.2}", result.total).green().bold());
    println!("Series: {:?}", result.series);

    Ok(())
}
