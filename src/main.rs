//! Solarcap - Solar-fed capacitor storage simulator
//!
//! Simulates the node voltage of a capacitor store charged by a solar array
//! and writes the time series to a CSV file.
//!
//! # Usage
//!
//! ```bash
//! solarcap sa_m2 eff voc c_f r_esr q0_c p_on_w v_thresh drun_time_track dur_s
//! RUST_LOG=debug solarcap 1.0 0.2 5.0 0.01 0.1 0.0 0.0 1.0 0.1 1.0 --output run.csv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use solarcap_core::{
    error::Result,
    output::write_csv_file,
    SimulationParameters, Simulator, SimulatorConfig, DEFAULT_OUTPUT_FILE,
    SOLAR_IRRADIANCE_W_PER_M2,
};
use tracing_subscriber::EnvFilter;

/// Solar-fed capacitor storage simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// sa_m2 eff voc c_f r_esr q0_c p_on_w v_thresh drun_time_track dur_s
    #[arg(value_name = "VALUE", num_args = 0.., allow_negative_numbers = true)]
    values: Vec<String>,

    /// Path of the CSV sample log
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Solar irradiance in W/m²
    #[arg(long, default_value_t = SOLAR_IRRADIANCE_W_PER_M2)]
    irradiance: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    // Parse the ten positional values
    let params = SimulationParameters::from_args(&args.values)?;

    // Create simulator
    let config = SimulatorConfig::new().with_irradiance(args.irradiance);
    let simulator = Simulator::with_config(params, config)?;

    // Run to completion before touching the output file
    let samples = simulator.run()?;

    write_csv_file(&args.output, &samples)
}
