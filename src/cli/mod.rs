//! Command-line parsing for the `wf` demo binary.
//!
//! Argument parsing and dispatch stay separate from the transformation code.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "wf", version, about = "Wind data formatter (MET / lidar / ERA5)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate synthetic station tables and run every formatting step on them.
    Demo(DemoArgs),
    /// Print the effective configuration (defaults + WIND_* environment).
    Config(ConfigArgs),
}

/// Overrides shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ScalingArgs {
    /// Multiplier for labels above mean + std (overrides WIND_SCALE_UP).
    #[arg(long)]
    pub scale_up: Option<f64>,

    /// Multiplier for labels below mean - std (overrides WIND_SCALE_LOW).
    #[arg(long)]
    pub scale_low: Option<f64>,

    /// IANA zone for the ERA5 conversion (overrides WIND_ERA5_TZ).
    #[arg(long)]
    pub era5_tz: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// First synthetic logger day (UTC).
    #[arg(long, default_value = "2021-06-01")]
    pub start: NaiveDate,

    /// Number of days to simulate.
    #[arg(short = 'd', long, default_value_t = 7)]
    pub days: u32,

    /// Random seed for the synthetic tables.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability of a zero lidar reading at the reference height.
    #[arg(long, default_value_t = 0.0)]
    pub lidar_dropout: f64,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: ScalingArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct ConfigArgs {
    /// Print the configuration as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: ScalingArgs,
}
