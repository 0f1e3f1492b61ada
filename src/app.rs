//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the tracing subscriber
//! - parses CLI arguments
//! - resolves configuration (defaults, `.env`/environment, flags)
//! - runs the demo pipeline and prints reports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ConfigArgs, DemoArgs, ScalingArgs};
use crate::data::SampleSpec;
use crate::domain::{FormatterConfig, parse_time_zone};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `wf` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Demo(args) => handle_demo(args),
        Command::Config(args) => handle_config(args),
    }
}

fn init_tracing() {
    // `RUST_LOG` wins; otherwise only computation warnings are shown.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = resolve_config(&args.overrides)?;
    let start = args
        .start
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::new(2, "Invalid start date."))?;

    let mut spec = SampleSpec::new(start, args.days, args.seed);
    spec.lidar_dropout = args.lidar_dropout;

    let run = pipeline::run_demo(&config, &spec)?;

    if args.json {
        println!("{}", crate::report::to_json(&run.summary)?);
    } else {
        println!("{}", crate::report::format_run_summary(&run.summary));
    }
    Ok(())
}

fn handle_config(args: ConfigArgs) -> Result<(), AppError> {
    let config = resolve_config(&args.overrides)?;
    if args.json {
        println!("{}", crate::report::to_json(&config)?);
    } else {
        println!("{}", crate::report::format_config(&config));
    }
    Ok(())
}

/// Defaults, then environment, then CLI flags.
pub fn resolve_config(overrides: &ScalingArgs) -> Result<FormatterConfig, AppError> {
    let mut config = FormatterConfig::from_env()?;
    apply_overrides(&mut config, overrides)?;
    Ok(config)
}

fn apply_overrides(config: &mut FormatterConfig, overrides: &ScalingArgs) -> Result<(), AppError> {
    if let Some(v) = overrides.scale_up {
        config.scaling.scale_up = v;
    }
    if let Some(v) = overrides.scale_low {
        config.scaling.scale_low = v;
    }
    if let Some(tz) = &overrides.era5_tz {
        config.era5.time_zone = parse_time_zone(tz)?;
    }
    config.validate()?;
    Ok(())
}
