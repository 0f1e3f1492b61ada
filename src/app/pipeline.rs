//! End-to-end demo pipeline.
//!
//! Runs every transformation over synthetic station tables:
//! MET adjust -> hourly / six-hourly resample -> label rescale,
//! ERA5 format -> concurrent-period filter,
//! lidar shear.
//!
//! The binary only prints the outcome; keeping the workflow here makes it testable.

use crate::data::{SampleData, SampleSpec, generate_sample};
use crate::domain::{FormatterConfig, SHEAR_COLUMN, TIMESTAMP_COLUMN};
use crate::error::{FormatError, Result};
use crate::report::{RunSummary, ScalingStats, ShearStats, StationCounts};
use crate::table::ObservationTable;
use crate::transform::{
    ScaleThresholds, adjust_wind_met, concurrent_data, format_era5, hourly_format, scale_training_data,
    six_hour_format, wind_shear,
};

/// All computed outputs of a single demo run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sample: SampleData,
    pub met_hourly: ObservationTable,
    pub met_six_hourly: ObservationTable,
    pub era5_concurrent: ObservationTable,
    pub shear: ObservationTable,
    pub training: ObservationTable,
    pub summary: RunSummary,
}

pub fn run_demo(config: &FormatterConfig, spec: &SampleSpec) -> Result<RunOutput> {
    config.validate()?;

    // 1) Synthetic raw tables.
    let sample = generate_sample(spec, config)?;

    // 2) MET: fuse directional sensors, then resample.
    let met_adjusted = adjust_wind_met(&sample.met, &config.heights, &config.met)?;
    let met_hourly = hourly_format(&met_adjusted)?;
    let met_six_hourly = six_hour_format(&met_adjusted)?;

    // 3) ERA5: normalize, then keep the period the MET tower covers.
    let era5 = format_era5(&sample.era5, &config.era5)?;
    let (period_start, period_end) = period_bounds(&met_hourly)?;
    let era5_concurrent = concurrent_data(&era5, period_start, period_end)?;

    // 4) Lidar shear on hourly means.
    let lidar_hourly = hourly_format(&sample.lidar)?;
    let shear = wind_shear(&lidar_hourly, config.shear)?;

    // 5) Training labels.
    let training = scale_training_data(&met_hourly, &config.scaling)?;

    let labels = met_hourly.numeric(&config.scaling.label_column)?;
    let thresholds = ScaleThresholds::from_values(&labels);
    let scaling = ScalingStats {
        mean: thresholds.mean,
        std: thresholds.std,
        scaled_up: labels.iter().filter(|v| **v > thresholds.high()).count(),
        scaled_low: labels.iter().filter(|v| **v < thresholds.low()).count(),
    };

    let mut met_counts = StationCounts::new("MET");
    met_counts.push("raw", sample.met.n_rows());
    met_counts.push("hourly", met_hourly.n_rows());
    met_counts.push("6-hourly", met_six_hourly.n_rows());

    let mut era5_counts = StationCounts::new("ERA5");
    era5_counts.push("raw", sample.era5.n_rows());
    era5_counts.push("formatted", era5.n_rows());
    era5_counts.push("concurrent", era5_concurrent.n_rows());

    let mut lidar_counts = StationCounts::new("Lidar");
    lidar_counts.push("raw", sample.lidar.n_rows());
    lidar_counts.push("hourly", lidar_hourly.n_rows());

    let summary = RunSummary {
        period_start,
        period_end,
        stations: vec![met_counts, era5_counts, lidar_counts],
        mean_adjusted_speed: Some(thresholds.mean).filter(|m| m.is_finite()),
        shear: ShearStats::from_values(&shear.numeric(SHEAR_COLUMN)?),
        scaling,
    };

    Ok(RunOutput {
        sample,
        met_hourly,
        met_six_hourly,
        era5_concurrent,
        shear,
        training,
        summary,
    })
}

fn period_bounds(table: &ObservationTable) -> Result<(chrono::NaiveDateTime, chrono::NaiveDateTime)> {
    let ts = table.timestamps(TIMESTAMP_COLUMN)?;
    let first = ts.iter().flatten().min().copied();
    let last = ts.iter().flatten().max().copied();
    first
        .zip(last)
        .ok_or_else(|| FormatError::precondition(TIMESTAMP_COLUMN, "table has no timestamps"))
}
