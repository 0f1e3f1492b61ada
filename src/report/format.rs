//! Plain-text and JSON rendering of run summaries and configuration.
//!
//! Formatting lives here so the transformation code stays free of output concerns.

use crate::domain::{FormatterConfig, StationKind, height_label};
use crate::error::AppError;
use crate::report::RunSummary;

/// Format the full demo summary.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== wf - wind data formatter ===\n");
    out.push_str(&format!(
        "Period: {} .. {}\n",
        summary.period_start, summary.period_end
    ));

    out.push_str("\nRows per step:\n");
    for station in &summary.stations {
        let steps: Vec<String> = station
            .steps
            .iter()
            .map(|(step, rows)| format!("{step}={rows}"))
            .collect();
        out.push_str(&format!("  {:<6} {}\n", station.station, steps.join(" -> ")));
    }

    out.push_str("\nMET:\n");
    out.push_str(&format!(
        "- mean hourly adjusted speed: {} m/s\n",
        fmt_opt(summary.mean_adjusted_speed, 3)
    ));

    let shear = &summary.shear;
    out.push_str("\nShear (lidar):\n");
    out.push_str(&format!(
        "- n={} mean={} min={} max={}\n",
        shear.n,
        fmt_opt(shear.mean, 4),
        fmt_opt(shear.min, 4),
        fmt_opt(shear.max, 4)
    ));
    if shear.non_finite > 0 {
        out.push_str(&format!(
            "- warning: {} non-finite value(s) (zero/negative lidar speed)\n",
            shear.non_finite
        ));
    }

    let scaling = &summary.scaling;
    out.push_str("\nLabel rescaling:\n");
    out.push_str(&format!(
        "- mean={:.3} std={:.3} -> thresholds [{:.3}, {:.3}]\n",
        scaling.mean,
        scaling.std,
        scaling.mean - scaling.std,
        scaling.mean + scaling.std
    ));
    out.push_str(&format!(
        "- scaled up: {} | scaled low: {}\n",
        scaling.scaled_up, scaling.scaled_low
    ));

    out
}

/// Format the effective configuration.
pub fn format_config(config: &FormatterConfig) -> String {
    let mut out = String::new();

    out.push_str("Height registry:\n");
    for kind in [StationKind::Met, StationKind::Lidar] {
        let heights: Vec<String> = config
            .heights
            .heights(kind)
            .iter()
            .map(|h| format!("{}m", height_label(*h)))
            .collect();
        out.push_str(&format!("  {:<6} {}\n", kind.display_name(), heights.join(", ")));
    }

    let met = &config.met;
    out.push_str(&format!("Direction sensor: {}\n", met.direction_column()));
    out.push_str(&format!(
        "Sectors: east [{}, {}] | southwest [{}, {}]\n",
        met.east_sector.from_deg, met.east_sector.to_deg, met.southwest_sector.from_deg, met.southwest_sector.to_deg
    ));
    out.push_str(&format!(
        "Shear heights: {}m / {}m\n",
        height_label(config.shear.upper),
        height_label(config.shear.reference)
    ));
    out.push_str(&format!(
        "Label scaling: {} x{} (high) x{} (low)\n",
        config.scaling.label_column, config.scaling.scale_up, config.scaling.scale_low
    ));
    out.push_str(&format!(
        "ERA5: {} -> {} from {}\n",
        config.era5.source_column,
        config.era5.time_zone.name(),
        config.era5.start
    ));

    out
}

/// Pretty JSON for any serializable report value.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("Failed to serialize report: {e}")))
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}
