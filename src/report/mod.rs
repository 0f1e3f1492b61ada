//! Reporting utilities: run summaries for the `wf` binary.

use chrono::NaiveDateTime;
use serde::Serialize;

pub mod format;

pub use format::*;

/// Row counts for one station through its formatting steps.
#[derive(Debug, Clone, Serialize)]
pub struct StationCounts {
    pub station: String,
    /// `(step, rows)` in the order the steps ran.
    pub steps: Vec<(String, usize)>,
}

impl StationCounts {
    pub fn new(station: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: impl Into<String>, rows: usize) {
        self.steps.push((step.into(), rows));
    }
}

/// Distribution of a shear series, split into usable and faulty rows.
#[derive(Debug, Clone, Serialize)]
pub struct ShearStats {
    pub n: usize,
    pub non_finite: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ShearStats {
    pub fn from_values(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let mean = (!finite.is_empty()).then(|| finite.iter().sum::<f64>() / finite.len() as f64);
        Self {
            n: values.len(),
            non_finite: values.len() - finite.len(),
            mean,
            min: finite.iter().copied().reduce(f64::min),
            max: finite.iter().copied().reduce(f64::max),
        }
    }
}

/// Label rescaling outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ScalingStats {
    pub mean: f64,
    pub std: f64,
    pub scaled_up: usize,
    pub scaled_low: usize,
}

/// Everything the demo prints.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub stations: Vec<StationCounts>,
    pub mean_adjusted_speed: Option<f64>,
    pub shear: ShearStats,
    pub scaling: ScalingStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shear_stats_separate_faulty_rows() {
        let stats = ShearStats::from_values(&[0.1, f64::INFINITY, 0.3, f64::NAN]);
        assert_eq!(stats.n, 4);
        assert_eq!(stats.non_finite, 2);
        assert!((stats.mean.unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(stats.min, Some(0.1));
        assert_eq!(stats.max, Some(0.3));
    }

    #[test]
    fn shear_stats_all_faulty() {
        let stats = ShearStats::from_values(&[f64::NAN]);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.non_finite, 1);
    }
}
