//! Distribution-aware training-label rescaling.
//!
//! High wind speeds are rare in the training set, so labels far above the
//! dataset mean are amplified to counter the imbalance:
//!
//! - `label > mean + std` → `label * scale_up`
//! - `label < mean - std` → `label * scale_low`
//! - otherwise unchanged
//!
//! `std` is the population standard deviation. Missing labels are ignored by
//! the statistics and stay missing.

use polars::prelude::*;
use tracing::debug;

use crate::domain::LabelScaling;
use crate::error::Result;
use crate::math::{nan_mean, nan_population_std};
use crate::table::ObservationTable;

/// Thresholds derived from the label distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleThresholds {
    pub mean: f64,
    pub std: f64,
}

impl ScaleThresholds {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: nan_mean(values),
            std: nan_population_std(values),
        }
    }

    pub fn high(&self) -> f64 {
        self.mean + self.std
    }

    pub fn low(&self) -> f64 {
        self.mean - self.std
    }
}

/// Return a copy of `table` with the label column rescaled.
///
/// # Errors
/// `MissingField` if the label column is absent.
pub fn scale_training_data(table: &ObservationTable, scaling: &LabelScaling) -> Result<ObservationTable> {
    let name = scaling.label_column.as_str();
    let labels = table.numeric(name)?;
    let thresholds = ScaleThresholds::from_values(&labels);
    let (high, low) = (thresholds.high(), thresholds.low());

    let label = col(name).cast(DataType::Float64);
    let scaled = when(label.clone().is_nan())
        .then(label.clone())
        .when(label.clone().gt(lit(high)))
        .then(label.clone() * lit(scaling.scale_up))
        .when(label.clone().lt(lit(low)))
        .then(label.clone() * lit(scaling.scale_low))
        .otherwise(label)
        .alias(name);
    let frame = table.lazy().with_column(scaled).collect()?;

    debug!(
        mean = thresholds.mean,
        std = thresholds.std,
        high = labels.iter().filter(|v| **v > high).count(),
        low = labels.iter().filter(|v| **v < low).count(),
        "rescaled training labels"
    );
    Ok(ObservationTable::from_frame(frame))
}
