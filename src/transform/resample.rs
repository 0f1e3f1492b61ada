//! Fixed-width temporal resampling.
//!
//! Rows are grouped into clock-aligned buckets and every numeric column is
//! replaced by its per-bucket arithmetic mean. Buckets with no observations
//! are emitted with missing values (no forward fill).

use polars::prelude::*;
use tracing::debug;

use crate::domain::{HOUR_COLUMN, TIMESTAMP_COLUMN};
use crate::error::Result;
use crate::math::hour_of_year;
use crate::table::{ObservationTable, is_numeric};

/// Bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hourly,
    /// Six-hour buckets. Historically exposed as the "3-hour" format; the
    /// bucket width has always been six hours.
    SixHourly,
}

impl Resolution {
    pub fn every(self) -> Duration {
        match self {
            Resolution::Hourly => Duration::parse("1h"),
            Resolution::SixHourly => Duration::parse("6h"),
        }
    }
}

/// Hourly means plus the derived `hour` (hour-of-year) column.
///
/// Timestamps are read as UTC clock values; the hour-of-year is computed from
/// the bucket start and the output `Timestamp` stays a naive clock value.
pub fn hourly_format(table: &ObservationTable) -> Result<ObservationTable> {
    let resampled = resample(table, Resolution::Hourly)?;
    let frame = resampled
        .lazy()
        .with_column(hour_of_year(col(TIMESTAMP_COLUMN)).alias(HOUR_COLUMN))
        .collect()?;
    Ok(ObservationTable::from_frame(frame))
}

/// Six-hourly means (no hour-of-year column).
pub fn six_hour_format(table: &ObservationTable) -> Result<ObservationTable> {
    resample(table, Resolution::SixHourly)
}

/// Bucket `table` on its `Timestamp` column at the given resolution.
///
/// Output columns: `Timestamp` first, then each numeric input column in input
/// order as floats. Text columns cannot be averaged and are dropped. Rows with
/// a missing timestamp are ignored and `NaN` inputs do not count toward a mean.
///
/// # Errors
/// - `MissingField` if there is no `Timestamp` column.
/// - `Precondition` if `Timestamp` is not a parsed date-time column.
pub fn resample(table: &ObservationTable, resolution: Resolution) -> Result<ObservationTable> {
    table.require_datetime(TIMESTAMP_COLUMN)?;
    let every = resolution.every();

    let value_columns: Vec<PlSmallStr> = table
        .frame()
        .get_columns()
        .iter()
        .filter(|c| c.name().as_str() != TIMESTAMP_COLUMN && is_numeric(c.dtype()))
        .map(|c| c.name().clone())
        .collect();
    let timed_rows = table.lazy().filter(col(TIMESTAMP_COLUMN).is_not_null());

    if table.column(TIMESTAMP_COLUMN)?.null_count() == table.n_rows() {
        let mut columns = vec![col(TIMESTAMP_COLUMN)];
        columns.extend(value_columns.iter().map(|name| col(name.clone()).cast(DataType::Float64)));
        let empty = timed_rows.select(columns).collect()?;
        debug!(rows = table.n_rows(), ?resolution, "no timestamped rows to resample");
        return Ok(ObservationTable::from_frame(empty));
    }

    let means: Vec<Expr> = value_columns
        .iter()
        .map(|name| {
            col(name.clone())
                .cast(DataType::Float64)
                .fill_nan(lit(NULL))
                .mean()
        })
        .collect();

    let populated = timed_rows
        .sort([TIMESTAMP_COLUMN], SortMultipleOptions::default())
        .group_by_dynamic(
            col(TIMESTAMP_COLUMN),
            Vec::<Expr>::new(),
            DynamicGroupOptions {
                every,
                period: every,
                offset: Duration::parse("0ns"),
                label: Label::Left,
                closed_window: ClosedWindow::Left,
                start_by: StartBy::WindowBound,
                ..Default::default()
            },
        )
        .agg(means)
        .collect()?;

    // Bucket starts are aligned, so stepping from the first one reaches every gap.
    let filled = populated.upsample(Vec::<PlSmallStr>::new(), TIMESTAMP_COLUMN, every)?;

    debug!(
        rows = table.n_rows(),
        buckets = filled.height(),
        populated = populated.height(),
        ?resolution,
        "resampled table"
    );
    Ok(ObservationTable::from_frame(filled))
}
