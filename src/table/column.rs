//! Column builders and dtype checks.
//!
//! Date-times are stored as naive millisecond `Datetime` columns. Missing
//! values are nulls; numeric columns may also carry `NaN`, which every
//! aggregation treats as missing.

use chrono::NaiveDateTime;
use polars::prelude::*;

/// Millisecond resolution used for every date-time column this crate builds.
pub const TIME_UNIT: TimeUnit = TimeUnit::Milliseconds;

pub fn datetime_column(name: &str, values: impl IntoIterator<Item = NaiveDateTime>) -> Column {
    optional_datetime_column(name, values.into_iter().map(Some))
}

pub fn optional_datetime_column(name: &str, values: impl IntoIterator<Item = Option<NaiveDateTime>>) -> Column {
    DatetimeChunked::from_naive_datetime_options(name.into(), values, TIME_UNIT).into_column()
}

pub fn numeric_column(name: &str, values: &[f64]) -> Column {
    Column::new(name.into(), values)
}

pub fn integer_column(name: &str, values: &[i64]) -> Column {
    Column::new(name.into(), values)
}

pub fn text_column<S: AsRef<str>>(name: &str, values: &[S]) -> Column {
    let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    Column::new(name.into(), values)
}

pub fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_float() || dtype.is_integer()
}

pub fn is_datetime(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _))
}

/// Short dtype label used in error messages.
pub fn kind_name(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Datetime(_, _) => "datetime",
        DataType::String => "text",
        d if d.is_float() => "numeric",
        d if d.is_integer() => "integer",
        _ => "unsupported",
    }
}
