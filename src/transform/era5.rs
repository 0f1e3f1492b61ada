//! Reanalysis (ERA5) station normalization.
//!
//! Steps, in order:
//!
//! 1. parse the raw `Date/time [UTC]` column as UTC
//! 2. convert to the configured zone (US/Mountain by default, with its DST rules)
//! 3. strip the zone, keeping naive local clock values
//! 4. derive `hour` (hour-of-year) from the *local* clock
//! 5. drop rows before the configured local start (inclusive boundary)
//! 6. rename the timestamp column to `Timestamp`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use tracing::debug;

use crate::domain::{Era5Options, HOUR_COLUMN, TIMESTAMP_COLUMN};
use crate::error::{FormatError, Result};
use crate::math::hour_of_year;
use crate::table::{ObservationTable, kind_name, optional_datetime_column};

/// Normalize a reanalysis table into the shape of instrumented-station tables.
///
/// # Errors
/// - `MissingField` if the source timestamp column is absent.
/// - `TimestampParse` if any raw timestamp cannot be parsed.
/// - `Precondition` if the source column is neither text nor date-time.
pub fn format_era5(table: &ObservationTable, options: &Era5Options) -> Result<ObservationTable> {
    let source = options.source_column.as_str();
    let utc = parse_utc_column(table, source)?;
    let zone: PlSmallStr = options.time_zone.name().into();

    let local_clock = col(source)
        .dt()
        .replace_time_zone(Some("UTC".into()), lit("raise"), NonExistent::Raise)
        .dt()
        .convert_time_zone(zone)
        .dt()
        .replace_time_zone(None, lit("raise"), NonExistent::Raise);

    let frame = table
        .with_column(optional_datetime_column(source, utc))?
        .lazy()
        .with_column(local_clock.alias(source))
        .with_column(hour_of_year(col(source)).alias(HOUR_COLUMN))
        .filter(col(source).gt_eq(lit(options.start)))
        .collect()?;
    let formatted = ObservationTable::from_frame(frame).rename(source, TIMESTAMP_COLUMN)?;

    debug!(
        rows_in = table.n_rows(),
        rows_out = formatted.n_rows(),
        zone = options.time_zone.name(),
        "formatted reanalysis table"
    );
    Ok(formatted)
}

/// Read a timestamp column as naive UTC clock values.
///
/// Text values are parsed; already-parsed values are taken as UTC.
/// Missing entries stay missing.
pub fn parse_utc_column(table: &ObservationTable, field: &str) -> Result<Vec<Option<NaiveDateTime>>> {
    let dtype = table.dtype(field)?;
    match dtype {
        DataType::Datetime(_, _) => table.timestamps(field),
        DataType::String => table
            .column(field)?
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, raw)| match raw.map(str::trim) {
                None | Some("") => Ok(None),
                Some(raw) => parse_utc(raw)
                    .map(|ts| Some(ts.naive_utc()))
                    .ok_or_else(|| FormatError::TimestampParse {
                        field: field.to_string(),
                        row,
                        value: raw.to_string(),
                    }),
            })
            .collect(),
        other => Err(FormatError::precondition(
            field,
            format!("expected text or datetime values, found {}", kind_name(other)),
        )),
    }
}

/// Parse one raw reanalysis timestamp as UTC.
///
/// Accepts RFC 3339 (`2000-01-01T07:00:00Z`, `...+00:00`), naive forms with
/// either a `T` or a space separator (seconds and fractional seconds
/// optional), and bare dates, which mean midnight.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    const FMTS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];
    let raw = raw.strip_suffix('Z').unwrap_or(raw);
    FMTS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|ts| ts.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{datetime_column, numeric_column, text_column};

    fn local(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn era5(raw: &[&str]) -> ObservationTable {
        let speed: Vec<f64> = (0..raw.len()).map(|i| i as f64).collect();
        ObservationTable::new(vec![
            text_column("Date/time [UTC]", raw),
            numeric_column("Spd 100m [m/s]", &speed),
        ])
        .unwrap()
    }

    #[test]
    fn parses_common_layouts() {
        let expected = local(2000, 1, 1, 7).and_utc();
        for raw in [
            "2000-01-01T07:00:00",
            "2000-01-01 07:00:00",
            "2000-01-01T07:00",
            "2000-01-01T07:00:00Z",
            "2000-01-01T07:00:00+00:00",
            "2000-01-01 07:00:00.000",
            "2000-01-01T07:00:00.000Z",
        ] {
            assert_eq!(parse_utc(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_utc("yesterday"), None);
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let parsed = parse_utc("2000-01-01 07:00:00.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn bare_date_means_midnight() {
        assert_eq!(parse_utc("2000-01-01"), Some(local(2000, 1, 1, 0).and_utc()));
    }

    #[test]
    fn truncates_at_local_start_inclusive() {
        // Mountain standard time is UTC-7 in January.
        let table = era5(&["2000-01-01T06:00:00", "2000-01-01T07:00:00", "2000-01-01T08:00:00"]);
        let out = format_era5(&table, &Era5Options::default()).unwrap();

        assert_eq!(out.n_rows(), 2);
        assert_eq!(
            out.timestamps(TIMESTAMP_COLUMN).unwrap(),
            vec![Some(local(2000, 1, 1, 0)), Some(local(2000, 1, 1, 1))]
        );
        assert_eq!(out.integers(HOUR_COLUMN).unwrap(), vec![Some(0), Some(1)]);
        assert_eq!(out.numeric("Spd 100m [m/s]").unwrap(), vec![1.0, 2.0]);
        assert!(!out.has_column("Date/time [UTC]"));
        assert_eq!(out.column_names(), vec![TIMESTAMP_COLUMN, "Spd 100m [m/s]", HOUR_COLUMN]);
    }

    #[test]
    fn hour_of_year_follows_local_clock_and_dst() {
        // 2021-07-01 12:00 UTC is 06:00 MDT (UTC-6).
        let table = era5(&["2021-07-01T12:00:00"]);
        let out = format_era5(&table, &Era5Options::default()).unwrap();
        assert_eq!(out.timestamps(TIMESTAMP_COLUMN).unwrap(), vec![Some(local(2021, 7, 1, 6))]);
        // July 1st is day 182 of a non-leap year.
        assert_eq!(out.integers(HOUR_COLUMN).unwrap(), vec![Some(181 * 24 + 6)]);
    }

    #[test]
    fn year_boundary_uses_converted_timestamp() {
        // 2021-01-01 03:00 UTC is still 2020-12-31 20:00 in Denver (2020 is a leap year).
        let table = era5(&["2021-01-01T03:00:00"]);
        let out = format_era5(&table, &Era5Options::default()).unwrap();
        assert_eq!(out.integers(HOUR_COLUMN).unwrap(), vec![Some(365 * 24 + 20)]);
    }

    #[test]
    fn caller_table_is_untouched() {
        let table = era5(&["1999-12-31T12:00:00", "2000-06-01T12:00:00"]);
        let before = table.clone();
        let out = format_era5(&table, &Era5Options::default()).unwrap();
        assert_eq!(out.n_rows(), 1);
        assert_eq!(table, before);
    }

    #[test]
    fn accepts_pre_parsed_timestamps() {
        let table = ObservationTable::new(vec![datetime_column("Date/time [UTC]", [local(2010, 1, 1, 12)])]).unwrap();
        let out = format_era5(&table, &Era5Options::default()).unwrap();
        assert_eq!(out.timestamps(TIMESTAMP_COLUMN).unwrap(), vec![Some(local(2010, 1, 1, 5))]);
    }

    #[test]
    fn bad_timestamp_aborts_call() {
        let table = era5(&["2000-01-01T07:00:00", "not a date"]);
        let err = format_era5(&table, &Era5Options::default()).unwrap_err();
        assert_eq!(
            err,
            FormatError::TimestampParse {
                field: "Date/time [UTC]".to_string(),
                row: 1,
                value: "not a date".to_string(),
            }
        );
    }

    #[test]
    fn numeric_source_column_is_rejected() {
        let table = ObservationTable::new(vec![numeric_column("Date/time [UTC]", &[1.0])]).unwrap();
        assert!(matches!(
            format_era5(&table, &Era5Options::default()),
            Err(FormatError::Precondition { .. })
        ));
    }

    #[test]
    fn missing_source_column() {
        let table = ObservationTable::new(vec![numeric_column("x", &[1.0])]).unwrap();
        assert_eq!(
            format_era5(&table, &Era5Options::default()).unwrap_err(),
            FormatError::missing("Date/time [UTC]")
        );
    }
}
