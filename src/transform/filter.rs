//! Date-range selection on the canonical `Timestamp` column.

use chrono::NaiveDateTime;
use polars::prelude::*;
use tracing::debug;

use crate::domain::TIMESTAMP_COLUMN;
use crate::error::Result;
use crate::table::ObservationTable;

/// Rows with `start <= Timestamp <= end`, in their original order.
///
/// Both boundaries are inclusive. Rows with a missing timestamp are dropped and
/// `start > end` selects nothing.
pub fn concurrent_data(
    table: &ObservationTable,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<ObservationTable> {
    table.require_datetime(TIMESTAMP_COLUMN)?;
    let frame = table
        .lazy()
        .filter(
            col(TIMESTAMP_COLUMN)
                .gt_eq(lit(start))
                .and(col(TIMESTAMP_COLUMN).lt_eq(lit(end))),
        )
        .collect()?;
    debug!(rows_in = table.n_rows(), rows_out = frame.height(), %start, %end, "filtered date range");
    Ok(ObservationTable::from_frame(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::table::{numeric_column, optional_datetime_column, text_column};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn table() -> ObservationTable {
        ObservationTable::new(vec![
            optional_datetime_column(
                TIMESTAMP_COLUMN,
                [Some(at(1, 0)), Some(at(1, 5)), None, Some(at(2, 0)), Some(at(3, 0))],
            ),
            numeric_column("x", &[1.0, 2.0, 3.0, 4.0, 5.0]),
        ])
        .unwrap()
    }

    #[test]
    fn boundaries_are_inclusive() {
        let out = concurrent_data(&table(), at(1, 5), at(2, 0)).unwrap();
        assert_eq!(out.numeric("x").unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn whole_range_keeps_order_and_drops_missing_timestamps() {
        let out = concurrent_data(&table(), at(1, 0), at(3, 0)).unwrap();
        assert_eq!(out.numeric("x").unwrap(), vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let out = concurrent_data(&table(), at(3, 0), at(1, 0)).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.n_columns(), 2);
    }

    #[test]
    fn requires_parsed_timestamps() {
        let raw = ObservationTable::new(vec![text_column(TIMESTAMP_COLUMN, &["2022-03-01"])]).unwrap();
        assert!(matches!(
            concurrent_data(&raw, at(1, 0), at(2, 0)),
            Err(FormatError::Precondition { .. })
        ));
    }
}
