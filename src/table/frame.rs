//! `ObservationTable`: a named-column table backed by a polars `DataFrame`.
//!
//! Tables are values. Every method that "changes" a table returns a new one,
//! so a transformation can never alias or mutate the caller's data. Column
//! buffers are reference counted, so those copies are cheap.

use chrono::NaiveDateTime;
use polars::prelude::*;

use crate::error::{FormatError, Result};
use crate::table::{is_datetime, is_numeric, kind_name};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    frame: DataFrame,
}

impl ObservationTable {
    /// Build a table, validating lengths and name uniqueness.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    pub fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// A lazy query over a copy of this table.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    pub fn n_columns(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.frame.column(name).map_err(|_| FormatError::missing(name))
    }

    pub fn dtype(&self, name: &str) -> Result<&DataType> {
        self.column(name).map(Column::dtype)
    }

    /// Fail unless `name` holds floats or integers.
    pub fn require_numeric(&self, name: &str) -> Result<()> {
        let dtype = self.dtype(name)?;
        if is_numeric(dtype) {
            Ok(())
        } else {
            Err(FormatError::precondition(
                name,
                format!("expected a numeric column, found {}", kind_name(dtype)),
            ))
        }
    }

    /// Fail unless `name` holds parsed date-times.
    ///
    /// A textual column fails with `FormatError::Precondition`: callers must
    /// parse timestamps before time-based operations.
    pub fn require_datetime(&self, name: &str) -> Result<()> {
        let dtype = self.dtype(name)?;
        if is_datetime(dtype) {
            Ok(())
        } else {
            Err(FormatError::precondition(
                name,
                format!("is not a datetime column (found {})", kind_name(dtype)),
            ))
        }
    }

    /// Values of a numeric column as `f64`; nulls read as `NaN`.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        self.require_numeric(name)?;
        let values = self.column(name)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Values of an integer column; nulls read as `None`.
    pub fn integers(&self, name: &str) -> Result<Vec<Option<i64>>> {
        let dtype = self.dtype(name)?;
        if !dtype.is_integer() {
            return Err(FormatError::precondition(
                name,
                format!("expected an integer column, found {}", kind_name(dtype)),
            ));
        }
        let values = self.column(name)?.cast(&DataType::Int64)?;
        Ok(values.i64()?.into_iter().collect())
    }

    /// Values of a date-time column as naive clock values.
    pub fn timestamps(&self, name: &str) -> Result<Vec<Option<NaiveDateTime>>> {
        self.require_datetime(name)?;
        let values = self.column(name)?.as_materialized_series().datetime()?;
        Ok(values.as_datetime_iter().collect())
    }

    /// Return a copy with `column` added, or replaced in place if its name exists.
    pub fn with_column(&self, column: Column) -> Result<Self> {
        let mut frame = self.frame.clone();
        frame.with_column(column)?;
        Ok(Self { frame })
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<Self> {
        if !self.has_column(from) {
            return Err(FormatError::missing(from));
        }
        if from != to && self.has_column(to) {
            return Err(FormatError::Shape(format!("duplicate column `{to}`")));
        }
        let mut frame = self.frame.clone();
        frame.rename(from, to.into())?;
        // polars 0.46 `rename` leaves a stale cached schema behind.
        frame.clear_schema();
        Ok(Self { frame })
    }

    /// Return a table holding only `names`, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        if let Some(missing) = names.iter().find(|name| !self.has_column(name)) {
            return Err(FormatError::missing(*missing));
        }
        Ok(Self {
            frame: self.frame.select(names.iter().copied())?,
        })
    }

    /// Return a table without `name`.
    pub fn drop_column(&self, name: &str) -> Result<Self> {
        if !self.has_column(name) {
            return Err(FormatError::missing(name));
        }
        Ok(Self {
            frame: self.frame.drop(name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{datetime_column, numeric_column, optional_datetime_column, text_column};
    use chrono::NaiveDate;

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let err = ObservationTable::new(vec![numeric_column("a", &[1.0, 2.0]), numeric_column("b", &[1.0])])
            .unwrap_err();
        assert!(matches!(err, FormatError::Shape(_)));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let err = ObservationTable::new(vec![numeric_column("a", &[1.0]), numeric_column("a", &[2.0])])
            .unwrap_err();
        assert!(matches!(err, FormatError::Shape(_)));
    }

    #[test]
    fn textual_timestamps_violate_precondition() {
        let table = ObservationTable::new(vec![text_column("Timestamp", &["2021-01-01 00:00"])]).unwrap();
        let err = table.timestamps("Timestamp").unwrap_err();
        assert!(matches!(err, FormatError::Precondition { ref field, .. } if field == "Timestamp"));
    }

    #[test]
    fn timestamps_round_trip_with_nulls() {
        let table =
            ObservationTable::new(vec![optional_datetime_column("Timestamp", [Some(ts(3)), None])]).unwrap();
        assert_eq!(table.timestamps("Timestamp").unwrap(), vec![Some(ts(3)), None]);
    }

    #[test]
    fn with_column_does_not_touch_original() {
        let table = ObservationTable::new(vec![numeric_column("x", &[1.0, 2.0])]).unwrap();
        let updated = table.with_column(numeric_column("x", &[5.0, 6.0])).unwrap();
        assert_eq!(table.numeric("x").unwrap(), vec![1.0, 2.0]);
        assert_eq!(updated.numeric("x").unwrap(), vec![5.0, 6.0]);
    }

    #[test]
    fn select_drop_and_rename() {
        let table = ObservationTable::new(vec![
            datetime_column("Timestamp", [ts(0), ts(1), ts(2)]),
            numeric_column("x", &[1.0, 2.0, 3.0]),
            numeric_column("y", &[4.0, 5.0, 6.0]),
        ])
        .unwrap();

        let picked = table.select(&["y", "Timestamp"]).unwrap();
        assert_eq!(picked.column_names(), vec!["y", "Timestamp"]);

        let dropped = table.drop_column("x").unwrap();
        assert_eq!(dropped.column_names(), vec!["Timestamp", "y"]);

        let renamed = table.rename("y", "z").unwrap();
        assert_eq!(renamed.column_names(), vec!["Timestamp", "x", "z"]);
        assert!(matches!(table.rename("x", "y"), Err(FormatError::Shape(_))));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = ObservationTable::new(vec![numeric_column("x", &[1.0])]).unwrap();
        assert_eq!(table.numeric("y").unwrap_err(), FormatError::missing("y"));
        assert_eq!(table.select(&["x", "y"]).unwrap_err(), FormatError::missing("y"));
    }

    #[test]
    fn text_is_not_numeric() {
        let table = ObservationTable::new(vec![text_column("s", &["a"])]).unwrap();
        assert!(matches!(table.numeric("s"), Err(FormatError::Precondition { .. })));
    }
}
