//! Calendar expressions.

use polars::prelude::*;

/// Hours elapsed since Jan 1st 00:00 of the timestamp's own year.
///
/// `(day_of_year - 1) * 24 + hour_of_day`, so Jan 1st 00:00 is hour 0 and
/// Dec 31st 23:00 of a non-leap year is hour 8759. Minutes are ignored and
/// a null timestamp yields null.
pub fn hour_of_year(ts: Expr) -> Expr {
    let day = ts.clone().dt().ordinal_day().cast(DataType::Int64);
    let hour = ts.dt().hour().cast(DataType::Int64);
    (day - lit(1i64)) * lit(24i64) + hour
}
