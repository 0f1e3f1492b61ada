//! Power-law wind shear from two lidar heights.
//!
//! ```text
//! shear = ln(v_upper / v_ref) / ln(h_upper / h_ref)
//! ```
//!
//! A zero or negative speed yields `inf`/`NaN`. Those values are kept in the
//! output (they flag a sensor fault upstream) and reported as a warning.

use tracing::{debug, warn};

use crate::domain::{SHEAR_COLUMN, ShearHeights, TIMESTAMP_COLUMN, lidar_speed_column};
use crate::error::Result;
use crate::table::{ObservationTable, numeric_column};

/// Shear exponent for a single pair of speeds.
pub fn shear_exponent(upper_speed: f64, reference_speed: f64, heights: ShearHeights) -> f64 {
    (upper_speed / reference_speed).ln() / (heights.upper / heights.reference).ln()
}

/// Two-column `(Timestamp, shear)` table.
///
/// # Errors
/// `MissingField` if the timestamp or either speed column is absent.
pub fn wind_shear(lidar: &ObservationTable, heights: ShearHeights) -> Result<ObservationTable> {
    let timestamps = lidar.column(TIMESTAMP_COLUMN)?.clone();
    let upper = lidar.numeric(&lidar_speed_column(heights.upper))?;
    let reference = lidar.numeric(&lidar_speed_column(heights.reference))?;

    let shear: Vec<f64> = upper
        .iter()
        .zip(&reference)
        .map(|(&u, &r)| shear_exponent(u, r, heights))
        .collect();

    let faulty = shear
        .iter()
        .zip(upper.iter().zip(&reference))
        .filter(|(s, (u, r))| !s.is_finite() && !u.is_nan() && !r.is_nan())
        .count();
    if faulty > 0 {
        warn!(count = faulty, "non-finite wind shear (zero or negative lidar speed)");
    }
    debug!(rows = shear.len(), "computed wind shear");

    ObservationTable::new(vec![timestamps, numeric_column(SHEAR_COLUMN, &shear)])
}
