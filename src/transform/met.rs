//! MET tower directional sensor fusion.
//!
//! Each configured height carries two cup anemometers on opposite booms
//! (east and southwest). Depending on the approach direction one of them sits
//! in the tower wake, so the single vane at 57.2 m selects which reading to
//! trust:
//!
//! | direction        | adjusted speed        |
//! |------------------|-----------------------|
//! | `[30°, 60°]`     | east sensor           |
//! | `[255°, 285°]`   | southwest sensor      |
//! | anything else    | mean of both sensors  |
//!
//! Barometric pressure is rescaled from hPa to kPa in the same pass.

use polars::prelude::*;
use tracing::{debug, warn};

use crate::domain::{
    HeightRegistry, MetConvention, Sector, StationKind, adjusted_speed_column, met_east_column,
    met_southwest_column,
};
use crate::error::Result;
use crate::table::ObservationTable;

/// True where `direction` lies inside `sector` (both bounds inclusive).
///
/// `NaN` and null directions fall outside every sector.
fn in_sector(direction: &Expr, sector: Sector) -> Expr {
    direction
        .clone()
        .gt_eq(lit(sector.from_deg))
        .and(direction.clone().lt_eq(lit(sector.to_deg)))
        .and(direction.clone().is_not_nan())
        .fill_null(lit(false))
}

/// Add `adjusted_wind_speed_{height}` for every MET height and convert pressure.
///
/// All required columns are checked before anything is computed, so a missing
/// field never yields a partially adjusted table.
///
/// # Errors
/// `MissingField` naming the first absent column (direction, a speed sensor, or pressure).
pub fn adjust_wind_met(
    table: &ObservationTable,
    registry: &HeightRegistry,
    convention: &MetConvention,
) -> Result<ObservationTable> {
    let direction_column = convention.direction_column();
    table.require_numeric(&direction_column)?;
    let heights = registry.heights(StationKind::Met);
    for &height in heights {
        table.require_numeric(&met_east_column(height))?;
        table.require_numeric(&met_southwest_column(height))?;
    }
    table.require_numeric(&convention.pressure_column)?;

    let direction = col(direction_column.as_str()).cast(DataType::Float64);
    let east_sector = in_sector(&direction, convention.east_sector);
    let southwest_sector = in_sector(&direction, convention.southwest_sector);

    let mut fused: Vec<Expr> = heights
        .iter()
        .map(|&height| {
            let east = col(met_east_column(height)).cast(DataType::Float64);
            let southwest = col(met_southwest_column(height)).cast(DataType::Float64);
            when(east_sector.clone())
                .then(east.clone())
                .when(southwest_sector.clone())
                .then(southwest.clone())
                .otherwise((east + southwest) / lit(2.0))
                .alias(adjusted_speed_column(height))
        })
        .collect();
    fused.push(
        (col(convention.pressure_column.as_str()).cast(DataType::Float64) / lit(convention.pressure_divisor))
            .alias(convention.pressure_column.as_str()),
    );

    let out = ObservationTable::from_frame(table.lazy().with_columns(fused).collect()?);

    for &height in heights {
        let column = adjusted_speed_column(height);
        let faulty = count_non_finite(
            &out.numeric(&column)?,
            &table.numeric(&met_east_column(height))?,
            &table.numeric(&met_southwest_column(height))?,
        );
        if faulty > 0 {
            warn!(column = %column, count = faulty, "non-finite adjusted wind speeds");
        }
    }

    debug!(rows = out.n_rows(), heights = heights.len(), "adjusted MET wind speeds");
    Ok(out)
}

/// Non-finite outputs that were not already missing in either sensor.
fn count_non_finite(adjusted: &[f64], east: &[f64], southwest: &[f64]) -> usize {
    adjusted
        .iter()
        .zip(east.iter().zip(southwest))
        .filter(|(v, (e, sw))| !v.is_finite() && !e.is_nan() && !sw.is_nan())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::table::numeric_column;
    use tracing_test::traced_test;

    fn met_table(direction: &[f64], east: &[f64], southwest: &[f64]) -> ObservationTable {
        let lower = |v: &[f64]| v.iter().map(|x| x - 1.0).collect::<Vec<_>>();
        ObservationTable::new(vec![
            numeric_column("Dir 57.2m S [°]", direction),
            numeric_column("Spd 59.1m E [m/s]", east),
            numeric_column("Spd 59.1m SW [m/s]", southwest),
            numeric_column("Spd 46m E [m/s]", &lower(east)),
            numeric_column("Spd 46m SW [m/s]", &lower(southwest)),
            numeric_column("Pres 2m [hPa]", &vec![1013.0; direction.len()]),
        ])
        .unwrap()
    }

    fn adjust(table: &ObservationTable) -> Result<ObservationTable> {
        adjust_wind_met(table, &HeightRegistry::default(), &MetConvention::default())
    }

    #[test]
    fn direction_selects_sensor() {
        let table = met_table(&[45.0, 270.0, 0.0, 170.0], &[8.0; 4], &[6.0; 4]);
        let out = adjust(&table).unwrap();

        assert_eq!(out.numeric("adjusted_wind_speed_59.1").unwrap(), vec![8.0, 6.0, 7.0, 7.0]);
        assert_eq!(out.numeric("adjusted_wind_speed_46").unwrap(), vec![7.0, 5.0, 6.0, 6.0]);
    }

    #[test]
    fn sector_bounds_are_inclusive() {
        let table = met_table(&[30.0, 60.0, 255.0, 285.0, 29.9, 285.1], &[8.0; 6], &[6.0; 6]);
        let out = adjust(&table).unwrap();
        assert_eq!(
            out.numeric("adjusted_wind_speed_59.1").unwrap(),
            vec![8.0, 8.0, 6.0, 6.0, 7.0, 7.0]
        );
    }

    #[test]
    fn missing_direction_uses_mean() {
        let table = met_table(&[f64::NAN], &[8.0], &[6.0]);
        let out = adjust(&table).unwrap();
        assert_eq!(out.numeric("adjusted_wind_speed_59.1").unwrap(), vec![7.0]);
    }

    #[test]
    fn east_sector_ignores_southwest_value() {
        let table = met_table(&[45.0, 45.0], &[9.5, 9.5], &[f64::NAN, 100.0]);
        let out = adjust(&table).unwrap();
        assert_eq!(out.numeric("adjusted_wind_speed_59.1").unwrap(), vec![9.5, 9.5]);
    }

    #[test]
    fn pressure_is_divided_by_ten() {
        let table = met_table(&[0.0], &[1.0], &[1.0]);
        let out = adjust(&table).unwrap();
        let p = out.numeric("Pres 2m [hPa]").unwrap();
        assert!((p[0] - 101.3).abs() < 1e-9);
        // Caller's table still holds hPa.
        assert_eq!(table.numeric("Pres 2m [hPa]").unwrap(), vec![1013.0]);
    }

    #[test]
    fn missing_sensor_column_fails_without_output() {
        let table = met_table(&[0.0], &[1.0], &[1.0]);
        let partial = table.drop_column("Spd 46m SW [m/s]").unwrap();
        assert_eq!(adjust(&partial).unwrap_err(), FormatError::missing("Spd 46m SW [m/s]"));
    }

    #[test]
    fn missing_pressure_column_fails() {
        let table = met_table(&[0.0], &[1.0], &[1.0]);
        let partial = table.drop_column("Pres 2m [hPa]").unwrap();
        assert_eq!(adjust(&partial).unwrap_err(), FormatError::missing("Pres 2m [hPa]"));
    }

    #[test]
    fn opposite_infinities_count_as_non_finite() {
        // Mean branch: (inf + -inf) / 2 is NaN although neither reading is missing.
        assert_eq!(count_non_finite(&[f64::NAN], &[f64::INFINITY], &[f64::NEG_INFINITY]), 1);
        assert_eq!(count_non_finite(&[f64::NAN], &[f64::NAN], &[3.0]), 0);
        assert_eq!(count_non_finite(&[4.0], &[4.0], &[4.0]), 0);
    }

    #[test]
    #[traced_test]
    fn non_finite_adjusted_speed_is_logged() {
        let table = met_table(&[0.0], &[f64::INFINITY], &[f64::NEG_INFINITY]);
        let out = adjust(&table).unwrap();
        assert!(out.numeric("adjusted_wind_speed_59.1").unwrap()[0].is_nan());
        assert!(logs_contain("non-finite adjusted wind speeds"));
    }

    #[test]
    #[traced_test]
    fn missing_readings_are_not_reported() {
        let table = met_table(&[0.0], &[f64::NAN], &[5.0]);
        let _ = adjust(&table).unwrap();
        assert!(!logs_contain("non-finite adjusted wind speeds"));
    }
}
