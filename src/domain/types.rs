//! Station conventions and formatter settings.
//!
//! Column names follow the logger export conventions of each station type:
//!
//! - MET: `Spd {height}m E [m/s]`, `Spd {height}m SW [m/s]`, `Dir 57.2m S [°]`, `Pres 2m [hPa]`
//! - Lidar: `Spd {height}m [m/s]`
//! - ERA5: `Date/time [UTC]`
//!
//! Everything here is immutable configuration passed explicitly into the
//! operations that need it.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Canonical timestamp column shared by all formatted tables.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Derived hour-of-year column.
pub const HOUR_COLUMN: &str = "hour";

/// Derived wind-shear column.
pub const SHEAR_COLUMN: &str = "shear";

/// Station type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StationKind {
    #[serde(rename = "MET")]
    Met,
    Lidar,
}

impl StationKind {
    pub fn display_name(self) -> &'static str {
        match self {
            StationKind::Met => "MET",
            StationKind::Lidar => "Lidar",
        }
    }
}

/// Measurement heights (m) reported by each station type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightRegistry {
    heights: BTreeMap<StationKind, Vec<f64>>,
}

impl HeightRegistry {
    pub fn new(heights: BTreeMap<StationKind, Vec<f64>>) -> Self {
        Self { heights }
    }

    /// Heights for `kind`, empty if the station type is not registered.
    pub fn heights(&self, kind: StationKind) -> &[f64] {
        self.heights.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for HeightRegistry {
    fn default() -> Self {
        Self::new(BTreeMap::from([
            (StationKind::Met, vec![59.1, 46.0]),
            (StationKind::Lidar, vec![46.0, 40.0]),
        ]))
    }
}

/// Format a height the way logger column names spell it (`46`, `59.1`).
pub fn height_label(height: f64) -> String {
    format!("{height}")
}

/// Which physical MET sensor a wind direction trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorChoice {
    East,
    Southwest,
    /// Neither sensor is shadowed: average both.
    Mean,
}

/// Closed interval of wind directions in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub from_deg: f64,
    pub to_deg: f64,
}

impl Sector {
    pub const fn new(from_deg: f64, to_deg: f64) -> Self {
        Self { from_deg, to_deg }
    }

    pub fn contains(&self, direction: f64) -> bool {
        direction >= self.from_deg && direction <= self.to_deg
    }
}

/// Tower conventions for the MET directional adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetConvention {
    /// Height (m) of the single direction vane that drives every adjustment.
    pub direction_height: f64,
    /// Northeasterly sector: the southwest sensor sits in the tower wake.
    pub east_sector: Sector,
    /// Westerly sector: the east sensor sits in the tower wake.
    pub southwest_sector: Sector,
    pub pressure_column: String,
    /// Divisor applied to the pressure column (hPa → kPa).
    pub pressure_divisor: f64,
}

impl Default for MetConvention {
    fn default() -> Self {
        Self {
            direction_height: 57.2,
            east_sector: Sector::new(30.0, 60.0),
            southwest_sector: Sector::new(255.0, 285.0),
            pressure_column: "Pres 2m [hPa]".to_string(),
            pressure_divisor: 10.0,
        }
    }
}

impl MetConvention {
    pub fn direction_column(&self) -> String {
        format!("Dir {}m S [°]", height_label(self.direction_height))
    }

    /// Three-way sector lookup. A missing direction (`NaN`) averages both sensors.
    pub fn classify(&self, direction: f64) -> SensorChoice {
        if self.east_sector.contains(direction) {
            SensorChoice::East
        } else if self.southwest_sector.contains(direction) {
            SensorChoice::Southwest
        } else {
            SensorChoice::Mean
        }
    }
}

pub fn met_east_column(height: f64) -> String {
    format!("Spd {}m E [m/s]", height_label(height))
}

pub fn met_southwest_column(height: f64) -> String {
    format!("Spd {}m SW [m/s]", height_label(height))
}

pub fn adjusted_speed_column(height: f64) -> String {
    format!("adjusted_wind_speed_{}", height_label(height))
}

pub fn lidar_speed_column(height: f64) -> String {
    format!("Spd {}m [m/s]", height_label(height))
}

/// Lidar heights (m) used for the shear exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearHeights {
    pub upper: f64,
    pub reference: f64,
}

impl Default for ShearHeights {
    fn default() -> Self {
        Self {
            upper: 102.0,
            reference: 46.0,
        }
    }
}

/// Training-label rescaling.
///
/// Labels above `mean + std` are multiplied by `scale_up`; labels below
/// `mean - std` by `scale_low`. The band in between is untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScaling {
    pub scale_up: f64,
    #[serde(default = "neutral_scale")]
    pub scale_low: f64,
    pub label_column: String,
}

fn neutral_scale() -> f64 {
    1.0
}

impl LabelScaling {
    pub fn new(scale_up: f64) -> Self {
        Self {
            scale_up,
            scale_low: neutral_scale(),
            label_column: adjusted_speed_column(59.1),
        }
    }

    pub fn with_scale_low(mut self, scale_low: f64) -> Self {
        self.scale_low = scale_low;
        self
    }
}

impl Default for LabelScaling {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Reanalysis (ERA5) normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Era5Options {
    pub source_column: String,
    pub time_zone: Tz,
    /// Earliest retained local clock value (inclusive).
    pub start: NaiveDateTime,
}

impl Default for Era5Options {
    fn default() -> Self {
        Self {
            source_column: "Date/time [UTC]".to_string(),
            time_zone: chrono_tz::US::Mountain,
            start: NaiveDate::from_ymd_opt(2000, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }
}
