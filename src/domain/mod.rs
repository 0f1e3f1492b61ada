//! Domain types used throughout the formatter.
//!
//! This module defines:
//!
//! - station column-name conventions (`met_east_column`, `lidar_speed_column`, ...)
//! - the static height registry (`HeightRegistry`)
//! - the MET directional sectors (`MetConvention`, `SensorChoice`)
//! - operation settings (`LabelScaling`, `Era5Options`, `ShearHeights`)
//! - the bundled, environment-loadable `FormatterConfig`

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
