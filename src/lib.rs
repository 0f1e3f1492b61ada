//! `wind-format` library crate.
//!
//! Reformats meteorological time series (MET towers, lidar units, ERA5
//! reanalysis) into normalized hourly / six-hourly tables for training a
//! long-term wind-resource model.
//!
//! The binary (`wf`) is a thin demo wrapper around this library so that:
//!
//! - every transformation is testable without spawning processes
//! - callers with their own loaders can use the routines directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod math;
pub mod report;
pub mod table;
pub mod transform;

pub use error::{FormatError, Result};
pub use table::ObservationTable;
