//! The transformation routines.
//!
//! Each operation takes an immutable table (plus any settings it needs) and
//! returns a new table; none of them mutates the caller's data. They are
//! independent and can be composed in whatever order suits a source.
//!
//! - `resample`: hourly (with hour-of-year) and six-hourly means
//! - `met`: directional sensor fusion + pressure conversion
//! - `era5`: reanalysis time-zone normalization and truncation
//! - `filter`: inclusive date-range selection
//! - `shear`: lidar power-law shear exponent
//! - `scale`: training-label rescaling

pub mod era5;
pub mod filter;
pub mod met;
pub mod resample;
pub mod scale;
pub mod shear;

pub use era5::*;
pub use filter::*;
pub use met::*;
pub use resample::*;
pub use scale::*;
pub use shear::*;
