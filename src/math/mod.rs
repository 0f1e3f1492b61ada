//! Numeric and calendar utilities shared by the transformations.

pub mod calendar;
pub mod stats;

pub use calendar::*;
pub use stats::*;
