//! In-memory tabular data.
//!
//! Input tables are produced by an external loader; output tables are handed
//! to a training pipeline. This crate never reads or writes files itself.

pub mod column;
pub mod frame;

pub use column::*;
pub use frame::*;
