//! Error types.
//!
//! - `FormatError` is the library taxonomy returned by every transformation.
//! - `AppError` is what the `wf` binary reports: a message plus a process exit code.
//!
//! Non-finite numeric results (e.g. shear over a zero speed) are *not* errors.
//! They are propagated in the output and surfaced as `tracing` warnings.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Convenience alias for library results.
pub type Result<T> = std::result::Result<T, FormatError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// A field exists but does not have the shape an operation requires
    /// (e.g. a textual timestamp where a parsed date-time is needed).
    #[error("Precondition failed for `{field}`: {reason}")]
    Precondition { field: String, reason: String },

    #[error("Missing required column: `{field}`")]
    MissingField { field: String },

    #[error("Invalid timestamp '{value}' in `{field}` (row {row})")]
    TimestampParse { field: String, row: usize, value: String },

    /// Table construction failed (length mismatch or duplicate column name).
    #[error("Invalid table shape: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other failure raised by the dataframe engine.
    #[error("Table operation failed: {0}")]
    Frame(String),
}

impl From<PolarsError> for FormatError {
    fn from(err: PolarsError) -> Self {
        match err {
            PolarsError::ShapeMismatch(_) | PolarsError::Duplicate(_) => FormatError::Shape(err.to_string()),
            other => FormatError::Frame(other.to_string()),
        }
    }
}

impl FormatError {
    pub fn precondition(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FormatError> for AppError {
    fn from(err: FormatError) -> Self {
        let exit_code = match err {
            FormatError::Precondition { .. }
            | FormatError::MissingField { .. }
            | FormatError::TimestampParse { .. }
            | FormatError::Config(_) => 2,
            FormatError::Shape(_) | FormatError::Frame(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_message_names_field() {
        let err = FormatError::precondition("Timestamp", "column holds text, not date-times");
        assert!(err.to_string().contains("`Timestamp`"));
    }

    #[test]
    fn format_errors_map_to_exit_codes() {
        let app: AppError = FormatError::missing("Pres 2m [hPa]").into();
        assert_eq!(app.exit_code(), 2);
        assert_eq!(app.to_string(), "Missing required column: `Pres 2m [hPa]`");

        let app: AppError = FormatError::Shape("length mismatch".to_string()).into();
        assert_eq!(app.exit_code(), 4);
    }

    #[test]
    fn polars_shape_errors_keep_their_category() {
        let err: FormatError = PolarsError::ShapeMismatch("3 rows vs 2 rows".into()).into();
        assert!(matches!(err, FormatError::Shape(_)));

        let err: FormatError = PolarsError::ComputeError("boom".into()).into();
        assert!(matches!(err, FormatError::Frame(ref msg) if msg.contains("boom")));
    }
}
