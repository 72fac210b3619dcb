//! Custom error types for the growth tracker.
//!
//! Data-quality problems never surface here: missing cells, bad numbers and
//! unparseable dates are normalized by the cleaner. What remains are the
//! fatal conditions (unreadable input, failed writes, broken charts) and
//! programming errors such as asking for a column that does not exist.
//!
//! Errors serialize as `{ "code", "message" }` so they can be embedded in
//! the JSON summary report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The file extension is not one the loader or writer understands.
    #[error("Unsupported file format '{extension}' for {path}")]
    UnsupportedFormat { path: String, extension: String },

    /// The workbook has no worksheet to read.
    #[error("Workbook '{0}' contains no worksheets")]
    EmptyWorkbook(String),

    /// Chart rendering failed.
    #[error("Failed to render chart '{chart}': {reason}")]
    Chart { chart: String, reason: String },

    /// A stage broke an invariant it is supposed to guarantee.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Spreadsheet read error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Spreadsheet write error.
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TrackerError>,
    },
}

impl TrackerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TrackerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a chart error from any displayable drawing failure.
    pub fn chart(chart: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        TrackerError::Chart {
            chart: chart.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable error code, used in the JSON report and for exit diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::EmptyWorkbook(_) => "EMPTY_WORKBOOK",
            Self::Chart { .. } => "CHART_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Xlsx(_) => "XLSX_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error came from touching the filesystem.
    pub fn is_io(&self) -> bool {
        match self {
            Self::Io(_) | Self::Spreadsheet(_) | Self::Xlsx(_) => true,
            Self::WithContext { source, .. } => source.is_io(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for TrackerError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        TrackerError::InvalidConfig(err.to_string())
    }
}

impl Serialize for TrackerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TrackerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TrackerError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TrackerError::Io(e).with_context(context))
    }
}
