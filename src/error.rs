//! Error types for the housing analysis pipeline.
//!
//! Every stage validates its column preconditions before doing numeric work
//! and reports failures through [`AnalysisError`]. Errors serialize as a
//! `{code, message}` pair so a renderer can show them without matching on
//! the Rust enum.

use serde::ser::SerializeStruct;
use serde::Serialize;
use thiserror::Error;

/// The main error type for loading, cleaning and aggregating a table.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The delimited-text source is malformed.
    #[error("Malformed input{}: {reason}", line_suffix(.line))]
    Format { line: Option<u64>, reason: String },

    /// A referenced column is absent from the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Every value in the column is missing.
    #[error("No values present in column '{0}'")]
    EmptyColumn(String),

    /// The table has no rows to aggregate.
    #[error("Table has no rows")]
    EmptyTable,

    /// Normalization cannot be performed on this column.
    #[error("Cannot normalize column '{column}': {reason}")]
    DegenerateInput { column: String, reason: String },

    /// A numeric computation met a text value.
    #[error("Non-numeric value '{value}' in column '{column}' (row {row})")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No table has been loaded yet.
    #[error("No data loaded")]
    NoDataLoaded,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error wrapper.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Stable code for consumers that present errors to an end user.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Format { .. } => "FORMAT_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::EmptyColumn(_) => "EMPTY_COLUMN",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::DegenerateInput { .. } => "DEGENERATE_INPUT",
            Self::NonNumeric { .. } => "NON_NUMERIC",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::Io(_) => "IO_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    pub(crate) fn format(line: Option<u64>, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(column: &str, reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(l) => format!(" at line {l}"),
        None => String::new(),
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
