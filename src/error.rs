//! Error types for triangle construction

use thiserror::Error;

/// Errors that abort a build
///
/// Value coercion failures and zero-denominator factors are not errors:
/// the former are counted on [`crate::records::NormalizedRecords`], the
/// latter are [`crate::triangle::Factor::Undefined`] cells.
#[derive(Error, Debug)]
pub enum TriangleError {
    /// A requested column is not present in the record set
    #[error("Column '{column}' not in input")]
    Schema { column: String },

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriangleError {
    pub fn schema(column: impl Into<String>) -> Self {
        TriangleError::Schema { column: column.into() }
    }

    /// Name of the missing column, for schema failures
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            TriangleError::Schema { column } => Some(column),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TriangleError>;
