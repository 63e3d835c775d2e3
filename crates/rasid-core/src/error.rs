//! Error types for the rasid-core library.

use thiserror::Error;

use crate::models::receipt::SemanticRole;

/// Main error type for the rasid library.
#[derive(Error, Debug)]
pub enum RasidError {
    /// Spreadsheet ingest error.
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// The whole batch was rejected.
    #[error("{0}")]
    Batch(#[from] BatchError),

    /// Rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Batch-level failures. Each one rejects the entire uploaded table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// No data rows left after applying the row cap.
    #[error("spreadsheet is empty or contains no data")]
    EmptyTable,

    /// One or more semantic roles matched no header.
    #[error(
        "required columns not found (missing: {}). Found: {}. Need: Payee Name, Amount, Work",
        join_roles(.missing),
        .headers.join(", ")
    )]
    MissingColumns {
        missing: Vec<SemanticRole>,
        headers: Vec<String>,
    },

    /// Every row was rejected during validation.
    #[error("no valid data found in the spreadsheet; check the column names and data format")]
    NoValidData,
}

fn join_roles(roles: &[SemanticRole]) -> String {
    roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while turning an uploaded file into a raw table.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The file extension is not accepted.
    #[error("unsupported file format: {0} (expected one of: {1})")]
    UnsupportedFormat(String, String),

    /// The file exceeds the configured size limit.
    #[error("file size too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    /// The workbook could not be opened or a sheet could not be read.
    #[error("failed to read workbook: {0}")]
    Workbook(String),

    /// The requested worksheet does not exist.
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// CSV parsing failed.
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by receipt renderers.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Nothing to render.
    #[error("no receipts to render")]
    NoReceipts,

    /// The PDF document could not be assembled or written.
    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

/// Result type for the rasid library.
pub type Result<T> = std::result::Result<T, RasidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_messages_are_distinct() {
        let empty = BatchError::EmptyTable.to_string();
        let invalid = BatchError::NoValidData.to_string();
        assert_ne!(empty, invalid);
    }

    #[test]
    fn test_missing_columns_message() {
        let err = BatchError::MissingColumns {
            missing: vec![SemanticRole::Work],
            headers: vec!["Name".to_string(), "Cost".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing: Work"));
        assert!(msg.contains("Found: Name, Cost"));
    }
}
