//! Error types for excelmap operations

use thiserror::Error;

/// Result type alias for excelmap operations
pub type Result<T> = std::result::Result<T, ExcelError>;

/// Main error type for all mapping operations
#[derive(Error, Debug)]
pub enum ExcelError {
    /// The workbook contains no sheets
    #[error("No sheet found in workbook")]
    NoSheetFound,

    /// Requested sheet does not exist
    #[error("Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// The active sheet has no header row to index
    #[error("Header row not found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String },

    /// No parser registered under the tag
    #[error("Tag parser not found: '{tag}'")]
    TagParserNotFound { tag: String },

    /// No parser registered for the field's value type
    #[error("Type parser not found: {type_name}")]
    TypeParserNotFound { type_name: &'static str },

    /// The record type exposes no mapping tags
    #[error("No mapping tag found on type {type_name}")]
    TagNotFound { type_name: &'static str },

    /// Unbounded decode hit the configured row cap with rows remaining
    #[error("Data count over limit, max: {max}")]
    RowCountOverLimit { max: usize },

    /// A cell value failed to parse into its field
    #[error("Failed to parse '{raw}' at row {row}, column {column}: {message}")]
    Parse {
        raw: String,
        column: usize,
        row: usize,
        message: String,
    },

    /// A registered parser produced a value of the wrong runtime type
    #[error("Parser for tag '{tag}' did not return a value of type {expected}")]
    FieldType { tag: String, expected: &'static str },

    /// Error from the read-side workbook
    #[error("Failed to read workbook: {0}")]
    Read(String),

    /// Error from the write-side workbook
    #[error("Failed to write workbook: {0}")]
    Write(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for ExcelError {
    fn from(err: calamine::Error) -> Self {
        ExcelError::Read(err.to_string())
    }
}

impl From<calamine::XlsxError> for ExcelError {
    fn from(err: calamine::XlsxError) -> Self {
        ExcelError::Read(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExcelError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExcelError::Write(err.to_string())
    }
}
