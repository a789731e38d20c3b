//! Unified error types for Mulberry operations.
//!
//! Structural failures (unreadable template, malformed spreadsheet, unknown
//! type or output format) abort a request before any document is produced.
//! Per-row conditions (absent column, empty cell) are not errors; they are
//! logged and the merge degrades gracefully for that row only.
use thiserror::Error;

/// Main error type for Mulberry operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template bytes cannot be opened as a Word document
    #[error("Template unreadable: {0}")]
    TemplateUnreadable(String),

    /// Requested contract type has no record in the catalog
    #[error("Contract type '{0}' not found in catalog")]
    TypeNotFound(String),

    /// The spreadsheet has no populated first row to use as a header
    #[error("No header row found in the worksheet")]
    NoHeaderRow,

    /// The spreadsheet has no used cell range at all
    #[error("No data range found in the worksheet")]
    NoDataRange,

    /// The catalog file exists but cannot be deserialized
    #[error("Catalog corrupt: {0}")]
    CatalogCorrupt(String),

    /// Writing the catalog or a stored template failed
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Output format string is not a known format
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),
}

/// Result type for Mulberry operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}
