//! Error type shared by the fetch and export pipeline

use thiserror::Error;

/// Everything that can go wrong between receiving an export request and
/// handing back a workbook.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Issue {key} has no textRange; cannot derive its line range")]
    MissingTextRange { key: String },

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

impl ExportError {
    /// HTTP-equivalent status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ExportError::MissingFields(_) => 400,
            _ => 500,
        }
    }

    /// True when the caller supplied bad input and no network call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, ExportError::MissingFields(_))
    }
}
