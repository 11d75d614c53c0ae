//! Error kinds surfaced by the report pipeline.

use thiserror::Error;

/// Failures a caller can act on. Every operation in the crate is pure over
/// its input, so retrying with the same data fails the same way.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required column is missing, a score cell is not numeric, or a
    /// configuration value is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The loaded table contains no student rows.
    #[error("no student records to analyze")]
    EmptyInput,

    /// The document exporter could not produce a document. Results computed
    /// before the export step stay valid.
    #[error("export failed: {0}")]
    ExportFailed(String),

    /// Writing the HTML document or a chart into its buffer failed.
    #[error("report rendering failed")]
    Render(#[from] std::fmt::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::InvalidInput(format!("malformed CSV: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
