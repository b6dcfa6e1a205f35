//! Error types for the tableqa library.

use std::io;
use thiserror::Error;

/// Result type alias for tableqa operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction, indexing, and querying.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the source file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Table detection failed on a specific page.
    ///
    /// Under the default lenient mode the extractor recovers from this
    /// internally; it only escapes in strict mode.
    #[error("Table extraction failed on page {page}: {reason}")]
    PageExtraction {
        /// Page number (1-indexed) the failure occurred on.
        page: u32,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Error serializing extracted tables for output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The API credential environment variable is not set.
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    /// The query text was empty or whitespace-only.
    #[error("Query text must not be empty")]
    EmptyQuery,

    /// The embedding service was unreachable, rejected the batch, or
    /// returned a malformed response.
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    /// The completion service was unreachable or returned a malformed
    /// response.
    #[error("Query service error: {0}")]
    QueryService(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
