//! Table extraction from PDF documents.
//!
//! The extractor walks pages in increasing page order, pulls positioned text
//! spans out of each page's content stream, and runs a stream-mode detection
//! pass over them: tables are inferred from column-aligned whitespace rather
//! than ruled lines, which handles the borderless tables that line-based
//! detection misses.

mod extractor;
mod layout;
mod options;
mod stream;

pub use extractor::TableExtractor;
pub use layout::TextSpan;
pub use options::{ErrorMode, ExtractOptions};
pub use stream::{Detection, RowGroup, StreamConfig, StreamDetector};
