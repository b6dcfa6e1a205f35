//! # tableqa
//!
//! Extract tables from PDF documents and answer natural-language questions
//! about them using a hosted embedding and completion service.
//!
//! The pipeline has four stages: a stream-mode extractor pulls tabular
//! regions out of each page by whitespace alignment, a normalizer squares
//! ragged regions into rectangular grids, the corpus builder serializes
//! each grid to one text unit and embeds the batch in a single service
//! call, and the query engine answers questions by retrieving the closest
//! units and delegating synthesis to the completion model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tableqa::{OpenAiClient, Session};
//!
//! fn main() -> tableqa::Result<()> {
//!     let client = Arc::new(OpenAiClient::from_env()?);
//!
//!     let session = Session::open("report.pdf", client.clone(), client)?;
//!     println!("{} table(s) found", session.tables().len());
//!
//!     let answer = session.ask("What was Q3 revenue?")?;
//!     println!("{answer}");
//!
//!     Ok(())
//! }
//! ```
//!
//! Extraction alone needs no credentials:
//!
//! ```no_run
//! # fn main() -> tableqa::Result<()> {
//! let tables = tableqa::extract_tables("report.pdf")?;
//! for table in &tables {
//!     println!("{}\n", tableqa::render::to_aligned_text(table));
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod index;
pub mod model;
pub mod normalize;
pub mod query;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{ErrorMode, ExtractOptions, StreamConfig, TableExtractor};
pub use index::{build_index, ChatModel, Embedder, OpenAiClient, OpenAiConfig, TableIndex};
pub use model::{Grid, RawTable};
pub use normalize::{normalize, normalize_all};
pub use query::{QueryEngine, NO_INFORMATION_ANSWER};

use std::path::Path;
use std::sync::Arc;

/// Extract and normalize all tables from a PDF file.
///
/// # Example
///
/// ```no_run
/// let tables = tableqa::extract_tables("document.pdf").unwrap();
/// println!("Found {} tables", tables.len());
/// ```
pub fn extract_tables<P: AsRef<Path>>(path: P) -> Result<Vec<Grid>> {
    extract_tables_with_options(path, ExtractOptions::default())
}

/// Extract and normalize all tables with custom options.
pub fn extract_tables_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Vec<Grid>> {
    let extractor = TableExtractor::open_with_options(path, options)?;
    Ok(normalize_all(extractor.extract()?))
}

/// Extract raw (possibly ragged) table regions without normalizing.
pub fn extract_raw_tables<P: AsRef<Path>>(path: P) -> Result<Vec<RawTable>> {
    let extractor = TableExtractor::open(path)?;
    extractor.extract()
}

/// One document's worth of state: its normalized tables, the index handle
/// over their embedded corpus, and the engine that answers questions.
///
/// Created once per uploaded document; the index is immutable afterwards.
/// A failed question leaves the session usable — ask again.
pub struct Session {
    tables: Vec<Grid>,
    index: TableIndex,
    engine: QueryEngine,
}

impl Session {
    /// Open a PDF, extract and index its tables.
    ///
    /// Any extraction or indexing failure aborts the whole operation: no
    /// session (and no index) is produced.
    pub fn open<P: AsRef<Path>>(
        path: P,
        embedder: Arc<dyn Embedder>,
        model: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default(), embedder, model)
    }

    /// Open a PDF with custom extraction options.
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: ExtractOptions,
        embedder: Arc<dyn Embedder>,
        model: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let extractor = TableExtractor::open_with_options(path, options)?;
        Self::build(&extractor, embedder, model)
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(
        data: &[u8],
        embedder: Arc<dyn Embedder>,
        model: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let extractor = TableExtractor::from_bytes(data)?;
        Self::build(&extractor, embedder, model)
    }

    fn build(
        extractor: &TableExtractor,
        embedder: Arc<dyn Embedder>,
        model: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let tables = normalize_all(extractor.extract()?);
        let index = build_index(embedder.as_ref(), &tables)?;
        let engine = QueryEngine::new(embedder, model);
        Ok(Self {
            tables,
            index,
            engine,
        })
    }

    /// The normalized tables, in page then detection order.
    pub fn tables(&self) -> &[Grid] {
        &self.tables
    }

    /// The index handle over the embedded corpus.
    pub fn index(&self) -> &TableIndex {
        &self.index
    }

    /// Set how many text units are retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.engine = self.engine.with_top_k(top_k);
        self
    }

    /// Ask a question about the document's tables.
    pub fn ask(&self, question: &str) -> Result<String> {
        self.engine.answer(&self.index, question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubEmbedder;

    impl Embedder for StubEmbedder {
        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0]).collect())
        }
    }

    struct StubModel;

    impl ChatModel for StubModel {
        fn complete(&self, _prompt: &str) -> Result<String> {
            Ok("stub answer".to_string())
        }
    }

    #[test]
    fn test_session_from_invalid_bytes_fails() {
        let result = Session::from_bytes(b"not a pdf", Arc::new(StubEmbedder), Arc::new(StubModel));
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_tables_missing_file() {
        let result = extract_tables("/nonexistent/missing.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
