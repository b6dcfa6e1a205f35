//! Document-level table extraction.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};
use crate::model::RawTable;

use super::layout;
use super::options::{ErrorMode, ExtractOptions};
use super::stream::StreamDetector;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts tables from a PDF document.
///
/// Pages are processed strictly in increasing page order; each page runs an
/// independent stream-mode detection pass and may yield zero or more raw
/// tables. A document with no tables anywhere extracts to an empty list,
/// which is not an error.
pub struct TableExtractor {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl TableExtractor {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();

        let mut header = [0u8; 8];
        let mut file = File::open(path)?;
        let read = file.read(&mut header)?;
        check_magic(&header[..read])?;
        drop(file);

        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc, options)
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Open a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        check_magic(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc, options)
    }

    fn from_document(doc: LopdfDocument, options: ExtractOptions) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc, options })
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Extract all tables from the document, in page order then detection
    /// order within each page.
    ///
    /// A page whose detection pass fails contributes zero tables in the
    /// default lenient mode; in strict mode the first failing page aborts
    /// the extraction.
    pub fn extract(&self) -> Result<Vec<RawTable>> {
        let detector = StreamDetector::with_config(self.options.stream.clone());
        let page_numbers: Vec<u32> = self.doc.get_pages().keys().copied().collect();

        let mut tables = Vec::new();
        for page_num in page_numbers {
            match self.extract_page(&detector, page_num) {
                Ok(mut page_tables) => {
                    log::debug!(
                        "page {}: {} table(s) detected",
                        page_num,
                        page_tables.len()
                    );
                    tables.append(&mut page_tables);
                }
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::PageExtraction {
                            page: page_num,
                            reason: e.to_string(),
                        });
                    }
                    log::warn!("Skipping page {}: {}", page_num, e);
                }
            }
        }

        Ok(tables)
    }

    /// Extract tables from a single page (1-indexed).
    pub fn extract_page_tables(&self, page_num: u32) -> Result<Vec<RawTable>> {
        let detector = StreamDetector::with_config(self.options.stream.clone());
        self.extract_page(&detector, page_num)
    }

    fn extract_page(&self, detector: &StreamDetector, page_num: u32) -> Result<Vec<RawTable>> {
        let spans = layout::page_spans(&self.doc, page_num)?;
        let detections = detector.detect(spans);
        Ok(detections
            .iter()
            .map(|d| detector.to_raw_table(d, page_num))
            .collect())
    }
}

/// Verify the PDF header magic.
fn check_magic(data: &[u8]) -> Result<()> {
    if data.len() < PDF_MAGIC.len() || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}
