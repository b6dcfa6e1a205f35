//! Corpus building and the embedded table index.
//!
//! The index is the session's one handle onto the embedded corpus: each
//! normalized table becomes exactly one text unit, the whole batch is
//! submitted to the embedding collaborator in a single call, and the
//! resulting vectors live in memory for the life of the session.

mod openai;

pub use openai::{OpenAiClient, OpenAiConfig};

use crate::error::{Error, Result};
use crate::model::Grid;
use crate::render;

/// Produces embedding vectors for batches of text.
///
/// The narrow seam onto the external embedding service; implementations
/// must return exactly one vector per input text, in input order.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts in one service call.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Produces a completion for a prompt.
///
/// The narrow seam onto the external completion service.
pub trait ChatModel: Send + Sync {
    /// Complete a prompt and return the reply text.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// One embedded text unit in the index.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// The serialized table text submitted for embedding
    pub text: String,
    /// The embedding vector returned by the service
    pub embedding: Vec<f32>,
}

/// An embedded, queryable corpus of table text units.
///
/// Immutable after construction. An index built over zero tables is valid
/// and answers every query with the defined no-information response.
#[derive(Debug, Default)]
pub struct TableIndex {
    entries: Vec<IndexEntry>,
}

impl TableIndex {
    /// An index over an empty corpus.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of indexed text units.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The indexed entries, in ingestion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// The `k` entries most similar to the query vector, best first.
    pub fn top_matches(&self, query: &[f32], k: usize) -> Vec<&IndexEntry> {
        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(k).map(|(_, e)| e).collect()
    }
}

/// Build an index over a batch of normalized tables.
///
/// Each grid serializes to one text unit; the full batch goes to the
/// embedding service in a single call. An empty batch produces an empty
/// index without contacting the service. Degenerate grids that render to
/// nothing are dropped before submission — the service has nothing to
/// embed for them.
pub fn build_index(embedder: &dyn Embedder, grids: &[Grid]) -> Result<TableIndex> {
    let units: Vec<String> = grids
        .iter()
        .map(render::to_aligned_text)
        .filter(|u| !u.is_empty())
        .collect();

    if units.is_empty() {
        log::debug!("no text units to index; returning empty index");
        return Ok(TableIndex::empty());
    }

    log::info!("embedding {} text unit(s)", units.len());
    let embeddings = embedder.embed_batch(&units)?;

    if embeddings.len() != units.len() {
        return Err(Error::EmbeddingService(format!(
            "expected {} embeddings, service returned {}",
            units.len(),
            embeddings.len()
        )));
    }

    let entries = units
        .into_iter()
        .zip(embeddings)
        .map(|(text, embedding)| IndexEntry { text, embedding })
        .collect();

    Ok(TableIndex { entries })
}

/// Cosine similarity between two vectors. Zero for mismatched lengths or
/// zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grid;

    /// Embedder that counts calls and returns fixed-dimension vectors.
    struct CountingEmbedder {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl Embedder for CountingEmbedder {
        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    /// Embedder that always returns the wrong number of vectors.
    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![])
        }
    }

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            1,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_build_index_one_entry_per_grid() {
        let embedder = CountingEmbedder::new();
        let grids = vec![grid(&[&["a", "b"]]), grid(&[&["c", "d"]])];

        let index = build_index(&embedder, &grids).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(embedder.calls(), 1, "whole batch must go in one call");
    }

    #[test]
    fn test_build_index_empty_batch_never_calls_service() {
        let embedder = CountingEmbedder::new();
        let index = build_index(&embedder, &[]).unwrap();

        assert!(index.is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[test]
    fn test_build_index_drops_degenerate_grids() {
        let embedder = CountingEmbedder::new();
        let grids = vec![Grid::empty(1), grid(&[&["x"]])];

        let index = build_index(&embedder, &grids).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_build_index_count_mismatch_is_service_error() {
        let result = build_index(&BrokenEmbedder, &[grid(&[&["a"]])]);
        assert!(matches!(result, Err(Error::EmbeddingService(_))));
    }

    #[test]
    fn test_cosine_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_top_matches_ranking() {
        let index = TableIndex {
            entries: vec![
                IndexEntry {
                    text: "far".to_string(),
                    embedding: vec![0.0, 1.0],
                },
                IndexEntry {
                    text: "near".to_string(),
                    embedding: vec![1.0, 0.1],
                },
            ],
        };

        let matches = index.top_matches(&[1.0, 0.0], 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "near");
    }

    #[test]
    fn test_top_matches_empty_index() {
        let index = TableIndex::empty();
        assert!(index.top_matches(&[1.0], 5).is_empty());
    }
}
