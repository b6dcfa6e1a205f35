//! Question answering over an embedded table index.
//!
//! Retrieval and synthesis are both delegated: the question is embedded,
//! the closest text units are pulled from the index by cosine similarity,
//! and the completion collaborator turns units plus question into a single
//! answer string.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::index::{ChatModel, Embedder, IndexEntry, TableIndex};

/// Answer returned for any query against an empty corpus.
pub const NO_INFORMATION_ANSWER: &str =
    "No information available: no tables were found in the document.";

/// Default number of text units retrieved per question.
const DEFAULT_TOP_K: usize = 4;

/// Answers free-text questions against a [`TableIndex`].
pub struct QueryEngine {
    embedder: Arc<dyn Embedder>,
    model: Arc<dyn ChatModel>,
    top_k: usize,
}

impl QueryEngine {
    /// Create an engine over the given collaborators.
    pub fn new(embedder: Arc<dyn Embedder>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            embedder,
            model,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set how many text units are retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Answer a question against the index.
    ///
    /// Returns exactly one answer string. The index is left untouched by
    /// failures: a failed question can simply be retried.
    pub fn answer(&self, index: &TableIndex, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuery);
        }

        if index.is_empty() {
            log::debug!("query against empty index; returning fixed answer");
            return Ok(NO_INFORMATION_ANSWER.to_string());
        }

        let query_embedding = self
            .embedder
            .embed_batch(std::slice::from_ref(&question.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::EmbeddingService("no embedding returned for query".to_string())
            })?;

        let retrieved = index.top_matches(&query_embedding, self.top_k);
        log::debug!("retrieved {} unit(s) for question", retrieved.len());

        let prompt = build_prompt(&retrieved, question);
        self.model.complete(&prompt)
    }
}

/// Assemble the synthesis prompt from retrieved units and the question.
fn build_prompt(units: &[&IndexEntry], question: &str) -> String {
    let mut prompt = String::from(
        "Answer the question using only the tables below, which were \
         extracted from a PDF document. If the tables do not contain the \
         answer, say so.\n\n",
    );

    for (i, unit) in units.iter().enumerate() {
        prompt.push_str(&format!("Table {}:\n{}\n\n", i + 1, unit.text));
    }

    prompt.push_str(&format!("Question: {question}\nAnswer:"));
    prompt
}
