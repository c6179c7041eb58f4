//! Data types for documents, chunks, and retrieval results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A source document loaded into the corpus.
///
/// Immutable once loaded; owned by the session for the lifetime of a
/// corpus load. Chunks reference a document by [`id`](Document::id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier: a filename or URI.
    pub id: String,
    /// The raw text content of the document.
    pub text: String,
    /// Character length of the raw text at load time.
    pub length: usize,
}

impl Document {
    /// Create a document from an id and its raw text, recording its length.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self { id: id.into(), text, length }
    }
}

/// A bounded, possibly overlapping slice of one document's text.
///
/// Produced by the chunker from exactly one [`Document`]; never mutated
/// after creation. The unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The id of the parent [`Document`] (non-owning back-reference).
    pub document_id: String,
    /// 0-based index of this chunk within its document.
    pub chunk_index: usize,
    /// The text content of the chunk.
    pub text: String,
    /// Word index in the parent document where this chunk's window starts.
    pub word_start_offset: usize,
}

/// A retrieved [`Chunk`] paired with its similarity score and rank.
///
/// Ephemeral: produced per query, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity score in `[-1, 1]` (higher is more relevant).
    pub score: f32,
    /// 1-based position in the full ranked list, before any `min_score`
    /// filtering. Gaps in rank numbers indicate suppressed results.
    pub rank: usize,
}

/// The outcome of answering one question against the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// The generated answer text.
    pub answer: String,
    /// The ranked, scored chunks the answer was grounded on.
    pub sources: Vec<RetrievalResult>,
    /// When the answer was produced.
    pub answered_at: DateTime<Utc>,
}
