//! Word-window document chunking.
//!
//! [`WordChunker`] splits a document into overlapping windows of whole
//! words. Chunking is pure: the same text and parameters always produce
//! the same chunks.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// Splits text into overlapping fixed-size word windows.
///
/// Windows are `chunk_size` words long and advance by
/// `chunk_size - overlap` words per step. The final window may be shorter
/// than `chunk_size` and is still emitted, so every word of the input is
/// covered by at least one chunk.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::WordChunker;
///
/// let chunker = WordChunker::new(500, 50)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct WordChunker {
    chunk_size: usize,
    overlap: usize,
}

impl WordChunker {
    /// Create a new `WordChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of words per chunk, must be positive
    /// * `overlap` — number of words shared between consecutive chunks,
    ///   must be strictly less than `chunk_size`
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `overlap >= chunk_size`. Invalid parameters are rejected, never
    /// silently repaired.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Split a document into overlapping word-window chunks.
    ///
    /// Returns an empty `Vec` for a document with no words. A document with
    /// fewer than `chunk_size` words yields exactly one chunk containing the
    /// whole text. Iteration stops after the window that reaches the last
    /// word, so no starting offset is ever chunked twice.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let words: Vec<&str> = document.text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        loop {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(Chunk {
                document_id: document.id.clone(),
                chunk_index,
                text: words[start..end].join(" "),
                word_start_offset: start,
            });
            if end == words.len() {
                break;
            }
            chunk_index += 1;
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::new("test.txt", text)
    }

    #[test]
    fn overlapping_windows() {
        let chunker = WordChunker::new(4, 1).unwrap();
        let chunks = chunker.chunk(&doc("a b c d e f"));
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b c d", "d e f"]);
        assert_eq!(chunks[0].word_start_offset, 0);
        assert_eq!(chunks[1].word_start_offset, 3);
        assert_eq!(chunks[1].chunk_index, 1);
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunker = WordChunker::new(10, 2).unwrap();
        let chunks = chunker.chunk(&doc("only three words"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "only three words");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = WordChunker::new(4, 1).unwrap();
        assert!(chunker.chunk(&doc("")).is_empty());
        assert!(chunker.chunk(&doc("   \n\t  ")).is_empty());
    }

    #[test]
    fn chunk_count_matches_window_formula() {
        // ceil((word_count - overlap) / (chunk_size - overlap)) for
        // word_count > chunk_size, else 1.
        for (word_count, chunk_size, overlap) in
            [(100, 10, 3), (57, 8, 2), (6, 4, 1), (4, 4, 1), (1, 4, 0), (500, 500, 50)]
        {
            let text = vec!["w"; word_count].join(" ");
            let chunker = WordChunker::new(chunk_size, overlap).unwrap();
            let chunks = chunker.chunk(&doc(&text));
            let expected = if word_count > chunk_size {
                (word_count - overlap).div_ceil(chunk_size - overlap)
            } else {
                1
            };
            assert_eq!(chunks.len(), expected, "size {chunk_size}, overlap {overlap}");
        }
    }

    #[test]
    fn every_word_is_covered() {
        let words: Vec<String> = (0..37).map(|i| format!("w{i}")).collect();
        let text = words.join(" ");
        let chunker = WordChunker::new(5, 2).unwrap();
        let chunks = chunker.chunk(&doc(&text));
        let covered: String = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        for word in &words {
            assert!(covered.split_whitespace().any(|w| w == word), "missing {word}");
        }
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(matches!(WordChunker::new(0, 0), Err(RagError::Config(_))));
        assert!(matches!(WordChunker::new(4, 4), Err(RagError::Config(_))));
        assert!(matches!(WordChunker::new(4, 9), Err(RagError::Config(_))));
    }
}
