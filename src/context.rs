//! Context assembly: ranked chunks → one bounded prompt-context string.

use crate::document::RetrievalResult;

/// Returned in place of an empty context so the downstream prompt stays
/// well-formed even when retrieval found nothing.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant context available.";

/// Marker appended wherever chunk text was cut to fit the per-chunk limit.
const TRUNCATION_MARKER: &str = "...";

/// Separator line between context blocks.
const BLOCK_SEPARATOR: &str = "\n---\n";

/// Formats ranked chunks plus citations into a single bounded string
/// suitable as generator input.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    per_chunk_char_limit: usize,
}

impl ContextAssembler {
    /// Create an assembler that quotes at most `per_chunk_char_limit`
    /// characters of each chunk.
    pub fn new(per_chunk_char_limit: usize) -> Self {
        Self { per_chunk_char_limit }
    }

    /// Assemble results, in ranked order, into the context string.
    ///
    /// Each block is a citation line derived from the chunk's source
    /// document and index, followed by the chunk text truncated to the
    /// per-chunk limit. Truncation backs up to the last word boundary
    /// within the limit when one exists and is always marked with an
    /// explicit ellipsis. Empty input returns [`NO_CONTEXT_SENTINEL`],
    /// never the empty string.
    pub fn assemble(&self, results: &[RetrievalResult]) -> String {
        if results.is_empty() {
            return NO_CONTEXT_SENTINEL.to_string();
        }

        let blocks: Vec<String> = results
            .iter()
            .map(|result| {
                format!(
                    "Source: {} (chunk {})\n{}",
                    result.chunk.document_id,
                    result.chunk.chunk_index,
                    truncate_at_word_boundary(&result.chunk.text, self.per_chunk_char_limit)
                )
            })
            .collect();

        blocks.join(BLOCK_SEPARATOR)
    }
}

/// Truncate `text` to at most `limit` characters, preferring to cut at the
/// last whitespace within the limit. A single word longer than the limit
/// is cut mid-word; either way the cut is marked.
fn truncate_at_word_boundary(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let head: String = text.chars().take(limit).collect();
    let cut = match head.rfind(char::is_whitespace) {
        Some(position) if position > 0 => position,
        _ => head.len(),
    };
    format!("{}{TRUNCATION_MARKER}", head[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(document_id: &str, chunk_index: usize, text: &str, rank: usize) -> RetrievalResult {
        RetrievalResult {
            chunk: Chunk {
                document_id: document_id.to_string(),
                chunk_index,
                text: text.to_string(),
                word_start_offset: 0,
            },
            score: 0.9,
            rank,
        }
    }

    #[test]
    fn empty_results_yield_sentinel() {
        let assembler = ContextAssembler::new(500);
        let context = assembler.assemble(&[]);
        assert_eq!(context, NO_CONTEXT_SENTINEL);
        assert!(!context.is_empty());
    }

    #[test]
    fn blocks_carry_citations_in_ranked_order() {
        let assembler = ContextAssembler::new(500);
        let results = vec![
            result("manual.txt", 2, "first block text", 1),
            result("notes.txt", 0, "second block text", 2),
        ];
        let context = assembler.assemble(&results);
        assert_eq!(
            context,
            "Source: manual.txt (chunk 2)\nfirst block text\n---\n\
             Source: notes.txt (chunk 0)\nsecond block text"
        );
    }

    #[test]
    fn long_chunks_are_truncated_at_a_word_boundary() {
        let assembler = ContextAssembler::new(20);
        let results = vec![result("a.txt", 0, "alpha beta gamma delta epsilon", 1)];
        let context = assembler.assemble(&results);
        let body = context.lines().nth(1).unwrap();
        assert_eq!(body, "alpha beta gamma...");
    }

    #[test]
    fn short_chunks_are_not_marked() {
        let assembler = ContextAssembler::new(20);
        let results = vec![result("a.txt", 0, "short text", 1)];
        let context = assembler.assemble(&results);
        assert!(context.ends_with("short text"));
        assert!(!context.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn unbreakable_word_is_cut_mid_word() {
        let assembler = ContextAssembler::new(5);
        let results = vec![result("a.txt", 0, "supercalifragilistic", 1)];
        let context = assembler.assemble(&results);
        let body = context.lines().nth(1).unwrap();
        assert_eq!(body, "super...");
    }
}
