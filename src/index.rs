//! Record store construction and exact similarity search.
//!
//! The build phase turns documents into [`IndexedRecord`]s: chunk, embed,
//! L2-normalize, store in insertion order. The [`SimilarityIndex`] then
//! answers top-k queries with an exact linear scan of inner products.
//! Exactness and determinism are favored over asymptotic speed here;
//! corpora in the low tens of thousands of chunks scan fast enough, and
//! anything larger belongs to a different index structure.

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::chunking::WordChunker;
use crate::document::{Chunk, Document};
use crate::embedding::{EmbeddingProvider, embed_batch_with_retry, l2_normalize};
use crate::error::{RagError, Result};

/// One stored chunk with its L2-normalized embedding.
///
/// Insertion order into the [`RecordStore`] is the record's implicit
/// vector id, used by search results to refer back to it.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    /// The chunk this record was built from.
    pub chunk: Chunk,
    /// The chunk's embedding, L2-normalized (unless it was all-zero).
    pub embedding: Vec<f32>,
}

/// The ordered, immutable collection of indexed records for one corpus
/// generation.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<IndexedRecord>,
    dimensions: usize,
}

impl RecordStore {
    /// Build a store from a document set: chunk each document, embed each
    /// chunk (one batch per document, preserving chunk order), and
    /// L2-normalize every embedding in place.
    ///
    /// An all-zero embedding is left unchanged and logged at `warn` level,
    /// since normalizing it would divide by zero. Transient embedding
    /// failures are retried up to `max_retries` extra attempts; any
    /// remaining failure fails the whole build so a corpus with holes is
    /// never served.
    ///
    /// # Errors
    ///
    /// Returns the embedding capability's error on failure, or
    /// [`RagError::Config`] if the provider returns a vector whose length
    /// differs from [`dimensions()`](EmbeddingProvider::dimensions) or a
    /// batch whose length differs from the chunk count.
    pub async fn build(
        documents: &[Document],
        chunker: &WordChunker,
        provider: &dyn EmbeddingProvider,
        max_retries: usize,
    ) -> Result<Self> {
        let dimensions = provider.dimensions();
        let mut records = Vec::new();

        for document in documents {
            let chunks = chunker.chunk(document);
            if chunks.is_empty() {
                info!(document.id = %document.id, chunk_count = 0, "indexed document (empty)");
                continue;
            }

            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
            let embeddings = embed_batch_with_retry(provider, &texts, max_retries).await?;
            if embeddings.len() != chunks.len() {
                return Err(RagError::Config(format!(
                    "provider returned {} embeddings for {} chunks of document '{}'",
                    embeddings.len(),
                    chunks.len(),
                    document.id
                )));
            }

            let chunk_count = chunks.len();
            for (chunk, mut embedding) in chunks.into_iter().zip(embeddings) {
                if embedding.len() != dimensions {
                    return Err(RagError::Config(format!(
                        "embedding of length {} does not match provider dimensionality {dimensions}",
                        embedding.len()
                    )));
                }
                if !l2_normalize(&mut embedding) {
                    warn!(
                        document.id = %chunk.document_id,
                        chunk.chunk_index,
                        "all-zero embedding left unnormalized"
                    );
                }
                records.push(IndexedRecord { chunk, embedding });
            }
            info!(document.id = %document.id, chunk_count, "indexed document");
        }

        Ok(Self { records, dimensions })
    }

    /// Assemble a store from pre-built records of the given dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any record's embedding length
    /// differs from `dimensions`.
    pub fn from_records(records: Vec<IndexedRecord>, dimensions: usize) -> Result<Self> {
        for (id, record) in records.iter().enumerate() {
            if record.embedding.len() != dimensions {
                return Err(RagError::Config(format!(
                    "record {id} has embedding length {}, expected {dimensions}",
                    record.embedding.len()
                )));
            }
        }
        Ok(Self { records, dimensions })
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The embedding dimensionality shared by every record.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Look up a record by its vector id (insertion position).
    pub fn get(&self, vector_id: usize) -> Option<&IndexedRecord> {
        self.records.get(vector_id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[IndexedRecord] {
        &self.records
    }
}

/// Exact top-k similarity search over a [`RecordStore`].
///
/// Scores are cosine similarities computed as inner products, which is
/// correct only because stored vectors and queries are unit-normalized by
/// the same rule ([`l2_normalize`]).
#[derive(Debug)]
pub struct SimilarityIndex {
    store: RecordStore,
}

impl SimilarityIndex {
    /// Wrap a built record store for searching.
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// The underlying record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Return the `top_k` highest-scoring `(vector_id, score)` pairs for a
    /// unit-normalized query embedding, by exact linear scan.
    ///
    /// Results are ordered by non-increasing score; ties break toward the
    /// lower vector id, so the ordering is deterministic and reproducible.
    /// Fewer than `top_k` stored vectors returns all of them ranked; an
    /// empty store returns an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_k` is zero, or if the query's
    /// dimensionality differs from the store's (a non-empty store only).
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>> {
        if top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.store.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.store.dimensions() {
            return Err(RagError::Config(format!(
                "query embedding has dimension {}, index has dimension {}",
                query.len(),
                self.store.dimensions()
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .store
            .records()
            .iter()
            .enumerate()
            .map(|(id, record)| (id, inner_product(query, &record.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Inner product of two equal-length vectors.
fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: usize, embedding: Vec<f32>) -> IndexedRecord {
        IndexedRecord {
            chunk: Chunk {
                document_id: "doc.txt".to_string(),
                chunk_index: id,
                text: format!("chunk {id}"),
                word_start_offset: 0,
            },
            embedding,
        }
    }

    fn unit_index() -> SimilarityIndex {
        let records = vec![
            record(0, vec![1.0, 0.0]),
            record(1, vec![0.0, 1.0]),
            record(2, vec![0.7071, 0.7071]),
        ];
        SimilarityIndex::new(RecordStore::from_records(records, 2).unwrap())
    }

    #[test]
    fn ranks_by_cosine_similarity() {
        let index = unit_index();
        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(results[1].0, 2);
        assert!((results[1].1 - 0.7071).abs() < 1e-3);
    }

    #[test]
    fn top_k_larger_than_store_returns_all_ids_once() {
        let index = unit_index();
        let results = index.search(&[0.6, 0.8], 10).unwrap();
        assert_eq!(results.len(), 3);
        let mut ids: Vec<usize> = results.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
        for window in results.windows(2) {
            assert!(window[0].1 >= window[1].1);
        }
    }

    #[test]
    fn ties_break_toward_lower_vector_id() {
        let records = vec![
            record(0, vec![0.0, 1.0]),
            record(1, vec![1.0, 0.0]),
            record(2, vec![1.0, 0.0]),
        ];
        let index = SimilarityIndex::new(RecordStore::from_records(records, 2).unwrap());
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].0, 2);
        assert_eq!(results[2].0, 0);
    }

    #[test]
    fn search_is_deterministic() {
        let index = unit_index();
        let first = index.search(&[0.6, 0.8], 3).unwrap();
        let second = index.search(&[0.6, 0.8], 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_store_returns_empty_result() {
        let index = SimilarityIndex::new(RecordStore::from_records(Vec::new(), 4).unwrap());
        assert!(index.search(&[0.0, 0.0, 0.0, 1.0], 5).unwrap().is_empty());
    }

    #[test]
    fn dimension_mismatch_is_a_config_error() {
        let index = unit_index();
        let result = index.search(&[1.0, 0.0, 0.0], 2);
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn zero_top_k_is_a_config_error() {
        let index = unit_index();
        assert!(matches!(index.search(&[1.0, 0.0], 0), Err(RagError::Config(_))));
    }

    #[test]
    fn from_records_rejects_mixed_dimensions() {
        let records = vec![record(0, vec![1.0, 0.0]), record(1, vec![1.0, 0.0, 0.0])];
        assert!(matches!(RecordStore::from_records(records, 2), Err(RagError::Config(_))));
    }
}
