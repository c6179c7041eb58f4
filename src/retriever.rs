//! Query-side retrieval: embed, search, rank, filter.

use std::sync::Arc;

use tracing::{info, warn};

use crate::document::RetrievalResult;
use crate::embedding::{EmbeddingProvider, embed_with_retry, l2_normalize};
use crate::error::{RagError, Result};
use crate::index::SimilarityIndex;

/// Retrieves ranked, scored chunks for a query string.
///
/// Embeds the query via the external embedding capability, normalizes it
/// by the same rule as stored vectors, searches the index, and maps vector
/// ids back to chunks.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<SimilarityIndex>,
    max_retries: usize,
}

impl Retriever {
    /// Create a retriever over one index generation.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        index: Arc<SimilarityIndex>,
        max_retries: usize,
    ) -> Self {
        Self { provider, index, max_retries }
    }

    /// Retrieve the `top_k` most relevant chunks for `query`.
    ///
    /// Results carry 1-based ranks in scored order. When `min_score` is
    /// supplied, results scoring strictly below it are dropped after
    /// ranking; surviving ranks are NOT renumbered, so gaps reveal that
    /// low-scoring results were suppressed. An empty index yields an empty
    /// result: a valid "no relevant context" outcome, not an error.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<RetrievalResult>> {
        if self.index.store().is_empty() {
            info!(result_count = 0, "retrieval against empty index");
            return Ok(Vec::new());
        }

        let mut query_embedding =
            embed_with_retry(self.provider.as_ref(), query, self.max_retries).await?;
        if !l2_normalize(&mut query_embedding) {
            warn!("all-zero query embedding left unnormalized");
        }

        let hits = self.index.search(&query_embedding, top_k)?;
        let mut results = Vec::with_capacity(hits.len());
        for (position, (vector_id, score)) in hits.into_iter().enumerate() {
            let record = self.index.store().get(vector_id).ok_or_else(|| {
                RagError::Config(format!("search returned out-of-range vector id {vector_id}"))
            })?;
            results.push(RetrievalResult {
                chunk: record.chunk.clone(),
                score,
                rank: position + 1,
            });
        }

        if let Some(min) = min_score {
            results.retain(|r| r.score >= min);
        }

        info!(result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}
