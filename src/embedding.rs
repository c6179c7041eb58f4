//! Embedding provider trait and the normalization rule shared by the
//! build and query paths.

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// A provider that maps text to fixed-length embedding vectors.
///
/// Implementations wrap a concrete embedding backend behind a unified
/// async interface. A provider instance must return vectors of constant
/// dimensionality and be deterministic for the same input within a
/// session. The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// implementation calls [`embed`](EmbeddingProvider::embed) sequentially;
/// backends with native batching should override it, preserving per-input
/// order.
///
/// Errors carry a transient/permanent distinction via
/// [`RagError::Embedding`](crate::RagError::Embedding): transient failures
/// may be retried by the session up to its configured cap, permanent
/// failures propagate immediately.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The returned vector has exactly one embedding per input, in input
    /// order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}

/// L2-normalize an embedding in place so cosine similarity reduces to the
/// inner product.
///
/// Returns `false` for an all-zero vector, which is left unchanged since
/// normalizing it would divide by zero. Callers flag that case.
pub fn l2_normalize(embedding: &mut [f32]) -> bool {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return false;
    }
    for value in embedding.iter_mut() {
        *value /= norm;
    }
    true
}

/// Embed a batch, retrying transient failures up to `max_retries` extra
/// attempts. Permanent and configuration errors propagate immediately.
pub(crate) async fn embed_batch_with_retry(
    provider: &dyn EmbeddingProvider,
    texts: &[&str],
    max_retries: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut attempt = 0;
    loop {
        match provider.embed_batch(texts).await {
            Ok(embeddings) => return Ok(embeddings),
            Err(e) if e.is_transient() && attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %e, "transient embedding failure, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Embed a single text, retrying transient failures up to `max_retries`
/// extra attempts.
pub(crate) async fn embed_with_retry(
    provider: &dyn EmbeddingProvider,
    text: &str,
    max_retries: usize,
) -> Result<Vec<f32>> {
    let mut attempt = 0;
    loop {
        match provider.embed(text).await {
            Ok(embedding) => return Ok(embedding),
            Err(e) if e.is_transient() && attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %e, "transient embedding failure, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_unit_length() {
        let mut v = vec![3.0, 4.0];
        assert!(l2_normalize(&mut v));
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_left_unchanged() {
        let mut v = vec![0.0, 0.0, 0.0];
        assert!(!l2_normalize(&mut v));
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn unit_vector_is_stable() {
        let mut v = vec![1.0, 0.0];
        assert!(l2_normalize(&mut v));
        assert_eq!(v, vec![1.0, 0.0]);
    }
}
