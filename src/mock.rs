//! Deterministic mock capabilities for tests and demos.
//!
//! Neither mock talks to a real model, so everything built on them runs
//! with zero API keys.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::generation::{GenerationOptions, Generator};

/// A deterministic, hash-based embedding provider.
///
/// The vector's direction depends only on the text content, so identical
/// inputs embed identically and related calls are reproducible across
/// runs. Vectors are not pre-normalized; the build and query paths apply
/// the shared normalization rule themselves.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut embedding = vec![0.0f32; self.dimensions];
        for (i, value) in embedding.iter_mut().enumerate() {
            *value = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A canned-reply generator that records every prompt it receives.
#[derive(Debug, Default)]
pub struct MockGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Create a mock generator that always returns `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), prompts: Mutex::new(Vec::new()) }
    }

    /// Every prompt passed to [`generate`](Generator::generate) so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic_per_text() {
        let embedder = MockEmbedder::new(8);
        let first = embedder.embed("hello world").await.unwrap();
        let second = embedder.embed("hello world").await.unwrap();
        let other = embedder.embed("something else").await.unwrap();
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.len(), 8);
    }

    #[tokio::test]
    async fn generator_records_prompts() {
        let generator = MockGenerator::new("canned");
        let reply = generator.generate("a prompt", &GenerationOptions::default()).await.unwrap();
        assert_eq!(reply, "canned");
        assert_eq!(generator.prompts(), vec!["a prompt".to_string()]);
    }
}
