//! Configuration for the retrieval session.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::generation::GenerationOptions;

/// Configuration parameters for a [`RagSession`](crate::RagSession).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in words.
    pub chunk_size: usize,
    /// Number of overlapping words between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results to return from similarity search.
    pub top_k: usize,
    /// Minimum similarity score for retrieval results. Results strictly
    /// below it are dropped after ranking; `None` keeps everything.
    pub min_score: Option<f32>,
    /// Maximum characters of each chunk quoted into the assembled context.
    pub per_chunk_char_limit: usize,
    /// Extra attempts allowed for transient embedding/generation failures.
    pub max_retries: usize,
    /// Sampling options forwarded to the generator.
    pub generation: GenerationOptions,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 3,
            min_score: None,
            per_chunk_char_limit: 500,
            max_retries: 2,
            generation: GenerationOptions::default(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in words.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in words.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to return from similarity search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity score for retrieval results.
    pub fn min_score(mut self, score: f32) -> Self {
        self.config.min_score = Some(score);
        self
    }

    /// Set the per-chunk character limit for context assembly.
    pub fn per_chunk_char_limit(mut self, limit: usize) -> Self {
        self.config.per_chunk_char_limit = limit;
        self
    }

    /// Set the retry cap for transient capability failures.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the sampling options forwarded to the generator.
    pub fn generation(mut self, options: GenerationOptions) -> Self {
        self.config.generation = options;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `per_chunk_char_limit == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.per_chunk_char_limit == 0 {
            return Err(RagError::Config(
                "per_chunk_char_limit must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = RagConfig::builder().build().unwrap();
        assert_eq!(config, RagConfig::default());
    }

    #[test]
    fn rejects_overlap_not_less_than_chunk_size() {
        let result = RagConfig::builder().chunk_size(10).chunk_overlap(10).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn rejects_zero_top_k() {
        let result = RagConfig::builder().top_k(0).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_sets_all_fields() {
        let config = RagConfig::builder()
            .chunk_size(100)
            .chunk_overlap(10)
            .top_k(5)
            .min_score(0.25)
            .per_chunk_char_limit(200)
            .max_retries(1)
            .build()
            .unwrap();
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.chunk_overlap, 10);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.min_score, Some(0.25));
        assert_eq!(config.per_chunk_char_limit, 200);
        assert_eq!(config.max_retries, 1);
    }
}
