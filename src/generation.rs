//! Text generator trait and sampling options.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Sampling options passed to the generator with each prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature. Low values favor factual, grounded output.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: usize,
    /// Sequences that stop generation when emitted.
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            max_tokens: 500,
            stop_sequences: vec!["Question:".to_string(), "Context:".to_string()],
        }
    }
}

/// A capability that maps a prompt string to a generated string.
///
/// The core only depends on this input/output contract, not on any model
/// internals. Errors carry a transient/permanent distinction via
/// [`RagError::Generation`](crate::RagError::Generation).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

/// Generate a completion, retrying transient failures up to `max_retries`
/// extra attempts. Permanent failures propagate immediately.
pub(crate) async fn generate_with_retry(
    generator: &dyn Generator,
    prompt: &str,
    options: &GenerationOptions,
    max_retries: usize,
) -> Result<String> {
    let mut attempt = 0;
    loop {
        match generator.generate(prompt, options).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %e, "transient generation failure, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}
