//! Error types for the `docqa-rag` crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in retrieval and answering operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error.
    ///
    /// Covers invalid chunk/overlap parameters, a zero `top_k`, and a query
    /// embedding whose dimensionality does not match the index. Fatal:
    /// never retried, surfaced to the caller immediately.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The embedding capability failed.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Whether the failure is transient (retryable) or permanent.
        transient: bool,
    },

    /// The generation capability failed.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generator that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Whether the failure is transient (retryable) or permanent.
        transient: bool,
    },

    /// The corpus source failed while listing documents.
    #[error("Corpus source error ({source_name}): {message}")]
    CorpusSource {
        /// The corpus source that produced the error.
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// `answer` or `retrieve` was called before any corpus was built.
    #[error("session has no built index: call load_and_build first")]
    NotBuilt,

    /// A session operation exceeded its caller-supplied timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
}

impl RagError {
    /// Whether this is a transient capability failure worth retrying.
    ///
    /// Configuration errors and permanent capability failures always
    /// return `false`.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RagError::Embedding { transient: true, .. }
                | RagError::Generation { transient: true, .. }
        )
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
