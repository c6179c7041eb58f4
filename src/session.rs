//! Session orchestration: build a corpus generation, answer questions
//! against it, and swap in rebuilt generations atomically.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::chunking::WordChunker;
use crate::config::RagConfig;
use crate::context::ContextAssembler;
use crate::corpus::CorpusSource;
use crate::document::{Document, RagAnswer, RetrievalResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::{Generator, generate_with_retry};
use crate::index::{RecordStore, SimilarityIndex};
use crate::retriever::Retriever;

/// One immutable, fully-built corpus generation.
///
/// Published atomically by [`RagSession::load_and_build`]; never mutated
/// afterwards, so concurrent readers need no locking.
struct Generation {
    index: Arc<SimilarityIndex>,
    document_count: usize,
}

/// Counts describing the session's active generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStats {
    /// Documents in the corpus at build time.
    pub documents: usize,
    /// Indexed chunks (equals the similarity index size).
    pub chunks: usize,
    /// Embedding dimensionality of the generation.
    pub dimensions: usize,
}

/// A document question-answering session.
///
/// Starts **unbuilt**: only [`load_and_build`](RagSession::load_and_build)
/// is legal, and on success the session becomes **ready** and can
/// [`answer`](RagSession::answer) queries. Rebuilding from ready is
/// allowed and publishes a fresh generation atomically; queries already
/// in flight keep the generation they started with (copy-on-write, never
/// in-place mutation). A failed build leaves the previous state untouched.
///
/// All methods are cancel-safe: dropping an in-flight future abandons the
/// embedding/search/generation work without corrupting the active index,
/// because a new generation is published only after a complete successful
/// build.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::{Document, RagConfig, RagSession};
///
/// let session = RagSession::new(RagConfig::default(), embedder, generator);
/// session.load_and_build(&documents).await?;
/// let answer = session.answer("What is this corpus about?").await?;
/// println!("{} ({} sources)", answer.answer, answer.sources.len());
/// ```
pub struct RagSession {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn Generator>,
    active: RwLock<Option<Arc<Generation>>>,
}

impl RagSession {
    /// Create an unbuilt session over the given capabilities.
    pub fn new(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self { config, embedder, generator, active: RwLock::new(None) }
    }

    /// The session configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Chunk, embed, and index a document set, then publish it as the new
    /// active generation.
    ///
    /// The generation is built entirely off to the side and swapped in
    /// atomically, so queries never observe a partially-built index. On
    /// failure the previous generation (or unbuilt state) is kept and the
    /// error is surfaced.
    pub async fn load_and_build(&self, documents: &[Document]) -> Result<()> {
        let chunker = WordChunker::new(self.config.chunk_size, self.config.chunk_overlap)?;
        let store = RecordStore::build(
            documents,
            &chunker,
            self.embedder.as_ref(),
            self.config.max_retries,
        )
        .await?;

        let records = store.len();
        let dimensions = store.dimensions();
        let generation = Arc::new(Generation {
            index: Arc::new(SimilarityIndex::new(store)),
            document_count: documents.len(),
        });

        *self.active.write().await = Some(generation);
        info!(documents = documents.len(), records, dimensions, "published index generation");
        Ok(())
    }

    /// Pull documents from a corpus source once, then build from them.
    pub async fn load_from_source(&self, source: &dyn CorpusSource) -> Result<()> {
        let documents = source.list_documents().await?;
        self.load_and_build(&documents).await
    }

    /// Retrieve ranked, scored chunks for a query using the session's
    /// configured `top_k` and `min_score`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotBuilt`] on an unbuilt session.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalResult>> {
        let generation = self.active_generation().await?;
        self.retriever_for(&generation)
            .retrieve(query, self.config.top_k, self.config.min_score)
            .await
    }

    /// Answer a question: retrieve, assemble context, generate.
    ///
    /// Empty retrieval is not an error: the assembled context falls back
    /// to the no-context sentinel and `sources` comes back empty, leaving
    /// the "no relevant context" interpretation to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotBuilt`] on an unbuilt session, or the
    /// embedding/generation capability's failure after retries.
    pub async fn answer(&self, query: &str) -> Result<RagAnswer> {
        // Pin the generation before any await on external capabilities:
        // a concurrent rebuild must not affect this query.
        let generation = self.active_generation().await?;

        let sources = self
            .retriever_for(&generation)
            .retrieve(query, self.config.top_k, self.config.min_score)
            .await?;

        let assembler = ContextAssembler::new(self.config.per_chunk_char_limit);
        let context = assembler.assemble(&sources);
        let prompt = build_prompt(&context, query);

        let answer = generate_with_retry(
            self.generator.as_ref(),
            &prompt,
            &self.config.generation,
            self.config.max_retries,
        )
        .await?;

        info!(source_count = sources.len(), "answered query");
        Ok(RagAnswer { answer, sources, answered_at: Utc::now() })
    }

    /// [`answer`](RagSession::answer) bounded by a caller-supplied timeout.
    ///
    /// On expiry the in-flight embedding/search/generation work is
    /// abandoned and [`RagError::Timeout`] is returned; the active index
    /// is unaffected.
    pub async fn answer_with_timeout(&self, query: &str, timeout: Duration) -> Result<RagAnswer> {
        tokio::time::timeout(timeout, self.answer(query))
            .await
            .map_err(|_| RagError::Timeout(timeout))?
    }

    /// Counts for the active generation.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotBuilt`] on an unbuilt session.
    pub async fn stats(&self) -> Result<SessionStats> {
        let generation = self.active_generation().await?;
        let store = generation.index.store();
        Ok(SessionStats {
            documents: generation.document_count,
            chunks: store.len(),
            dimensions: store.dimensions(),
        })
    }

    /// Clone the active generation handle, releasing the lock immediately
    /// so queries never hold it across an await.
    async fn active_generation(&self) -> Result<Arc<Generation>> {
        self.active.read().await.clone().ok_or(RagError::NotBuilt)
    }

    fn retriever_for(&self, generation: &Arc<Generation>) -> Retriever {
        Retriever::new(self.embedder.clone(), generation.index.clone(), self.config.max_retries)
    }
}

/// Build the generator prompt from an assembled context and the question.
fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Based on the following context information, please answer the question.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Instructions:\n\
         - Use the provided context to answer the question\n\
         - If the context doesn't contain relevant information, say so\n\
         - Be specific and cite which sources support your answer\n\
         - Keep your answer concise but complete\n\
         \n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = build_prompt("Source: a.txt (chunk 0)\nsome text", "What is a?");
        assert!(prompt.contains("Context:\nSource: a.txt (chunk 0)\nsome text"));
        assert!(prompt.contains("Question: What is a?"));
        assert!(prompt.ends_with("Answer:"));
    }
}
