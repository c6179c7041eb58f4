//! Corpus source trait: where documents come from at build time.

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// A capability providing the documents for one corpus load.
///
/// Consumed exactly once per build; document ingestion details (filesystem,
/// object store, ...) live behind this seam and are not part of the core.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// List the documents making up the corpus.
    async fn list_documents(&self) -> Result<Vec<Document>>;
}

/// A corpus source over an in-memory document set, mainly for tests and
/// small fixed corpora.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    documents: Vec<Document>,
}

impl StaticCorpus {
    /// Create a corpus source over the given documents.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl CorpusSource for StaticCorpus {
    async fn list_documents(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}
