//! # docqa-rag
//!
//! Retrieval engine for document question answering: split raw text into
//! overlapping word-window chunks, index L2-normalized embeddings of those
//! chunks for exact cosine-similarity search, and assemble the most
//! relevant chunks into a bounded, cited context string for a downstream
//! text generator.
//!
//! ## Overview
//!
//! The build phase runs chunking ([`WordChunker`]) and embedding into an
//! immutable [`RecordStore`] wrapped by a [`SimilarityIndex`]. The query
//! phase runs [`Retriever`] (embed → search → rank → filter) and
//! [`ContextAssembler`] (citations, truncation, sentinel). [`RagSession`]
//! ties both phases together with a copy-on-write generation lifecycle:
//! rebuilds publish a fresh index atomically while in-flight queries keep
//! the generation they started with.
//!
//! External capabilities stay behind trait seams: [`EmbeddingProvider`],
//! [`Generator`], and [`CorpusSource`]. The [`mock`] module provides
//! deterministic implementations for tests and demos.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{Document, RagConfig, RagSession};
//! use docqa_rag::mock::{MockEmbedder, MockGenerator};
//!
//! let session = RagSession::new(
//!     RagConfig::default(),
//!     Arc::new(MockEmbedder::new(384)),
//!     Arc::new(MockGenerator::new("the answer")),
//! );
//!
//! let documents = vec![Document::new("manual.txt", "…")];
//! session.load_and_build(&documents).await?;
//!
//! let answer = session.answer("How do I configure X?").await?;
//! for source in &answer.sources {
//!     println!("#{} {} (chunk {}) score {:.3}",
//!         source.rank, source.chunk.document_id,
//!         source.chunk.chunk_index, source.score);
//! }
//! ```
//!
//! ## Design notes
//!
//! - Search is an exact linear scan: deterministic, reproducible ordering
//!   (score descending, ties toward the earliest-inserted record), sized
//!   for corpora in the low tens of thousands of chunks. Approximate
//!   indexes and persistence are out of scope.
//! - Empty corpora and empty retrievals are representable outcomes, not
//!   errors: empty result vectors and the
//!   [`NO_CONTEXT_SENTINEL`] context string.

pub mod chunking;
pub mod config;
pub mod context;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod mock;
pub mod retriever;
pub mod session;

pub use chunking::WordChunker;
pub use config::{RagConfig, RagConfigBuilder};
pub use context::{ContextAssembler, NO_CONTEXT_SENTINEL};
pub use corpus::{CorpusSource, StaticCorpus};
pub use document::{Chunk, Document, RagAnswer, RetrievalResult};
pub use embedding::{EmbeddingProvider, l2_normalize};
pub use error::{RagError, Result};
pub use generation::{GenerationOptions, Generator};
pub use index::{IndexedRecord, RecordStore, SimilarityIndex};
pub use retriever::Retriever;
pub use session::{RagSession, SessionStats};
