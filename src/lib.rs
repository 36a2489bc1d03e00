//! # Concord
//!
//! Query evaluation core for a sentence-level full-text retrieval layer.
//!
//! ## Features
//!
//! - Linear-time intersection and union of sorted document lists
//! - Exact-order (phrase) matching over per-document positions
//! - Cacheable query results replayable as document iterators
//! - Growing a cached phrase by one word on either side
//! - Per-field index registry (words, lemmas, tags)
//!
//! The inverted index itself is an external collaborator reached through
//! [`PostingsSource`]; [`MemoryPostings`] is an in-memory implementation.

pub mod error;
pub mod index;
pub mod postings;
pub mod query;

// Re-exports for the public API
pub use error::{ConcordError, Result};
pub use index::{Field, FieldIndex, IndexRegistry};
pub use postings::memory::MemoryPostings;
pub use postings::{DocumentId, NO_MORE_DOCS, Position, PostingsSource};
pub use query::{
    ConsecutiveIterator, DocumentIterator, Interval, QueryEngine, QueryEngineConfig, QueryRequest,
    QueryResult, ResultIterator, TermPositions,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
