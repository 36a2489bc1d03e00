//! Boundary to the inverted-index reader.
//!
//! The on-disk index format lives outside this crate. Query evaluation only
//! needs three read-only operations from it, captured by [`PostingsSource`].
//! [`memory::MemoryPostings`] is an in-memory snapshot implementing the same
//! boundary.

pub mod memory;

use std::fmt::Debug;

use crate::error::Result;

/// Identifier of a document (sentence) in an index snapshot.
pub type DocumentId = u32;

/// Offset of a term occurrence within a document, in index words.
pub type Position = u32;

/// Sentinel returned by [`skip_to`](crate::query::iterator::DocumentIterator::skip_to)
/// once an iterator has no further documents.
pub const NO_MORE_DOCS: DocumentId = DocumentId::MAX;

/// Read-only access to the postings of a fixed index snapshot.
///
/// Implementations must return document lists in strictly ascending order
/// and position lists in ascending order. Consumers rely on this and never
/// re-sort.
pub trait PostingsSource: Send + Sync + Debug {
    /// Get the ascending, duplicate-free documents containing `term`.
    ///
    /// An absent term yields an empty list.
    fn postings_for(&self, term: &str) -> Result<Vec<DocumentId>>;

    /// Get the ascending occurrence offsets of `term` within `document`.
    ///
    /// Returns an empty list when the term does not occur in the document.
    fn positions_for(&self, term: &str, document: DocumentId) -> Result<Vec<Position>>;

    /// Check whether `term` has any postings in the snapshot.
    fn term_exists(&self, term: &str) -> Result<bool>;
}
