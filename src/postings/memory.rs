//! In-memory postings snapshot.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::error::{ConcordError, Result};
use crate::postings::{DocumentId, NO_MORE_DOCS, Position, PostingsSource};

/// Postings of one term: documents ascending, positions aligned by index.
#[derive(Debug, Clone, Default)]
struct TermEntry {
    documents: Vec<DocumentId>,
    positions: Vec<Vec<Position>>,
}

impl TermEntry {
    fn positions_of(&self, document: DocumentId) -> Option<&[Position]> {
        self.documents
            .binary_search(&document)
            .ok()
            .map(|idx| self.positions[idx].as_slice())
    }
}

/// A read-only postings snapshot held entirely in memory.
///
/// Built once through [`MemoryPostingsBuilder`]; immutable afterward and safe
/// to share across threads.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostings {
    terms: AHashMap<String, TermEntry>,
    doc_count: usize,
}

impl MemoryPostings {
    /// Create a builder for a new snapshot.
    pub fn builder() -> MemoryPostingsBuilder {
        MemoryPostingsBuilder::default()
    }

    /// Number of distinct terms in the snapshot.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of distinct documents that contributed at least one occurrence.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }
}

impl PostingsSource for MemoryPostings {
    fn postings_for(&self, term: &str) -> Result<Vec<DocumentId>> {
        Ok(self
            .terms
            .get(term)
            .map(|entry| entry.documents.clone())
            .unwrap_or_default())
    }

    fn positions_for(&self, term: &str, document: DocumentId) -> Result<Vec<Position>> {
        Ok(self
            .terms
            .get(term)
            .and_then(|entry| entry.positions_of(document))
            .map(<[Position]>::to_vec)
            .unwrap_or_default())
    }

    fn term_exists(&self, term: &str) -> Result<bool> {
        Ok(self.terms.contains_key(term))
    }
}

/// Builder for [`MemoryPostings`].
///
/// Occurrences may be added in any order; `build` sorts documents and
/// positions and removes duplicates.
#[derive(Debug, Default)]
pub struct MemoryPostingsBuilder {
    terms: AHashMap<String, BTreeMap<DocumentId, Vec<Position>>>,
}

impl MemoryPostingsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tokenized document. Each token's index in `tokens` is its position.
    pub fn add_document<T: AsRef<str>>(mut self, document: DocumentId, tokens: &[T]) -> Self {
        for (position, token) in tokens.iter().enumerate() {
            self.terms
                .entry(token.as_ref().to_string())
                .or_default()
                .entry(document)
                .or_default()
                .push(position as Position);
        }
        self
    }

    /// Add explicit occurrences of `term` in `document`.
    ///
    /// An empty `positions` slice adds nothing.
    pub fn add_occurrences<S: Into<String>>(
        mut self,
        term: S,
        document: DocumentId,
        positions: &[Position],
    ) -> Self {
        if positions.is_empty() {
            return self;
        }
        self.terms
            .entry(term.into())
            .or_default()
            .entry(document)
            .or_default()
            .extend_from_slice(positions);
        self
    }

    /// Freeze the builder into an immutable snapshot.
    ///
    /// Fails if any document uses the reserved id [`NO_MORE_DOCS`].
    pub fn build(self) -> Result<MemoryPostings> {
        if let Some(term) = self
            .terms
            .iter()
            .find_map(|(term, docs)| docs.contains_key(&NO_MORE_DOCS).then_some(term))
        {
            return Err(ConcordError::invalid_argument(format!(
                "document id {NO_MORE_DOCS} is reserved (term {term:?})"
            )));
        }

        let mut all_documents = ahash::AHashSet::new();
        let mut terms = AHashMap::with_capacity(self.terms.len());

        for (term, per_document) in self.terms {
            let mut entry = TermEntry {
                documents: Vec::with_capacity(per_document.len()),
                positions: Vec::with_capacity(per_document.len()),
            };
            for (document, mut positions) in per_document {
                positions.sort_unstable();
                positions.dedup();
                all_documents.insert(document);
                entry.documents.push(document);
                entry.positions.push(positions);
            }
            terms.insert(term, entry);
        }

        Ok(MemoryPostings {
            terms,
            doc_count: all_documents.len(),
        })
    }
}
