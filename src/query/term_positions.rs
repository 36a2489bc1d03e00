//! Per-term document list with aligned position lists.

use crate::error::{ConcordError, Result};
use crate::postings::{DocumentId, Position};

/// Documents containing a term together with the term's positions in each.
///
/// `positions()[i]` belongs to `documents()[i]`. Documents are strictly
/// ascending; the producer guarantees this and lookups rely on it. Values
/// are only obtainable from [`TermPositionsBuilder::build`], so a partially
/// filled instance is never observable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermPositions {
    term: Option<String>,
    documents: Vec<DocumentId>,
    positions: Vec<Vec<Position>>,
}

impl TermPositions {
    /// Start building a structure with exactly `n` document slots.
    pub fn allocate(n: usize) -> TermPositionsBuilder {
        TermPositionsBuilder::allocate(n)
    }

    /// Create an empty structure.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The term label, if any.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    pub fn positions(&self) -> &[Vec<Position>] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up the positions recorded for `document`.
    ///
    /// Uses binary search; the result is meaningless if the documents are
    /// not sorted. An absent document means the caller asked for something
    /// outside a known document set, which is a logic error.
    pub fn positions_of(&self, document: DocumentId) -> Result<&[Position]> {
        self.documents
            .binary_search(&document)
            .map(|idx| self.positions[idx].as_slice())
            .map_err(|_| ConcordError::DocumentNotFound(document))
    }

    /// Iterate over `(document, positions)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &[Position])> + '_ {
        self.documents
            .iter()
            .copied()
            .zip(self.positions.iter().map(Vec::as_slice))
    }

    /// Consume the structure into its parts.
    pub fn into_parts(self) -> (Vec<DocumentId>, Vec<Vec<Position>>) {
        (self.documents, self.positions)
    }
}

/// Two-phase builder for [`TermPositions`].
///
/// The slot count is fixed at allocation; every slot must be filled with
/// [`set_positions`](Self::set_positions) before [`build`](Self::build)
/// succeeds.
#[derive(Debug)]
pub struct TermPositionsBuilder {
    term: Option<String>,
    slots: Vec<Option<(DocumentId, Vec<Position>)>>,
    filled: usize,
}

impl TermPositionsBuilder {
    /// Pre-size the builder for `n` documents.
    pub fn allocate(n: usize) -> Self {
        TermPositionsBuilder {
            term: None,
            slots: vec![None; n],
            filled: 0,
        }
    }

    /// Attach a term label.
    pub fn with_term<S: Into<String>>(mut self, term: S) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Fill slot `index` with a document and its positions.
    ///
    /// Refilling a slot replaces its previous content.
    pub fn set_positions(
        &mut self,
        index: usize,
        document: DocumentId,
        occurrences: Vec<Position>,
    ) -> Result<()> {
        let capacity = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            ConcordError::invalid_argument(format!(
                "slot {index} out of range for {capacity} allocated documents"
            ))
        })?;
        if slot.is_none() {
            self.filled += 1;
        }
        *slot = Some((document, occurrences));
        Ok(())
    }

    /// Produce the immutable structure. Fails if any slot is still empty.
    pub fn build(self) -> Result<TermPositions> {
        if self.filled != self.slots.len() {
            return Err(ConcordError::invalid_argument(format!(
                "{} of {} term position slots were never filled",
                self.slots.len() - self.filled,
                self.slots.len()
            )));
        }

        let mut documents = Vec::with_capacity(self.slots.len());
        let mut positions = Vec::with_capacity(self.slots.len());
        for (document, occurrences) in self.slots.into_iter().flatten() {
            documents.push(document);
            positions.push(occurrences);
        }

        Ok(TermPositions {
            term: self.term,
            documents,
            positions,
        })
    }
}
