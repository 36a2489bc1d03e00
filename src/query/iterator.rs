//! Forward-only document iterators.
//!
//! [`DocumentIterator`] is the shape shared by live evaluations (postings,
//! exact-order results) and replayed [`QueryResult`](crate::query::result::QueryResult)s,
//! so composition code such as
//! [`ConsecutiveIterator`](crate::query::consecutive::ConsecutiveIterator)
//! works on either without knowing where documents come from.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{ConcordError, Result};
use crate::postings::{DocumentId, NO_MORE_DOCS, PostingsSource};
use crate::query::interval::{Interval, IntervalIterator};
use crate::query::term_positions::TermPositions;

/// A forward-only cursor over matching documents.
///
/// Not meant to be advanced from several threads at once; each consumer
/// owns its own iterator.
pub trait DocumentIterator: Send + Debug {
    /// Check whether [`next`](Self::next) would yield another document.
    fn has_next(&self) -> bool;

    /// Advance to the next document and return it.
    ///
    /// Fails with [`ConcordError::Exhausted`] past the end.
    fn next(&mut self) -> Result<DocumentId>;

    /// The current document, or `None` before the first `next()`.
    ///
    /// Reports [`NO_MORE_DOCS`] once [`skip_to`](Self::skip_to) has run out.
    fn current(&self) -> Option<DocumentId>;

    /// Move past the last document. Afterwards `has_next` is false, `current`
    /// reports [`NO_MORE_DOCS`] and `intervals` is empty.
    fn exhaust(&mut self);

    /// Check whether the iterator has been run out by `skip_to` or `exhaust`.
    fn is_exhausted(&self) -> bool {
        self.current() == Some(NO_MORE_DOCS)
    }

    /// Intervals matched in the current document.
    ///
    /// Calling this again restarts from the first interval. Iterators that
    /// carry no interval information return an empty iterator.
    fn intervals(&mut self) -> Result<IntervalIterator<'_>>;

    /// Advance until the current document is `>= target`.
    ///
    /// Does not move if the current document already satisfies the target.
    /// Returns [`NO_MORE_DOCS`] when the iterator runs out first, and keeps
    /// returning it for every later call.
    fn skip_to(&mut self, target: DocumentId) -> Result<DocumentId> {
        if let Some(doc) = self.current()
            && doc >= target
        {
            return Ok(doc);
        }
        while self.has_next() {
            let doc = self.next()?;
            if doc >= target {
                return Ok(doc);
            }
        }
        self.exhaust();
        Ok(NO_MORE_DOCS)
    }
}

/// Cursor state shared by the slice-backed iterators.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocCursor {
    cursor: usize,
    current: Option<DocumentId>,
    exhausted: bool,
}

impl DocCursor {
    pub(crate) fn has_next(&self, documents: &[DocumentId]) -> bool {
        self.cursor < documents.len()
    }

    pub(crate) fn next(&mut self, documents: &[DocumentId]) -> Result<DocumentId> {
        let doc = *documents.get(self.cursor).ok_or(ConcordError::Exhausted)?;
        self.cursor += 1;
        self.current = Some(doc);
        Ok(doc)
    }

    pub(crate) fn current(&self) -> Option<DocumentId> {
        if self.exhausted {
            Some(NO_MORE_DOCS)
        } else {
            self.current
        }
    }

    /// The current document, `None` before the first one and once exhausted.
    pub(crate) fn document(&self) -> Option<DocumentId> {
        self.current.filter(|_| !self.exhausted)
    }

    /// Index of the current document in the backing slice.
    pub(crate) fn index(&self) -> Option<usize> {
        self.document().map(|_| self.cursor - 1)
    }

    pub(crate) fn exhaust(&mut self, documents: &[DocumentId]) {
        self.cursor = documents.len();
        self.exhausted = true;
    }
}

/// Iterator over a plain document list, e.g. the output of an AND or OR query.
///
/// Carries no intervals.
#[derive(Debug, Clone)]
pub struct DocumentListIterator {
    documents: Vec<DocumentId>,
    cursor: DocCursor,
}

impl DocumentListIterator {
    pub fn new(documents: Vec<DocumentId>) -> Self {
        DocumentListIterator {
            documents,
            cursor: DocCursor::default(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl DocumentIterator for DocumentListIterator {
    fn has_next(&self) -> bool {
        self.cursor.has_next(&self.documents)
    }

    fn next(&mut self) -> Result<DocumentId> {
        self.cursor.next(&self.documents)
    }

    fn current(&self) -> Option<DocumentId> {
        self.cursor.current()
    }

    fn exhaust(&mut self) {
        self.cursor.exhaust(&self.documents);
    }

    fn intervals(&mut self) -> Result<IntervalIterator<'_>> {
        Ok(IntervalIterator::empty())
    }
}

/// Live iterator over one term's postings.
///
/// The document list is read up front; positions are fetched from the
/// source only when [`intervals`](DocumentIterator::intervals) is called,
/// one point interval per occurrence.
#[derive(Debug)]
pub struct PostingsIterator {
    source: Arc<dyn PostingsSource>,
    term: String,
    documents: Vec<DocumentId>,
    cursor: DocCursor,
}

impl PostingsIterator {
    pub fn new<S: Into<String>>(source: Arc<dyn PostingsSource>, term: S) -> Result<Self> {
        let term = term.into();
        let documents = source.postings_for(&term)?;
        Ok(PostingsIterator {
            source,
            term,
            documents,
            cursor: DocCursor::default(),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Number of documents in the postings.
    pub fn doc_freq(&self) -> usize {
        self.documents.len()
    }
}

impl DocumentIterator for PostingsIterator {
    fn has_next(&self) -> bool {
        self.cursor.has_next(&self.documents)
    }

    fn next(&mut self) -> Result<DocumentId> {
        self.cursor.next(&self.documents)
    }

    fn current(&self) -> Option<DocumentId> {
        self.cursor.current()
    }

    fn exhaust(&mut self) {
        self.cursor.exhaust(&self.documents);
    }

    fn intervals(&mut self) -> Result<IntervalIterator<'_>> {
        let Some(document) = self.cursor.document() else {
            return Ok(IntervalIterator::empty());
        };
        let intervals = self
            .source
            .positions_for(&self.term, document)?
            .into_iter()
            .map(Interval::point)
            .collect();
        Ok(IntervalIterator::owned(intervals))
    }
}

/// Iterator over an exact-order result.
///
/// `TermPositions` from a phrase match record where the phrase ends; each
/// position `p` becomes the interval `[p + 1 - phrase_len, p]`.
#[derive(Debug, Clone)]
pub struct TermPositionsIterator {
    positions: TermPositions,
    phrase_len: u32,
    cursor: DocCursor,
}

impl TermPositionsIterator {
    /// Wrap `positions` for a phrase of `phrase_len` terms (at least 1).
    pub fn new(positions: TermPositions, phrase_len: usize) -> Result<Self> {
        let phrase_len = u32::try_from(phrase_len)
            .ok()
            .filter(|len| *len > 0)
            .ok_or_else(|| {
                ConcordError::invalid_argument(format!("invalid phrase length {phrase_len}"))
            })?;
        Ok(TermPositionsIterator {
            positions,
            phrase_len,
            cursor: DocCursor::default(),
        })
    }
}

impl DocumentIterator for TermPositionsIterator {
    fn has_next(&self) -> bool {
        self.cursor.has_next(self.positions.documents())
    }

    fn next(&mut self) -> Result<DocumentId> {
        self.cursor.next(self.positions.documents())
    }

    fn current(&self) -> Option<DocumentId> {
        self.cursor.current()
    }

    fn exhaust(&mut self) {
        self.cursor.exhaust(self.positions.documents());
    }

    fn intervals(&mut self) -> Result<IntervalIterator<'_>> {
        let Some(index) = self.cursor.index() else {
            return Ok(IntervalIterator::empty());
        };
        let offset = self.phrase_len - 1;
        let intervals = self.positions.positions()[index]
            .iter()
            .map(|&end| Interval::new(end.saturating_sub(offset), end))
            .collect();
        Ok(IntervalIterator::owned(intervals))
    }
}
