//! Cacheable query results and their replay iterator.
//!
//! A [`QueryResult`] owns a snapshot of an evaluation: the matching documents
//! in discovery order and the intervals matched in each. It holds no handle
//! on the postings source, so it can be kept around and replayed through
//! [`ResultIterator`] as an operand of further composition.

use std::sync::Arc;

use ahash::AHashMap;

use crate::error::Result;
use crate::postings::DocumentId;
use crate::query::interval::{Interval, IntervalIterator};
use crate::query::iterator::{DocCursor, DocumentIterator};

/// Immutable captured result of a query evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Matching documents in discovery order (not necessarily sorted).
    documents: Vec<DocumentId>,
    /// Intervals per document, in discovery order.
    intervals: AHashMap<DocumentId, Vec<Interval>>,
}

impl QueryResult {
    /// Drain `evaluation` into a new result.
    ///
    /// When `collect_intervals` is false only the documents are captured.
    pub fn cache(
        evaluation: &mut dyn DocumentIterator,
        collect_intervals: bool,
    ) -> Result<QueryResult> {
        let mut result = QueryResult::default();
        while evaluation.has_next() {
            let document = evaluation.next()?;
            result.documents.push(document);
            if collect_intervals {
                let intervals = evaluation.intervals()?;
                result
                    .intervals
                    .entry(document)
                    .or_default()
                    .extend(intervals);
            }
        }
        Ok(result)
    }

    /// Build a result directly from documents and their intervals.
    pub fn from_parts<I>(documents: Vec<DocumentId>, intervals: I) -> Self
    where
        I: IntoIterator<Item = (DocumentId, Vec<Interval>)>,
    {
        QueryResult {
            documents,
            intervals: intervals.into_iter().collect(),
        }
    }

    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    /// Intervals captured for `document`; empty if none were captured.
    pub fn intervals(&self, document: DocumentId) -> &[Interval] {
        self.intervals
            .get(&document)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of captured intervals across all documents.
    pub fn interval_count(&self) -> usize {
        self.intervals.values().map(Vec::len).sum()
    }

    /// Create a replay iterator over a shared result.
    pub fn replay(self: &Arc<Self>) -> ResultIterator {
        ResultIterator::new(Arc::clone(self))
    }
}

/// Replays a [`QueryResult`] without touching the postings source.
///
/// Any number of iterators may share one result; each keeps its own cursor.
#[derive(Debug, Clone)]
pub struct ResultIterator {
    result: Arc<QueryResult>,
    cursor: DocCursor,
}

impl ResultIterator {
    pub fn new(result: Arc<QueryResult>) -> Self {
        ResultIterator {
            result,
            cursor: DocCursor::default(),
        }
    }

    /// The result being replayed.
    pub fn result(&self) -> &Arc<QueryResult> {
        &self.result
    }
}

impl DocumentIterator for ResultIterator {
    fn has_next(&self) -> bool {
        self.cursor.has_next(&self.result.documents)
    }

    fn next(&mut self) -> Result<DocumentId> {
        self.cursor.next(&self.result.documents)
    }

    fn current(&self) -> Option<DocumentId> {
        self.cursor.current()
    }

    fn exhaust(&mut self) {
        self.cursor.exhaust(&self.result.documents);
    }

    fn intervals(&mut self) -> Result<IntervalIterator<'_>> {
        Ok(match self.cursor.document() {
            Some(document) => IntervalIterator::borrowed(self.result.intervals(document)),
            None => IntervalIterator::empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConcordError;
    use crate::postings::NO_MORE_DOCS;
    use crate::query::iterator::{DocumentListIterator, TermPositionsIterator};
    use crate::query::term_positions::TermPositions;

    fn result_of(documents: &[DocumentId]) -> Arc<QueryResult> {
        let mut iter = DocumentListIterator::new(documents.to_vec());
        Arc::new(QueryResult::cache(&mut iter, true).unwrap())
    }

    #[test]
    fn test_skip_to_sentinel() {
        let result = result_of(&[3, 7, 12]);
        let mut iter = result.replay();

        assert_eq!(iter.skip_to(8).unwrap(), 12);
        assert_eq!(iter.skip_to(20).unwrap(), NO_MORE_DOCS);
        assert_eq!(iter.skip_to(8).unwrap(), NO_MORE_DOCS);
        assert!(iter.is_exhausted());
    }

    #[test]
    fn test_next_past_end() {
        let result = result_of(&[1]);
        let mut iter = result.replay();
        assert!(iter.has_next());
        assert_eq!(iter.next().unwrap(), 1);
        assert!(!iter.has_next());
        assert!(matches!(iter.next(), Err(ConcordError::Exhausted)));
    }

    #[test]
    fn test_replay_matches_live_evaluation() {
        let mut builder = TermPositions::allocate(3);
        builder.set_positions(0, 2, vec![4]).unwrap();
        builder.set_positions(1, 6, vec![1, 8]).unwrap();
        builder.set_positions(2, 9, vec![3]).unwrap();
        let positions = builder.build().unwrap();

        let mut live = TermPositionsIterator::new(positions.clone(), 2).unwrap();
        let result = Arc::new(QueryResult::cache(&mut live, true).unwrap());

        let mut original = TermPositionsIterator::new(positions, 2).unwrap();
        let mut replay = result.replay();
        while original.has_next() {
            assert!(replay.has_next());
            assert_eq!(original.next().unwrap(), replay.next().unwrap());
            let expected: Vec<Interval> = original.intervals().unwrap().collect();
            let actual: Vec<Interval> = replay.intervals().unwrap().collect();
            assert_eq!(expected, actual);
        }
        assert!(!replay.has_next());
        assert_eq!(result.interval_count(), 4);
    }

    #[test]
    fn test_discovery_order_preserved() {
        let result = QueryResult::from_parts(
            vec![9, 2, 5],
            vec![(9, vec![Interval::point(0)]), (2, vec![Interval::new(1, 2)])],
        );
        assert_eq!(result.documents(), &[9, 2, 5]);
        assert_eq!(result.intervals(2), &[Interval::new(1, 2)]);
        assert!(result.intervals(5).is_empty());
        assert!(result.intervals(100).is_empty());
    }

    #[test]
    fn test_cache_without_intervals() {
        let mut builder = TermPositions::allocate(1);
        builder.set_positions(0, 4, vec![1]).unwrap();
        let mut live = TermPositionsIterator::new(builder.build().unwrap(), 1).unwrap();

        let result = QueryResult::cache(&mut live, false).unwrap();
        assert_eq!(result.documents(), &[4]);
        assert_eq!(result.interval_count(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let result = result_of(&[1, 2, 3, 4, 5]);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let result = Arc::clone(&result);
                scope.spawn(move || {
                    let mut iter = ResultIterator::new(result);
                    let mut seen = Vec::new();
                    while iter.has_next() {
                        seen.push(iter.next().unwrap());
                    }
                    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
                });
            }
        });
    }

    #[test]
    fn test_empty_result() {
        let result = result_of(&[]);
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        let mut iter = result.replay();
        assert_eq!(iter.skip_to(0).unwrap(), NO_MORE_DOCS);
        assert_eq!(iter.intervals().unwrap().next_interval(), None);
    }
}
