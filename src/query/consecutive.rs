//! Consecutive matching of two document iterators.

use crate::error::{ConcordError, Result};
use crate::postings::{DocumentId, NO_MORE_DOCS};
use crate::query::interval::{Interval, IntervalIterator};
use crate::query::iterator::DocumentIterator;

/// Matches documents where an interval of the first operand is immediately
/// followed by an interval of the second.
///
/// For each common document every pair `(a, b)` with `a.end + 1 == b.start`
/// yields the interval `[a.start, b.end]`. Documents without such a pair are
/// skipped. The next match is computed one step ahead so `has_next` is exact.
#[derive(Debug)]
pub struct ConsecutiveIterator {
    first: Box<dyn DocumentIterator>,
    second: Box<dyn DocumentIterator>,
    /// Lowest document the next match may have.
    target: DocumentId,
    lookahead: Option<(DocumentId, Vec<Interval>)>,
    current: Option<(DocumentId, Vec<Interval>)>,
    exhausted: bool,
}

impl ConsecutiveIterator {
    pub fn new(first: Box<dyn DocumentIterator>, second: Box<dyn DocumentIterator>) -> Result<Self> {
        let mut iter = ConsecutiveIterator {
            first,
            second,
            target: 0,
            lookahead: None,
            current: None,
            exhausted: false,
        };
        iter.lookahead = iter.find_next()?;
        Ok(iter)
    }

    fn find_next(&mut self) -> Result<Option<(DocumentId, Vec<Interval>)>> {
        loop {
            if self.target == NO_MORE_DOCS {
                return Ok(None);
            }
            let doc = self.first.skip_to(self.target)?;
            if doc == NO_MORE_DOCS {
                self.target = NO_MORE_DOCS;
                return Ok(None);
            }
            let other = self.second.skip_to(doc)?;
            if other == NO_MORE_DOCS {
                self.target = NO_MORE_DOCS;
                return Ok(None);
            }
            if other != doc {
                self.target = other;
                continue;
            }

            self.target = doc + 1;
            let left: Vec<Interval> = self.first.intervals()?.collect();
            let right: Vec<Interval> = self.second.intervals()?.collect();
            let joined = join_adjacent(&left, &right);
            if !joined.is_empty() {
                return Ok(Some((doc, joined)));
            }
        }
    }
}

fn join_adjacent(left: &[Interval], right: &[Interval]) -> Vec<Interval> {
    let mut joined = Vec::new();
    for a in left {
        for b in right {
            if a.is_followed_by(b) {
                joined.push(Interval::new(a.start, b.end));
            }
        }
    }
    joined
}

impl DocumentIterator for ConsecutiveIterator {
    fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    fn next(&mut self) -> Result<DocumentId> {
        let (doc, intervals) = self.lookahead.take().ok_or(ConcordError::Exhausted)?;
        self.current = Some((doc, intervals));
        self.lookahead = self.find_next()?;
        Ok(doc)
    }

    fn current(&self) -> Option<DocumentId> {
        if self.exhausted {
            return Some(NO_MORE_DOCS);
        }
        self.current.as_ref().map(|(doc, _)| *doc)
    }

    fn exhaust(&mut self) {
        self.exhausted = true;
        self.target = NO_MORE_DOCS;
        self.lookahead = None;
        self.current = None;
    }

    fn intervals(&mut self) -> Result<IntervalIterator<'_>> {
        Ok(match &self.current {
            Some((_, intervals)) => IntervalIterator::borrowed(intervals),
            None => IntervalIterator::empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::postings::PostingsSource;
    use crate::postings::memory::MemoryPostings;
    use crate::query::iterator::PostingsIterator;
    use crate::query::result::QueryResult;

    fn source() -> Arc<dyn PostingsSource> {
        Arc::new(
            MemoryPostings::builder()
                .add_document(1, &["new", "york", "city"])
                .add_document(2, &["york", "new"])
                .add_document(4, &["new", "york", "new", "york"])
                .add_document(6, &["york"])
                .build()
                .unwrap(),
        )
    }

    fn postings(source: &Arc<dyn PostingsSource>, term: &str) -> Box<dyn DocumentIterator> {
        Box::new(PostingsIterator::new(Arc::clone(source), term).unwrap())
    }

    #[test]
    fn test_two_terms_consecutive() {
        let source = source();
        let mut iter =
            ConsecutiveIterator::new(postings(&source, "new"), postings(&source, "york")).unwrap();

        assert!(iter.has_next());
        assert_eq!(iter.next().unwrap(), 1);
        assert_eq!(
            iter.intervals().unwrap().collect::<Vec<_>>(),
            vec![Interval::new(0, 1)]
        );
        assert_eq!(iter.next().unwrap(), 4);
        assert_eq!(
            iter.intervals().unwrap().collect::<Vec<_>>(),
            vec![Interval::new(0, 1), Interval::new(2, 3)]
        );
        assert!(!iter.has_next());
        assert!(matches!(iter.next(), Err(ConcordError::Exhausted)));
    }

    #[test]
    fn test_chained_consecutive_is_cacheable() {
        let source = source();
        let new_york =
            ConsecutiveIterator::new(postings(&source, "new"), postings(&source, "york")).unwrap();
        let mut new_york_city =
            ConsecutiveIterator::new(Box::new(new_york), postings(&source, "city")).unwrap();

        let result = QueryResult::cache(&mut new_york_city, true).unwrap();
        assert_eq!(result.documents(), &[1]);
        assert_eq!(result.intervals(1), &[Interval::new(0, 2)]);
    }

    #[test]
    fn test_skip_to() {
        let source = source();
        let mut iter =
            ConsecutiveIterator::new(postings(&source, "new"), postings(&source, "york")).unwrap();
        assert_eq!(iter.skip_to(2).unwrap(), 4);
        assert_eq!(iter.skip_to(5).unwrap(), NO_MORE_DOCS);
        assert_eq!(iter.skip_to(4).unwrap(), NO_MORE_DOCS);
        assert!(iter.is_exhausted());
        assert_eq!(iter.intervals().unwrap().count(), 0);
    }

    #[test]
    fn test_no_common_documents() {
        let source = source();
        let iter =
            ConsecutiveIterator::new(postings(&source, "city"), postings(&source, "missing"))
                .unwrap();
        assert!(!iter.has_next());
        assert_eq!(iter.current(), None);
    }
}
