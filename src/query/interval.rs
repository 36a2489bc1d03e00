//! Match intervals within a document.

use std::borrow::Cow;

use crate::postings::Position;

/// A closed span `[start, end]` of positions covered by one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: Position,
    pub end: Position,
}

impl Interval {
    pub fn new(start: Position, end: Position) -> Self {
        Interval { start, end }
    }

    /// Interval covering a single position.
    pub fn point(position: Position) -> Self {
        Interval {
            start: position,
            end: position,
        }
    }

    /// Number of positions covered; 0 when `start > end`.
    pub fn width(&self) -> u64 {
        if self.start > self.end {
            return 0;
        }
        u64::from(self.end - self.start) + 1
    }

    /// Check whether `next` starts at the position right after this interval ends.
    pub fn is_followed_by(&self, next: &Interval) -> bool {
        self.end.checked_add(1) == Some(next.start)
    }
}

/// Lazy cursor over the intervals of the current document.
///
/// Returns `None` from [`next_interval`](Self::next_interval) once the
/// intervals run out; there is no separate has-next check.
#[derive(Debug, Clone)]
pub struct IntervalIterator<'a> {
    intervals: Cow<'a, [Interval]>,
    cursor: usize,
}

impl<'a> IntervalIterator<'a> {
    pub fn borrowed(intervals: &'a [Interval]) -> Self {
        IntervalIterator {
            intervals: Cow::Borrowed(intervals),
            cursor: 0,
        }
    }

    pub fn owned(intervals: Vec<Interval>) -> Self {
        IntervalIterator {
            intervals: Cow::Owned(intervals),
            cursor: 0,
        }
    }

    pub fn empty() -> Self {
        Self::borrowed(&[])
    }

    /// Get the next interval, or `None` when done.
    pub fn next_interval(&mut self) -> Option<Interval> {
        let interval = self.intervals.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(interval)
    }

    /// Number of intervals not yet returned.
    pub fn remaining(&self) -> usize {
        self.intervals.len() - self.cursor
    }
}

impl Iterator for IntervalIterator<'_> {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        self.next_interval()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
