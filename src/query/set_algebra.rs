//! Intersection and union of sorted document lists.
//!
//! # Caller contract
//!
//! Every input must be sorted ascending with no duplicates. This is not
//! checked at runtime; on violating input the output is unspecified (but
//! never a panic).

use crate::error::{ConcordError, Result};
use crate::postings::DocumentId;

/// Intersect two sorted document lists.
///
/// Runs in `O(a.len() + b.len())`.
pub fn intersect(a: &[DocumentId], b: &[DocumentId]) -> Vec<DocumentId> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            result.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    result
}

/// Union of two sorted document lists.
///
/// Runs in `O(a.len() + b.len())`.
pub fn union(a: &[DocumentId], b: &[DocumentId]) -> Vec<DocumentId> {
    let mut result: Vec<DocumentId> = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            result.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            result.push(b[j]);
            j += 1;
        } else {
            result.push(a[i]);
            i += 1;
            j += 1;
        }
    }

    // Only one tail remains; suppress a duplicate of the last emitted value.
    for &doc in a[i..].iter().chain(&b[j..]) {
        if result.last() != Some(&doc) {
            result.push(doc);
        }
    }
    result
}

/// Left-fold `intersect` over the lists, stopping at the first empty result.
///
/// Lists after the first empty partial result are never pulled from the
/// iterator, so a lazy producer does no further work.
pub fn and_all<I>(lists: I) -> Result<Vec<DocumentId>>
where
    I: IntoIterator<Item = Vec<DocumentId>>,
{
    try_and_all(lists.into_iter().map(Ok))
}

/// Left-fold `union` over the lists.
pub fn or_all<I>(lists: I) -> Result<Vec<DocumentId>>
where
    I: IntoIterator<Item = Vec<DocumentId>>,
{
    try_or_all(lists.into_iter().map(Ok))
}

/// Fallible variant of [`and_all`] for producers that may fail.
pub fn try_and_all<I>(lists: I) -> Result<Vec<DocumentId>>
where
    I: IntoIterator<Item = Result<Vec<DocumentId>>>,
{
    let mut lists = lists.into_iter();
    let mut acc = lists.next().ok_or(ConcordError::EmptyQuery)??;

    while !acc.is_empty() {
        match lists.next() {
            Some(list) => acc = intersect(&acc, &list?),
            None => break,
        }
    }
    Ok(acc)
}

/// Fallible variant of [`or_all`] for producers that may fail.
pub fn try_or_all<I>(lists: I) -> Result<Vec<DocumentId>>
where
    I: IntoIterator<Item = Result<Vec<DocumentId>>>,
{
    let mut lists = lists.into_iter();
    let mut acc = lists.next().ok_or(ConcordError::EmptyQuery)??;

    for list in lists {
        acc = union(&acc, &list?);
    }
    Ok(acc)
}
