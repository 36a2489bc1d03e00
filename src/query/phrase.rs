//! Exact-order (phrase) matching over term positions.
//!
//! A right-term occurrence at `q` extends a phrase ending at `p` only when
//! `q == p + 1`. The output of [`match_adjacent`] records the right term's
//! positions, i.e. where the phrase so far ends, so it can be fed back in as
//! the left operand for the next term.

use log::trace;

use crate::error::Result;
use crate::postings::{DocumentId, Position};
use crate::query::term_positions::TermPositions;

/// Keep the candidate documents in which some `right` occurrence directly
/// follows a `left` occurrence.
///
/// Every candidate must be present in both `left` and `right`; a missing one
/// surfaces as [`DocumentNotFound`](crate::error::ConcordError::DocumentNotFound).
/// Documents with no adjacent pair are dropped, so the result never holds an
/// empty position list. Cost per document is
/// `O(left positions * right positions)`.
pub fn match_adjacent(
    left: &TermPositions,
    right: &TermPositions,
    candidates: &[DocumentId],
) -> Result<TermPositions> {
    let mut matched: Vec<(DocumentId, Vec<Position>)> = Vec::new();

    for &document in candidates {
        let left_positions = left.positions_of(document)?;
        let right_positions = right.positions_of(document)?;

        let mut hits = Vec::new();
        for &p in left_positions {
            for &q in right_positions {
                if p.checked_add(1) == Some(q) {
                    hits.push(q);
                }
            }
        }

        if !hits.is_empty() {
            matched.push((document, hits));
        }
    }

    let mut builder = TermPositions::allocate(matched.len());
    if let Some(term) = right.term() {
        builder = builder.with_term(term);
    }
    for (index, (document, hits)) in matched.into_iter().enumerate() {
        builder.set_positions(index, document, hits)?;
    }
    builder.build()
}

/// Fold [`match_adjacent`] left to right across the terms of a phrase.
///
/// `candidates` is normally the AND of all terms' documents. Returns `None`
/// as soon as a fold step leaves no document. The returned positions mark
/// where the whole phrase ends in each document.
pub fn match_phrase(
    terms: &[TermPositions],
    candidates: &[DocumentId],
) -> Result<Option<TermPositions>> {
    let Some((first, rest)) = terms.split_first() else {
        return Ok(None);
    };
    if candidates.is_empty() {
        return Ok(None);
    }

    let mut current = restrict(first, candidates)?;
    for right in rest {
        let documents = current.documents().to_vec();
        current = match_adjacent(&current, right, &documents)?;
        if current.is_empty() {
            trace!("phrase emptied out at term {:?}", right.term());
            return Ok(None);
        }
    }
    Ok(Some(current))
}

/// Narrow `source` to `candidates`, keeping its positions.
fn restrict(source: &TermPositions, candidates: &[DocumentId]) -> Result<TermPositions> {
    if source.documents() == candidates {
        return Ok(source.clone());
    }

    let mut builder = TermPositions::allocate(candidates.len());
    if let Some(term) = source.term() {
        builder = builder.with_term(term);
    }
    for (index, &document) in candidates.iter().enumerate() {
        builder.set_positions(index, document, source.positions_of(document)?.to_vec())?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConcordError;

    fn term_positions(term: &str, entries: &[(DocumentId, &[Position])]) -> TermPositions {
        let mut builder = TermPositions::allocate(entries.len()).with_term(term);
        for (index, (document, positions)) in entries.iter().enumerate() {
            builder
                .set_positions(index, *document, positions.to_vec())
                .unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_adjacent_positions_recorded_from_right() {
        let left = term_positions("l", &[(5, &[2]), (9, &[1, 4])]);
        let right = term_positions("r", &[(5, &[3]), (9, &[2, 10])]);

        let result = match_adjacent(&left, &right, &[5, 9]).unwrap();
        assert_eq!(result.documents(), &[5, 9]);
        assert_eq!(result.positions_of(5).unwrap(), &[3]);
        assert_eq!(result.positions_of(9).unwrap(), &[2]);
        assert_eq!(result.term(), Some("r"));
    }

    #[test]
    fn test_document_without_adjacent_pair_dropped() {
        let left = term_positions("l", &[(1, &[0]), (2, &[5])]);
        let right = term_positions("r", &[(1, &[1]), (2, &[3, 7])]);

        let result = match_adjacent(&left, &right, &[1, 2]).unwrap();
        assert_eq!(result.documents(), &[1]);
        assert!(result.positions().iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_reverse_order_does_not_match() {
        let left = term_positions("l", &[(1, &[3])]);
        let right = term_positions("r", &[(1, &[2])]);
        assert!(match_adjacent(&left, &right, &[1]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_candidate_is_error() {
        let left = term_positions("l", &[(1, &[0])]);
        let right = term_positions("r", &[(2, &[1])]);
        assert!(matches!(
            match_adjacent(&left, &right, &[1]),
            Err(ConcordError::DocumentNotFound(1))
        ));
    }

    #[test]
    fn test_three_term_phrase() {
        // doc 1: "a b c" at 0..3; doc 2: "a b x c"; doc 3: "c a b c"
        let a = term_positions("a", &[(1, &[0]), (2, &[0]), (3, &[1])]);
        let b = term_positions("b", &[(1, &[1]), (2, &[1]), (3, &[2])]);
        let c = term_positions("c", &[(1, &[2]), (2, &[3]), (3, &[0, 3])]);

        let result = match_phrase(&[a, b, c], &[1, 2, 3]).unwrap().unwrap();
        assert_eq!(result.documents(), &[1, 3]);
        assert_eq!(result.positions_of(1).unwrap(), &[2]);
        assert_eq!(result.positions_of(3).unwrap(), &[3]);
    }

    #[test]
    fn test_phrase_empties_out() {
        let a = term_positions("a", &[(1, &[0])]);
        let b = term_positions("b", &[(1, &[5])]);
        assert!(match_phrase(&[a, b], &[1]).unwrap().is_none());
    }

    #[test]
    fn test_single_term_phrase_restricted_to_candidates() {
        let a = term_positions("a", &[(1, &[0]), (4, &[2, 6])]);
        let result = match_phrase(&[a], &[4]).unwrap().unwrap();
        assert_eq!(result.documents(), &[4]);
        assert_eq!(result.positions_of(4).unwrap(), &[2, 6]);
    }
}
