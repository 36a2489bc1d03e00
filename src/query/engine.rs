//! Query engine: AND, OR and exact-order evaluation over a postings source.

pub mod config;

use std::sync::Arc;

use log::{debug, trace};

use crate::error::{ConcordError, Result};
use crate::postings::{DocumentId, PostingsSource};
use crate::query::cache::ResultCache;
use crate::query::consecutive::ConsecutiveIterator;
use crate::query::iterator::{
    DocumentIterator, DocumentListIterator, PostingsIterator, TermPositionsIterator,
};
use crate::query::phrase;
use crate::query::request::QueryRequest;
use crate::query::result::{QueryResult, ResultIterator};
use crate::query::set_algebra;
use crate::query::term_positions::TermPositions;

pub use config::{QueryEngineConfig, QueryEngineConfigBuilder};

/// Evaluates term queries against one postings source.
///
/// All evaluation is synchronous and read-only. Per-term position structures
/// live only for the duration of one call; final results can be captured
/// with [`cache`](Self::cache) or [`evaluate`](Self::evaluate) and extended
/// later without recomputing them.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use concord::postings::memory::MemoryPostings;
/// use concord::query::engine::QueryEngine;
///
/// let postings = MemoryPostings::builder()
///     .add_document(7, &["a", "b", "c"])
///     .add_document(8, &["c", "b", "a"])
///     .build()
///     .unwrap();
/// let engine = QueryEngine::new(Arc::new(postings));
///
/// assert_eq!(engine.query_and(&["a", "c"]).unwrap(), vec![7, 8]);
/// let phrase = engine.query_exact_order(&["b", "c"]).unwrap().unwrap();
/// assert_eq!(phrase.documents(), &[7]);
/// ```
#[derive(Debug)]
pub struct QueryEngine {
    source: Arc<dyn PostingsSource>,
    config: QueryEngineConfig,
    cache: ResultCache,
    /// Label used in errors, e.g. the field this engine is bound to.
    label: String,
    positional: bool,
}

impl QueryEngine {
    /// Create an engine with the default configuration.
    pub fn new(source: Arc<dyn PostingsSource>) -> Self {
        Self::with_config(source, QueryEngineConfig::default())
    }

    pub fn with_config(source: Arc<dyn PostingsSource>, config: QueryEngineConfig) -> Self {
        QueryEngine {
            source,
            cache: ResultCache::new(config.result_cache_capacity),
            config,
            label: "default".to_string(),
            positional: true,
        }
    }

    /// Bind the engine to a named index and declare whether it has positions.
    pub(crate) fn with_capabilities<S: Into<String>>(mut self, label: S, positional: bool) -> Self {
        self.label = label.into();
        self.positional = positional;
        self
    }

    pub fn config(&self) -> &QueryEngineConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<dyn PostingsSource> {
        &self.source
    }

    pub fn result_cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Check whether exact-order queries and extensions are supported.
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Documents containing `term`. An absent term yields an empty list.
    pub fn query_term(&self, term: &str) -> Result<Vec<DocumentId>> {
        self.source.postings_for(term)
    }

    /// Like [`query_term`](Self::query_term) but reports an absent term as
    /// [`ConcordError::TermNotFound`]. Meant for single-term diagnostics.
    pub fn query_term_checked(&self, term: &str) -> Result<Vec<DocumentId>> {
        if !self.source.term_exists(term)? {
            return Err(ConcordError::term_not_found(term));
        }
        self.query_term(term)
    }

    /// Documents containing `term` and, if requested, its positions in each.
    pub fn query_term_with_positions(
        &self,
        term: &str,
        collect_positions: bool,
    ) -> Result<(Vec<DocumentId>, Option<TermPositions>)> {
        let documents = self.query_term(term)?;
        if !collect_positions {
            return Ok((documents, None));
        }
        self.require_positions()?;
        let positions = self.collect_positions(term, &documents)?;
        Ok((documents, Some(positions)))
    }

    /// Documents containing every term.
    ///
    /// Stops querying further terms as soon as the running intersection is
    /// empty.
    pub fn query_and<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<DocumentId>> {
        self.check_terms(terms)?;
        let documents = set_algebra::try_and_all(terms.iter().map(|term| {
            let postings = self.query_term(term.as_ref());
            if let Ok(list) = &postings
                && list.is_empty()
            {
                trace!("AND short-circuit on term {:?}", term.as_ref());
            }
            postings
        }))?;
        debug!(
            "AND over {} terms matched {} documents",
            terms.len(),
            documents.len()
        );
        Ok(documents)
    }

    /// Documents containing any of the terms.
    pub fn query_or<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<DocumentId>> {
        self.check_terms(terms)?;
        let documents =
            set_algebra::try_or_all(terms.iter().map(|term| self.query_term(term.as_ref())))?;
        debug!(
            "OR over {} terms matched {} documents",
            terms.len(),
            documents.len()
        );
        Ok(documents)
    }

    /// Documents containing the terms at consecutive positions, in order.
    ///
    /// Returns `None` when nothing matches. Positions are only collected if
    /// the AND of all terms is non-empty, and only for those documents. The
    /// returned positions mark where the phrase ends in each document.
    pub fn query_exact_order<S: AsRef<str>>(&self, terms: &[S]) -> Result<Option<TermPositions>> {
        self.check_terms(terms)?;
        self.require_positions()?;

        let candidates = self.query_and(terms)?;
        if candidates.is_empty() {
            trace!("exact-order query skipped position collection: no common documents");
            return Ok(None);
        }

        let per_term = terms
            .iter()
            .map(|term| self.collect_positions(term.as_ref(), &candidates))
            .collect::<Result<Vec<_>>>()?;

        let matched = phrase::match_phrase(&per_term, &candidates)?;
        debug!(
            "exact-order over {} terms matched {} of {} candidate documents",
            terms.len(),
            matched.as_ref().map_or(0, TermPositions::len),
            candidates.len()
        );
        Ok(matched)
    }

    /// Exact-order evaluation as a document iterator whose intervals span
    /// the whole phrase.
    pub fn exact_order_iterator<S: AsRef<str>>(
        &self,
        terms: &[S],
    ) -> Result<Box<dyn DocumentIterator>> {
        let iter: Box<dyn DocumentIterator> = match self.query_exact_order(terms)? {
            Some(positions) => Box::new(TermPositionsIterator::new(positions, terms.len())?),
            None => Box::new(DocumentListIterator::empty()),
        };
        Ok(iter)
    }

    /// Evaluate `request` into a live document iterator.
    pub fn iterator(&self, request: &QueryRequest) -> Result<Box<dyn DocumentIterator>> {
        let iter: Box<dyn DocumentIterator> = match request {
            QueryRequest::Term(term) => {
                Box::new(PostingsIterator::new(Arc::clone(&self.source), term.as_str())?)
            }
            QueryRequest::And(terms) => {
                Box::new(DocumentListIterator::new(self.query_and(terms.as_slice())?))
            }
            QueryRequest::Or(terms) => {
                Box::new(DocumentListIterator::new(self.query_or(terms.as_slice())?))
            }
            QueryRequest::ExactOrder(terms) => self.exact_order_iterator(terms.as_slice())?,
        };
        Ok(iter)
    }

    /// Drain `evaluation` into a [`QueryResult`], keeping intervals if the
    /// configuration says so.
    pub fn cache(&self, evaluation: &mut dyn DocumentIterator) -> Result<QueryResult> {
        QueryResult::cache(evaluation, self.config.cache_intervals)
    }

    /// Evaluate `request` and cache the result, reusing a previously cached
    /// result for the same request.
    pub fn evaluate(&self, request: &QueryRequest) -> Result<Arc<QueryResult>> {
        self.cache.get_or_try_insert(request, || {
            let mut evaluation = self.iterator(request)?;
            self.cache(evaluation.as_mut())
        })
    }

    /// Grow a cached result by one word on its left.
    ///
    /// Matches documents where `word` occurs immediately before one of the
    /// result's intervals. The result's documents must be ascending, which
    /// holds for every result produced by this engine. A non-empty result
    /// captured without intervals (AND / OR requests, or `cache_intervals`
    /// turned off) is rejected with [`ConcordError::InvalidArgument`].
    pub fn extend_on_left(
        &self,
        result: &Arc<QueryResult>,
        word: &str,
    ) -> Result<ConsecutiveIterator> {
        self.require_positions()?;
        require_intervals(result)?;
        let postings = PostingsIterator::new(Arc::clone(&self.source), word)?;
        ConsecutiveIterator::new(
            Box::new(postings),
            Box::new(ResultIterator::new(Arc::clone(result))),
        )
    }

    /// Grow a cached result by one word on its right.
    pub fn extend_on_right(
        &self,
        result: &Arc<QueryResult>,
        word: &str,
    ) -> Result<ConsecutiveIterator> {
        self.require_positions()?;
        require_intervals(result)?;
        let postings = PostingsIterator::new(Arc::clone(&self.source), word)?;
        ConsecutiveIterator::new(
            Box::new(ResultIterator::new(Arc::clone(result))),
            Box::new(postings),
        )
    }

    fn check_terms<S: AsRef<str>>(&self, terms: &[S]) -> Result<()> {
        if terms.is_empty() {
            return Err(ConcordError::EmptyQuery);
        }
        if terms.len() > self.config.max_terms {
            return Err(ConcordError::invalid_argument(format!(
                "query has {} terms, at most {} allowed",
                terms.len(),
                self.config.max_terms
            )));
        }
        Ok(())
    }

    fn require_positions(&self) -> Result<()> {
        if self.positional {
            Ok(())
        } else {
            Err(ConcordError::positions_unavailable(self.label.as_str()))
        }
    }

    /// Build the positions of `term` for the given documents.
    fn collect_positions(&self, term: &str, documents: &[DocumentId]) -> Result<TermPositions> {
        let mut builder = TermPositions::allocate(documents.len()).with_term(term);
        for (index, &document) in documents.iter().enumerate() {
            builder.set_positions(index, document, self.source.positions_for(term, document)?)?;
        }
        builder.build()
    }
}

fn require_intervals(result: &QueryResult) -> Result<()> {
    if !result.is_empty() && result.interval_count() == 0 {
        return Err(ConcordError::invalid_argument(format!(
            "cannot extend a result of {} documents that carries no intervals",
            result.len()
        )));
    }
    Ok(())
}
