//! LRU cache of evaluated query results.

use std::num::NonZeroUsize;
use std::sync::Arc;

use log::trace;
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::Result;
use crate::query::request::QueryRequest;
use crate::query::result::QueryResult;

/// Bounded cache of [`QueryResult`]s keyed by the request that produced them.
///
/// Only final results are cached. Per-term position structures are rebuilt
/// for every evaluation.
#[derive(Debug)]
pub struct ResultCache {
    /// `None` when the cache is disabled (capacity 0).
    entries: Option<Mutex<LruCache<QueryRequest, Arc<QueryResult>>>>,
}

impl ResultCache {
    /// Create a cache holding up to `capacity` results. `0` disables caching.
    pub fn new(capacity: usize) -> Self {
        ResultCache {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Look up a cached result, marking it most recently used.
    pub fn get(&self, request: &QueryRequest) -> Option<Arc<QueryResult>> {
        let entries = self.entries.as_ref()?;
        let hit = entries.lock().get(request).cloned();
        trace!(
            "result cache {} for {}",
            if hit.is_some() { "hit" } else { "miss" },
            request.description()
        );
        hit
    }

    /// Insert a result, evicting the least recently used entry when full.
    pub fn insert(&self, request: QueryRequest, result: Arc<QueryResult>) {
        if let Some(entries) = &self.entries {
            entries.lock().put(request, result);
        }
    }

    /// Return the cached result for `request` or evaluate and cache it.
    ///
    /// The lock is not held during evaluation; concurrent misses on the same
    /// request may both evaluate, and the last insert wins.
    pub fn get_or_try_insert<F>(
        &self,
        request: &QueryRequest,
        evaluate: F,
    ) -> Result<Arc<QueryResult>>
    where
        F: FnOnce() -> Result<QueryResult>,
    {
        if let Some(hit) = self.get(request) {
            return Ok(hit);
        }
        let result = Arc::new(evaluate()?);
        self.insert(request.clone(), Arc::clone(&result));
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConcordError;

    fn result(documents: &[u32]) -> QueryResult {
        QueryResult::from_parts(documents.to_vec(), Vec::new())
    }

    #[test]
    fn test_get_or_try_insert_evaluates_once() {
        let cache = ResultCache::new(4);
        let request = QueryRequest::and(["a", "b"]);
        let mut evaluations = 0;

        for _ in 0..3 {
            let cached = cache
                .get_or_try_insert(&request, || {
                    evaluations += 1;
                    Ok(result(&[1, 2]))
                })
                .unwrap();
            assert_eq!(cached.documents(), &[1, 2]);
        }
        assert_eq!(evaluations, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_requests_with_same_description_kept_apart() {
        let cache = ResultCache::new(4);
        let joined = QueryRequest::or(["new york"]);
        let split = QueryRequest::or(["new", "york"]);
        assert_eq!(joined.description(), split.description());

        cache.insert(joined.clone(), Arc::new(result(&[1])));
        assert!(cache.get(&split).is_none());
        cache.insert(split.clone(), Arc::new(result(&[2, 3])));

        assert_eq!(cache.get(&joined).unwrap().documents(), &[1]);
        assert_eq!(cache.get(&split).unwrap().documents(), &[2, 3]);
        assert!(cache.get(&QueryRequest::term("+a +b")).is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ResultCache::new(2);
        let (a, b, c) = (
            QueryRequest::term("a"),
            QueryRequest::term("b"),
            QueryRequest::term("c"),
        );
        cache.insert(a.clone(), Arc::new(result(&[1])));
        cache.insert(b.clone(), Arc::new(result(&[2])));
        assert!(cache.get(&a).is_some());
        cache.insert(c.clone(), Arc::new(result(&[3])));

        assert!(cache.get(&b).is_none());
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&c).is_some());
    }

    #[test]
    fn test_disabled_cache() {
        let cache = ResultCache::new(0);
        let request = QueryRequest::term("a");
        assert!(!cache.is_enabled());
        cache.insert(request.clone(), Arc::new(result(&[1])));
        assert!(cache.get(&request).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = ResultCache::new(2);
        let err = cache.get_or_try_insert(&QueryRequest::term("x"), || {
            Err(ConcordError::EmptyQuery)
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
