use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for a [`QueryEngine`](super::QueryEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryEngineConfig {
    /// Maximum number of terms accepted in one query.
    pub max_terms: usize,
    /// Whether cached results keep per-document intervals.
    pub cache_intervals: bool,
    /// Number of evaluated requests kept in the result cache. 0 disables it.
    pub result_cache_capacity: usize,
}

impl QueryEngineConfig {
    pub fn new() -> Self {
        Self {
            max_terms: 64,
            cache_intervals: true,
            result_cache_capacity: 128,
        }
    }

    pub fn builder() -> QueryEngineConfigBuilder {
        QueryEngineConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for QueryEngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct QueryEngineConfigBuilder {
    config: QueryEngineConfig,
}

impl QueryEngineConfigBuilder {
    pub fn max_terms(mut self, max_terms: usize) -> Self {
        self.config.max_terms = max_terms;
        self
    }

    pub fn cache_intervals(mut self, cache_intervals: bool) -> Self {
        self.config.cache_intervals = cache_intervals;
        self
    }

    pub fn result_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.result_cache_capacity = capacity;
        self
    }

    pub fn build(self) -> QueryEngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueryEngineConfig::default();
        assert_eq!(config.max_terms, 64);
        assert!(config.cache_intervals);
        assert_eq!(config.result_cache_capacity, 128);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = QueryEngineConfig::from_json(r#"{"max_terms": 8}"#).unwrap();
        assert_eq!(config.max_terms, 8);
        assert!(config.cache_intervals);
        assert_eq!(config.result_cache_capacity, 128);
    }

    #[test]
    fn test_builder_and_json() {
        let config = QueryEngineConfig::builder()
            .max_terms(4)
            .cache_intervals(false)
            .result_cache_capacity(0)
            .build();
        let parsed = QueryEngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
        assert!(QueryEngineConfig::from_json("{").is_err());
    }
}
