//! Per-field index registry.
//!
//! A corpus is indexed once per annotation layer (surface words, lemmas,
//! part-of-speech tags). Each layer is a [`Field`] bound to a [`FieldIndex`]
//! when the registry is built; the mapping never changes afterward.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConcordError, Result};
use crate::postings::PostingsSource;
use crate::query::engine::{QueryEngine, QueryEngineConfig};

/// Annotation layer an index is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Surface word forms.
    Word,
    /// Lemmatized forms.
    Lemma,
    /// Part-of-speech tags.
    Tag,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Word, Field::Lemma, Field::Tag];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Word => "word",
            Field::Lemma => "lemma",
            Field::Tag => "tag",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a registered field can do.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    /// Postings for the field.
    pub source: Arc<dyn PostingsSource>,
    /// Whether positions are stored, enabling exact-order queries.
    pub positional: bool,
}

impl FieldIndex {
    pub fn positional(source: Arc<dyn PostingsSource>) -> Self {
        FieldIndex {
            source,
            positional: true,
        }
    }

    pub fn documents_only(source: Arc<dyn PostingsSource>) -> Self {
        FieldIndex {
            source,
            positional: false,
        }
    }
}

/// Fixed mapping from [`Field`] to its index.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    fields: [Option<FieldIndex>; 3],
}

impl IndexRegistry {
    pub fn builder() -> IndexRegistryBuilder {
        IndexRegistryBuilder::default()
    }

    /// Get the index registered for `field`.
    pub fn get(&self, field: Field) -> Result<&FieldIndex> {
        self.fields[field.slot()]
            .as_ref()
            .ok_or_else(|| ConcordError::field_not_configured(field.as_str()))
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields[field.slot()].is_some()
    }

    /// Fields with a registered index, in declaration order.
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.contains(*field))
            .collect()
    }

    /// Create a query engine over `field`.
    pub fn engine(&self, field: Field, config: QueryEngineConfig) -> Result<QueryEngine> {
        let index = self.get(field)?;
        Ok(QueryEngine::with_config(Arc::clone(&index.source), config)
            .with_capabilities(field.as_str(), index.positional))
    }
}

#[derive(Debug, Default)]
pub struct IndexRegistryBuilder {
    fields: [Option<FieldIndex>; 3],
}

impl IndexRegistryBuilder {
    /// Register `index` for `field`, replacing any earlier registration.
    pub fn register(mut self, field: Field, index: FieldIndex) -> Self {
        self.fields[field.slot()] = Some(index);
        self
    }

    /// Finish the registry. At least one field must be registered.
    pub fn build(self) -> Result<IndexRegistry> {
        if self.fields.iter().all(Option::is_none) {
            return Err(ConcordError::invalid_argument(
                "index registry needs at least one field",
            ));
        }
        Ok(IndexRegistry {
            fields: self.fields,
        })
    }
}
