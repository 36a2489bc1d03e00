//! Query requests accepted by the engine.

use serde::{Deserialize, Serialize};

/// A term-level query to evaluate against one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryRequest {
    /// Documents containing a single term.
    Term(String),
    /// Documents containing every term.
    And(Vec<String>),
    /// Documents containing any term.
    Or(Vec<String>),
    /// Documents containing the terms at consecutive positions, in order.
    ExactOrder(Vec<String>),
}

impl QueryRequest {
    /// Create a single-term request.
    pub fn term<S: Into<String>>(term: S) -> Self {
        QueryRequest::Term(term.into())
    }

    /// Create an AND request.
    pub fn and<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryRequest::And(terms.into_iter().map(Into::into).collect())
    }

    /// Create an OR request.
    pub fn or<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryRequest::Or(terms.into_iter().map(Into::into).collect())
    }

    /// Create an exact-order (phrase) request.
    pub fn exact_order<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryRequest::ExactOrder(terms.into_iter().map(Into::into).collect())
    }

    /// The terms of this request, in order.
    pub fn terms(&self) -> &[String] {
        match self {
            QueryRequest::Term(term) => std::slice::from_ref(term),
            QueryRequest::And(terms) | QueryRequest::Or(terms) | QueryRequest::ExactOrder(terms) => {
                terms
            }
        }
    }

    /// Check whether positions are needed to evaluate this request.
    pub fn is_positional(&self) -> bool {
        matches!(self, QueryRequest::ExactOrder(_))
    }

    /// Human-readable form for logs and diagnostics.
    ///
    /// Not unique: terms containing spaces or query syntax can make two
    /// different requests print the same.
    pub fn description(&self) -> String {
        match self {
            QueryRequest::Term(term) => term.clone(),
            QueryRequest::And(terms) => terms
                .iter()
                .map(|t| format!("+{t}"))
                .collect::<Vec<_>>()
                .join(" "),
            QueryRequest::Or(terms) => format!("({})", terms.join(" ")),
            QueryRequest::ExactOrder(terms) => format!("\"{}\"", terms.join(" ")),
        }
    }
}
