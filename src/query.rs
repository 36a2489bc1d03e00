//! Query evaluation core.
//!
//! # Module Structure
//!
//! - `set_algebra`: intersection and union of sorted document lists
//! - `term_positions`: per-term documents with aligned position lists
//! - `phrase`: exact-order matching over term positions
//! - `interval`: match intervals and their lazy iterator
//! - `iterator`: the `DocumentIterator` trait and live iterators
//! - `result`: cacheable results and their replay iterator
//! - `consecutive`: two-operand consecutive matching
//! - `request`: query requests accepted by the engine
//! - `cache`: LRU cache of evaluated results
//! - `engine`: orchestration of all of the above

pub mod cache;
pub mod consecutive;
pub mod engine;
pub mod interval;
pub mod iterator;
pub mod phrase;
pub mod request;
pub mod result;
pub mod set_algebra;
pub mod term_positions;

pub use consecutive::ConsecutiveIterator;
pub use engine::{QueryEngine, QueryEngineConfig};
pub use interval::{Interval, IntervalIterator};
pub use iterator::{DocumentIterator, DocumentListIterator, PostingsIterator, TermPositionsIterator};
pub use request::QueryRequest;
pub use result::{QueryResult, ResultIterator};
pub use term_positions::{TermPositions, TermPositionsBuilder};
