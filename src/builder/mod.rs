//! Fluent builders producing filter-language text or AST values.
//!
//! Builders are owned, single-threaded values during authoring; the built
//! `String` or AST is the shareable artifact.

mod condition;
mod where_clause;

pub use condition::{Condition, OPERATOR_ALIASES, cn, condition};
pub use where_clause::{Clause, Where, where_};
