//! A small boolean filter language for selecting records by property
//! conditions, compiled into Elasticsearch bool queries.
//!
//! ```
//! use muto::{cn, parse, where_, EsQuery, FieldSet};
//!
//! # fn main() -> muto::Result<()> {
//! let query = parse(r#""passenger_count" > 81 and "discount" is false"#, &FieldSet::new())?;
//! assert!(query.is_bool());
//!
//! let built = where_(cn("a").eq(1)).or(cn("b").eq(2))?;
//! assert_eq!(
//!     parse(&built, &FieldSet::new())?,
//!     EsQuery::should(vec![EsQuery::term("a", 1), EsQuery::term("b", 2)])
//! );
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod compiler;
pub mod config;
pub mod dsl;
pub mod error;
pub mod query;

pub use builder::{Clause, Condition, Where, cn, condition, where_};
pub use compiler::{Compiler, Displayed, ExpressionSource, FieldSet, parse, pretty_print};
pub use error::{Error, GrammarSyntaxError, Result};
pub use query::{ElasticBuilder, EsQuery, QueryBuilderDef};

/// The grammar failure type, under the name callers match on.
pub use error::GrammarSyntaxError as SyntaxError;
