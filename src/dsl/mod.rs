//! Boolean filter language over record properties.
//!
//! Syntax:
//!   "prop" == 1               - equality (also !=, <, <=, >, >=)
//!   "prop" is true            - boolean match
//!   "prop" exists             - property present
//!   "prop" missing            - property absent
//!   "prop" contain "x"        - membership (notcontain negates)
//!   expr and expr and ...     - AND
//!   expr or expr or ...       - OR
//!   (expr)                    - grouping; required to mix `and` with `or`
//!
//! Literals follow JSON: strings, numbers, `true`/`false`. Strings in
//! RFC 3339 or `YYYY-MM-DD` form are treated as dates.

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub(crate) use ast::quote_property;
pub use parser::{MAX_NESTING, parse_expression};
