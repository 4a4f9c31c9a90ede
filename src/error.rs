//! Error types for the filter language.

use std::fmt;

use thiserror::Error;

use crate::dsl::Join;

/// A grammar failure with the location of the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarSyntaxError {
    pub message: String,
    /// Byte offset into the expression text.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl GrammarSyntaxError {
    pub(crate) fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };

        Self {
            message: message.into(),
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for GrammarSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

impl std::error::Error for GrammarSyntaxError {}

/// Main error type for parsing, building and compiling expressions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Expression cannot be empty!")]
    EmptyExpression,

    #[error("Syntax error: {0}")]
    Syntax(#[from] GrammarSyntaxError),

    #[error("Invalid operator '{alias}'!")]
    InvalidOperator { alias: String },

    #[error(
        "Illegal operation! Join types cannot be mixed: `{attempted}` on a where already joined by `{current}`; nest a new Where instead"
    )]
    IllegalJoinMix { current: Join, attempted: Join },

    #[error("Incomplete condition: {0}")]
    IncompleteCondition(String),

    #[error("Compilation error: {0}")]
    Compilation(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_counts_lines_and_columns() {
        let err = GrammarSyntaxError::at("\"a\" == 1\nand ?", 13, "unexpected");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 5);
        assert_eq!(err.to_string(), "unexpected at line 2, column 5");
    }

    #[test]
    fn invalid_operator_message() {
        let err = Error::InvalidOperator {
            alias: "bogus".into(),
        };
        assert!(err.to_string().contains("Invalid operator"));
        assert!(err.to_string().contains("bogus"));
    }
}
