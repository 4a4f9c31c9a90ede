//! Resolution of compiler input to expression text.

use std::fmt;

use crate::builder::{Condition, Where};
use crate::error::{Error, Result};

/// Anything the compiler can turn into expression text.
///
/// Resolution order: [`build_expression`](Self::build_expression) first, then
/// [`stringify_expression`](Self::stringify_expression). Both default to
/// `None`; a source providing neither, or resolving to blank text, fails
/// with [`Error::EmptyExpression`].
pub trait ExpressionSource {
    /// Canonical text from a builder.
    fn build_expression(&self) -> Option<String> {
        None
    }

    /// Fallback text from a plain string conversion.
    fn stringify_expression(&self) -> Option<String> {
        None
    }
}

/// Resolve a source to non-blank expression text.
pub fn resolve_expression<S: ExpressionSource + ?Sized>(source: &S) -> Result<String> {
    let text = source
        .build_expression()
        .or_else(|| source.stringify_expression())
        .ok_or(Error::EmptyExpression)?;

    if text.trim().is_empty() {
        return Err(Error::EmptyExpression);
    }
    Ok(text)
}

impl ExpressionSource for str {
    fn stringify_expression(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ExpressionSource for String {
    fn stringify_expression(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ExpressionSource for Condition {
    fn build_expression(&self) -> Option<String> {
        Some(self.build())
    }
}

impl ExpressionSource for Where {
    fn build_expression(&self) -> Option<String> {
        Some(self.build())
    }
}

impl<T: ExpressionSource + ?Sized> ExpressionSource for &T {
    fn build_expression(&self) -> Option<String> {
        (**self).build_expression()
    }

    fn stringify_expression(&self) -> Option<String> {
        (**self).stringify_expression()
    }
}

impl<T: ExpressionSource + ?Sized> ExpressionSource for Box<T> {
    fn build_expression(&self) -> Option<String> {
        (**self).build_expression()
    }

    fn stringify_expression(&self) -> Option<String> {
        (**self).stringify_expression()
    }
}

/// `None` resolves to nothing.
impl<T: ExpressionSource> ExpressionSource for Option<T> {
    fn build_expression(&self) -> Option<String> {
        self.as_ref()?.build_expression()
    }

    fn stringify_expression(&self) -> Option<String> {
        self.as_ref()?.stringify_expression()
    }
}

/// Adapter for types that only offer `Display`.
#[derive(Debug, Clone)]
pub struct Displayed<T>(pub T);

impl<T: fmt::Display> ExpressionSource for Displayed<T> {
    fn stringify_expression(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}
