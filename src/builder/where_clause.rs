//! `Where` expression builder.

use serde::{Serialize, Serializer};
use std::fmt;

use super::condition::Condition;
use crate::dsl::{Expr, Group, Join, parse_expression};
use crate::error::{Error, Result};

/// A child of a `Where`: a condition, a nested `Where`, or raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Condition(Condition),
    Where(Where),
    Text(String),
}

impl Clause {
    pub fn build(&self) -> String {
        match self {
            Clause::Condition(c) => c.build(),
            Clause::Where(w) => w.build(),
            Clause::Text(t) => t.clone(),
        }
    }

    fn to_ast(&self) -> Result<Expr> {
        match self {
            Clause::Condition(c) => c.to_ast().map(Expr::Condition),
            Clause::Where(w) => w.to_ast(),
            Clause::Text(t) => Ok(parse_expression(t)?),
        }
    }
}

impl From<Condition> for Clause {
    fn from(value: Condition) -> Self {
        Clause::Condition(value)
    }
}

impl From<Where> for Clause {
    fn from(value: Where) -> Self {
        Clause::Where(value)
    }
}

impl From<&str> for Clause {
    fn from(value: &str) -> Self {
        Clause::Text(value.to_string())
    }
}

impl From<String> for Clause {
    fn from(value: String) -> Self {
        Clause::Text(value)
    }
}

/// Builds a parenthesized group of clauses sharing one join.
///
/// ```
/// use muto::{cn, where_, Where};
///
/// # fn main() -> muto::Result<()> {
/// let text = Where::new()
///     .or(cn("discount").is(false))?
///     .or(where_(cn("psngr_cnt").gt(81)).and(r#""booking_mode" contain "Airport""#)?)?
///     .build();
/// assert_eq!(
///     text,
///     r#"("discount" is false or ("psngr_cnt" > 81 and "booking_mode" contain "Airport"))"#
/// );
/// # Ok(())
/// # }
/// ```
///
/// The first `and`/`or` call fixes the join; calling the other one fails
/// with [`Error::IllegalJoinMix`]. Nest a new `Where` to combine them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    join: Option<Join>,
    clauses: Vec<Clause>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `Where` starting with one clause.
    pub fn with(initial: impl Into<Clause>) -> Self {
        Self {
            join: None,
            clauses: vec![initial.into()],
        }
    }

    pub fn and(self, clause: impl Into<Clause>) -> Result<Self> {
        self.add_clause(Join::And, clause.into())
    }

    pub fn or(self, clause: impl Into<Clause>) -> Result<Self> {
        self.add_clause(Join::Or, clause.into())
    }

    fn add_clause(mut self, join: Join, clause: Clause) -> Result<Self> {
        match self.join {
            None => self.join = Some(join),
            Some(current) if current != join => {
                return Err(Error::IllegalJoinMix {
                    current,
                    attempted: join,
                });
            }
            Some(_) => {}
        }

        self.clauses.push(clause);
        Ok(self)
    }

    pub fn join(&self) -> Option<Join> {
        self.join
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render the group in the filter language, wrapped in parentheses.
    pub fn build(&self) -> String {
        let separator = format!(" {} ", self.join.unwrap_or(Join::And));
        let body = self
            .clauses
            .iter()
            .map(Clause::build)
            .collect::<Vec<_>>()
            .join(&separator);
        format!("({})", body)
    }

    /// Whether raw text appears anywhere in this group or its nested groups.
    pub fn contains_text(&self) -> bool {
        self.clauses.iter().any(|clause| match clause {
            Clause::Text(_) => true,
            Clause::Where(w) => w.contains_text(),
            Clause::Condition(_) => false,
        })
    }

    /// Convert to an AST group. An empty `Where` gives an empty group,
    /// which the compiler rejects.
    ///
    /// Raw text is spliced into the built expression verbatim, so a group
    /// holding any is converted by parsing [`Where::build`].
    pub fn to_ast(&self) -> Result<Expr> {
        if self.contains_text() {
            return Ok(parse_expression(&self.build())?);
        }

        let children = self
            .clauses
            .iter()
            .map(Clause::to_ast)
            .collect::<Result<Vec<_>>>()?;

        Ok(Expr::Group(Group {
            join: self.join.unwrap_or(Join::And),
            children,
        }))
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl Serialize for Where {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.build())
    }
}

/// Shorthand for [`Where::with`].
pub fn where_(initial: impl Into<Clause>) -> Where {
    Where::with(initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::cn;

    #[test]
    fn builds_and_group() {
        let w = where_(cn("a").eq(1)).and(cn("b").eq(2)).unwrap();
        assert_eq!(w.build(), r#"("a" == 1 and "b" == 2)"#);
        assert_eq!(w.join(), Some(Join::And));
    }

    #[test]
    fn builds_or_group_with_text() {
        let w = Where::new()
            .or(cn("a").eq(1))
            .unwrap()
            .or(r#""b" exists"#)
            .unwrap();
        assert_eq!(w.build(), r#"("a" == 1 or "b" exists)"#);
    }

    #[test]
    fn builds_single_clause() {
        assert_eq!(where_(cn("a").eq(1)).build(), r#"("a" == 1)"#);
    }

    #[test]
    fn builds_nested() {
        let w = where_(cn("a").eq(1))
            .and(where_(cn("b").eq(2)).or(cn("c").eq(3)).unwrap())
            .unwrap();
        assert_eq!(w.build(), r#"("a" == 1 and ("b" == 2 or "c" == 3))"#);
    }

    #[test]
    fn rejects_mixed_joins() {
        let err = where_(cn("a").eq(1))
            .and(cn("b").eq(2))
            .unwrap()
            .or(cn("c").eq(3))
            .unwrap_err();
        assert_eq!(
            err,
            Error::IllegalJoinMix {
                current: Join::And,
                attempted: Join::Or,
            }
        );

        assert!(Where::new().or("x").unwrap().and("y").is_err());
    }

    #[test]
    fn display_and_serialize_delegate_to_build() {
        let w = where_(cn("a").eq(1)).or(cn("b").eq(2)).unwrap();
        assert_eq!(w.to_string(), w.build());
        assert_eq!(
            serde_json::to_value(&w).unwrap(),
            serde_json::Value::String(w.build())
        );
    }

    #[test]
    fn to_ast_matches_parsed_text() {
        let w = where_(cn("a").eq(1))
            .and(where_(cn("b").eq("x")).or(cn("c").exists()).unwrap())
            .unwrap();
        assert_eq!(w.to_ast().unwrap(), parse_expression(&w.build()).unwrap());
    }

    #[test]
    fn to_ast_matches_parsed_text_with_raw_clauses() {
        let w = where_(cn("a").eq(1))
            .and(where_(r#""b" == 2"#).or(r#""c" == 3 or "d" exists"#).unwrap())
            .unwrap();
        assert!(w.contains_text());
        assert_eq!(w.to_ast().unwrap(), parse_expression(&w.build()).unwrap());
    }

    #[test]
    fn to_ast_rejects_text_that_breaks_the_join() {
        let w = where_(cn("a").eq(1))
            .and(r#""b" == 2 or "c" == 3"#)
            .unwrap();
        assert!(parse_expression(&w.build()).is_err());
        assert!(matches!(w.to_ast(), Err(Error::Syntax(_))));

        let wrapped = where_(cn("a").eq(1))
            .and(r#"("b" == 2 or "c" == 3)"#)
            .unwrap();
        assert_eq!(
            wrapped.to_ast().unwrap(),
            parse_expression(&wrapped.build()).unwrap()
        );
    }

    #[test]
    fn to_ast_propagates_text_errors() {
        let w = where_(cn("a").eq(1)).and(r#""b" =="#).unwrap();
        assert!(matches!(w.to_ast(), Err(Error::Syntax(_))));
    }
}
