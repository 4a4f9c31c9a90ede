//! The dispatch table contract between the compiler and a query backend.

use std::fmt;

use crate::dsl::{Literal, LiteralKind, OperatorTag};

/// Bound of a range comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeBound {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl RangeBound {
    pub fn key(self) -> &'static str {
        match self {
            RangeBound::Lt => "lt",
            RangeBound::Lte => "lte",
            RangeBound::Gt => "gt",
            RangeBound::Gte => "gte",
        }
    }
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The query primitive a condition compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Term,
    Range(RangeBound),
    Exists,
    Contains,
}

/// Default (operator, operand type) table.
///
/// Negating operators never reach the table: the compiler looks up their
/// positive counterpart and wraps the result in `must_not`.
pub fn default_dispatch(op: OperatorTag, kind: LiteralKind) -> Option<Primitive> {
    use LiteralKind as K;
    use OperatorTag as Op;

    match (op, kind) {
        (Op::Is, K::Bool) => Some(Primitive::Term),
        (Op::Eq, K::Bool | K::Number | K::String | K::Date) => Some(Primitive::Term),
        (Op::Lt, K::Number | K::Date) => Some(Primitive::Range(RangeBound::Lt)),
        (Op::Lte, K::Number | K::Date) => Some(Primitive::Range(RangeBound::Lte)),
        (Op::Gt, K::Number | K::Date) => Some(Primitive::Range(RangeBound::Gt)),
        (Op::Gte, K::Number | K::Date) => Some(Primitive::Range(RangeBound::Gte)),
        (Op::Exists, K::Absent) => Some(Primitive::Exists),
        (Op::Contains, K::String | K::Date) => Some(Primitive::Contains),
        (
            Op::Is | Op::Eq | Op::Lt | Op::Lte | Op::Gt | Op::Gte | Op::Exists | Op::Contains,
            _,
        ) => None,
        (Op::Ne | Op::Missing | Op::NotContains, _) => None,
    }
}

/// Constructors for the query primitives and boolean combinators of a
/// backend. The compiler only calls these and composes their results.
pub trait QueryBuilderDef {
    type Query;

    /// Pick the primitive for an operator and operand type; `None` marks the
    /// combination as unsupported.
    fn dispatch(&self, op: OperatorTag, kind: LiteralKind) -> Option<Primitive> {
        default_dispatch(op, kind)
    }

    fn term(&self, field: &str, value: &Literal) -> Self::Query;

    fn range(&self, field: &str, bound: RangeBound, value: &Literal) -> Self::Query;

    fn exists(&self, field: &str) -> Self::Query;

    fn contains(&self, field: &str, value: &Literal) -> Self::Query;

    fn must(&self, children: Vec<Self::Query>) -> Self::Query;

    fn should(&self, children: Vec<Self::Query>) -> Self::Query;

    fn must_not(&self, child: Self::Query) -> Self::Query;
}
