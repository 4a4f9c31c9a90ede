//! Compilation of filter expressions into query trees.
//!
//! Conditions go through the backend's dispatch table; `and` groups become
//! `must`, `or` groups `should`, and negating operators wrap their positive
//! counterpart in `must_not`.

mod fields;
mod source;

#[cfg(test)]
mod property_tests;

pub use fields::FieldSet;
pub use source::{Displayed, ExpressionSource, resolve_expression};

use crate::dsl::{
    Condition, Expr, Group, Join, LiteralKind, MAX_NESTING, OperatorTag, parse_expression,
};
use crate::error::{Error, Result};
use crate::query::{ElasticBuilder, EsQuery, Primitive, QueryBuilderDef};

/// Subfield holding the exact-match form of an analyzed string field.
pub const DEFAULT_EXACT_SUFFIX: &str = "keyword";

/// Compiles expressions with a query backend.
///
/// Holds no per-call state: the field set is borrowed for one call only and
/// every call returns a fresh tree.
#[derive(Debug, Clone)]
pub struct Compiler<B = ElasticBuilder> {
    builder: B,
    exact_suffix: String,
}

impl Default for Compiler<ElasticBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler<ElasticBuilder> {
    pub fn new() -> Self {
        Self::with_builder(ElasticBuilder)
    }
}

impl<B: QueryBuilderDef> Compiler<B> {
    pub fn with_builder(builder: B) -> Self {
        Compiler {
            builder,
            exact_suffix: DEFAULT_EXACT_SUFFIX.to_string(),
        }
    }

    pub fn with_exact_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exact_suffix = suffix.into();
        self
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn exact_suffix(&self) -> &str {
        &self.exact_suffix
    }

    /// Resolve, parse and compile any expression source.
    pub fn compile<S: ExpressionSource + ?Sized>(
        &self,
        input: &S,
        not_analyzed: &FieldSet,
    ) -> Result<B::Query> {
        let text = resolve_expression(input)?;
        self.compile_text(&text, not_analyzed)
    }

    pub fn compile_text(&self, text: &str, not_analyzed: &FieldSet) -> Result<B::Query> {
        if text.trim().is_empty() {
            return Err(Error::EmptyExpression);
        }
        let expr = parse_expression(text)?;
        self.compile_expr(&expr, not_analyzed)
    }

    /// Compile an AST. The result is always a boolean query: a lone
    /// condition is wrapped in `must` unless it is already a negation.
    pub fn compile_expr(&self, expr: &Expr, not_analyzed: &FieldSet) -> Result<B::Query> {
        match expr {
            Expr::Condition(cond) => {
                let query = self.compile_condition(cond, not_analyzed)?;
                if cond.operator.negates().is_some() {
                    Ok(query)
                } else {
                    Ok(self.builder.must(vec![query]))
                }
            }
            Expr::Group(group) => self.compile_group(group, not_analyzed, 0),
        }
    }

    fn compile_node(
        &self,
        expr: &Expr,
        not_analyzed: &FieldSet,
        depth: usize,
    ) -> Result<B::Query> {
        match expr {
            Expr::Condition(cond) => self.compile_condition(cond, not_analyzed),
            Expr::Group(group) => self.compile_group(group, not_analyzed, depth),
        }
    }

    /// `depth` counts enclosing groups; hand-built trees share the parser's
    /// nesting limit.
    fn compile_group(
        &self,
        group: &Group,
        not_analyzed: &FieldSet,
        depth: usize,
    ) -> Result<B::Query> {
        if depth > MAX_NESTING {
            return Err(Error::Compilation(format!(
                "expression nested deeper than {} groups",
                MAX_NESTING
            )));
        }
        if group.children.is_empty() {
            return Err(Error::Compilation(format!(
                "cannot compile an empty `{}` group",
                group.join
            )));
        }

        let children = group
            .children
            .iter()
            .map(|child| self.compile_node(child, not_analyzed, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(match group.join {
            Join::And => self.builder.must(children),
            Join::Or => self.builder.should(children),
        })
    }

    fn compile_condition(&self, cond: &Condition, not_analyzed: &FieldSet) -> Result<B::Query> {
        if cond.property.is_empty() {
            return Err(Error::Compilation(
                "condition has an empty property name".into(),
            ));
        }

        let (operator, negated) = match cond.operator.negates() {
            Some(positive) => (positive, true),
            None => (cond.operator, false),
        };
        let kind = cond
            .value
            .as_ref()
            .map_or(LiteralKind::Absent, |value| value.kind());

        let unsupported = || {
            Error::Compilation(format!(
                "unsupported condition: operator `{}` with {} on \"{}\"",
                cond.operator, kind, cond.property
            ))
        };

        let primitive = self.builder.dispatch(operator, kind).ok_or_else(unsupported)?;

        let query = match (primitive, &cond.value) {
            (Primitive::Term, Some(value)) => {
                let field = self.classify_field(&cond.property, operator, kind, not_analyzed);
                self.builder.term(&field, value)
            }
            (Primitive::Range(bound), Some(value)) => {
                self.builder.range(&cond.property, bound, value)
            }
            (Primitive::Contains, Some(value)) => self.builder.contains(&cond.property, value),
            (Primitive::Exists, None) => self.builder.exists(&cond.property),
            _ => return Err(unsupported()),
        };

        Ok(if negated {
            self.builder.must_not(query)
        } else {
            query
        })
    }

    /// String equality targets the exact-match subfield unless the field is
    /// already not analyzed.
    fn classify_field(
        &self,
        property: &str,
        operator: OperatorTag,
        kind: LiteralKind,
        not_analyzed: &FieldSet,
    ) -> String {
        if operator == OperatorTag::Eq
            && kind == LiteralKind::String
            && !not_analyzed.contains(property)
        {
            format!("{}.{}", property, self.exact_suffix)
        } else {
            property.to_string()
        }
    }
}

/// Compile any expression source to an Elasticsearch bool query.
pub fn parse<S: ExpressionSource + ?Sized>(input: &S, not_analyzed: &FieldSet) -> Result<EsQuery> {
    Compiler::new().compile(input, not_analyzed)
}

/// Compile and render as indented Elasticsearch query JSON.
pub fn pretty_print<S: ExpressionSource + ?Sized>(
    input: &S,
    not_analyzed: &FieldSet,
) -> Result<String> {
    let query = parse(input, not_analyzed)?;
    Ok(format!("{:#}", query.to_json()))
}
