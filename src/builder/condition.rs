//! Property condition builder.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::dsl::{self, Literal, OperatorTag, quote_property};
use crate::error::{Error, Result};

/// Operator aliases accepted by [`Condition::with_operator`].
pub const OPERATOR_ALIASES: [&str; 7] = ["is", "eq", "ne", "lt", "lte", "gt", "gte"];

/// Builds a property condition to be used alone or inside a `Where`.
///
/// ```
/// use muto::cn;
///
/// assert_eq!(cn("psngr_cnt").gt(81).build(), r#""psngr_cnt" > 81"#);
/// ```
///
/// Instances are plain owned values; the text returned by `build` shares
/// nothing with the builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    prop: Option<String>,
    operator: Option<OperatorTag>,
    value: Option<Literal>,
}

impl Condition {
    /// An unpopulated condition awaiting `prop` and an operator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Condition on `prop` awaiting an operator.
    pub fn with_prop(prop: impl Into<String>) -> Self {
        Self::new().prop(prop)
    }

    /// Condition from an operator alias, e.g. `("my_prop", "eq", 10)`.
    ///
    /// Only the aliases in [`OPERATOR_ALIASES`] are accepted.
    pub fn with_operator(
        prop: impl Into<String>,
        alias: &str,
        value: impl Into<Literal>,
    ) -> Result<Self> {
        Self::with_prop(prop).apply(alias, value)
    }

    /// Set the operator and value through an alias.
    pub fn apply(self, alias: &str, value: impl Into<Literal>) -> Result<Self> {
        let cond = match alias {
            "is" => self.is(value),
            "eq" => self.eq(value),
            "ne" => self.ne(value),
            "lt" => self.lt(value),
            "lte" => self.lte(value),
            "gt" => self.gt(value),
            "gte" => self.gte(value),
            _ => {
                return Err(Error::InvalidOperator {
                    alias: alias.to_string(),
                });
            }
        };
        Ok(cond)
    }

    /// Set the property name.
    pub fn prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = Some(prop.into());
        self
    }

    fn set(mut self, operator: OperatorTag, value: Option<Literal>) -> Self {
        self.operator = Some(operator);
        self.value = value;
        self
    }

    /// Boolean match, usually `true` or `false`.
    pub fn is(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Is, Some(value.into()))
    }

    pub fn eq(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Eq, Some(value.into()))
    }

    pub fn ne(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Ne, Some(value.into()))
    }

    pub fn lt(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Lt, Some(value.into()))
    }

    pub fn lte(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Lte, Some(value.into()))
    }

    pub fn gt(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Gt, Some(value.into()))
    }

    pub fn gte(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Gte, Some(value.into()))
    }

    pub fn exists(self) -> Self {
        self.set(OperatorTag::Exists, None)
    }

    pub fn missing(self) -> Self {
        self.set(OperatorTag::Missing, None)
    }

    pub fn contains(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::Contains, Some(value.into()))
    }

    pub fn not_contains(self, value: impl Into<Literal>) -> Self {
        self.set(OperatorTag::NotContains, Some(value.into()))
    }

    pub fn property(&self) -> Option<&str> {
        self.prop.as_deref()
    }

    pub fn operator(&self) -> Option<OperatorTag> {
        self.operator
    }

    pub fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    /// Render the condition in the filter language.
    ///
    /// An incomplete condition renders text the parser rejects.
    pub fn build(&self) -> String {
        let prop = quote_property(self.prop.as_deref().unwrap_or_default());
        match (self.operator, &self.value) {
            (None, _) => prop,
            (Some(op), _) if !op.takes_value() => format!("{} {}", prop, op),
            (Some(op), Some(value)) => format!("{} {} {}", prop, op, value),
            (Some(op), None) => format!("{} {}", prop, op),
        }
    }

    /// Convert straight to an AST condition, without going through text.
    pub fn to_ast(&self) -> Result<dsl::Condition> {
        let property = match self.prop.as_deref() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(Error::IncompleteCondition("no property set".into())),
        };
        let operator = self.operator.ok_or_else(|| {
            Error::IncompleteCondition(format!("no operator set for \"{}\"", property))
        })?;
        let value = if operator.takes_value() {
            Some(self.value.clone().ok_or_else(|| {
                Error::IncompleteCondition(format!(
                    "operator `{}` on \"{}\" has no value",
                    operator, property
                ))
            })?)
        } else {
            None
        };

        Ok(dsl::Condition {
            property,
            operator,
            value,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.build())
    }
}

/// Shorthand for [`Condition::with_prop`].
pub fn cn(prop: impl Into<String>) -> Condition {
    Condition::with_prop(prop)
}

/// Alias of [`cn`].
pub fn condition(prop: impl Into<String>) -> Condition {
    Condition::with_prop(prop)
}
