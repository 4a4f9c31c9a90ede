//! AST types for the filter language.

use serde::{Serialize, Serializer};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Root expression: a lone condition or a join group.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Condition(Condition),
    Group(Group),
}

/// Property condition leaf: `"passenger_count" > 81`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub property: String,
    pub operator: OperatorTag,
    /// Absent exactly for `exists` and `missing`.
    pub value: Option<Literal>,
}

/// A join node. All direct children share `join`; a differently joined
/// sub-expression is a nested `Group` child.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub join: Join,
    pub children: Vec<Expr>,
}

/// Logical combinator of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Join {
    And,
    Or,
}

impl Join {
    pub fn keyword(self) -> &'static str {
        match self {
            Join::And => "and",
            Join::Or => "or",
        }
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Condition operator. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorTag {
    Is,          // is
    Eq,          // ==
    Ne,          // !=
    Lt,          // <
    Lte,         // <=
    Gt,          // >
    Gte,         // >=
    Exists,      // exists
    Missing,     // missing
    Contains,    // contain
    NotContains, // notcontain
}

impl OperatorTag {
    /// Canonical spelling in the textual grammar.
    pub fn symbol(self) -> &'static str {
        match self {
            OperatorTag::Is => "is",
            OperatorTag::Eq => "==",
            OperatorTag::Ne => "!=",
            OperatorTag::Lt => "<",
            OperatorTag::Lte => "<=",
            OperatorTag::Gt => ">",
            OperatorTag::Gte => ">=",
            OperatorTag::Exists => "exists",
            OperatorTag::Missing => "missing",
            OperatorTag::Contains => "contain",
            OperatorTag::NotContains => "notcontain",
        }
    }

    /// Whether a literal must follow the operator.
    pub fn takes_value(self) -> bool {
        !matches!(self, OperatorTag::Exists | OperatorTag::Missing)
    }

    /// For negating operators, the positive operator they wrap.
    pub fn negates(self) -> Option<OperatorTag> {
        match self {
            OperatorTag::Ne => Some(OperatorTag::Eq),
            OperatorTag::NotContains => Some(OperatorTag::Contains),
            OperatorTag::Missing => Some(OperatorTag::Exists),
            _ => None,
        }
    }
}

impl fmt::Display for OperatorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A condition operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// RFC 3339 timestamp or `YYYY-MM-DD` calendar date, kept as written.
    Date(String),
    /// NaN or an infinity. No query primitive accepts it.
    NonFinite(f64),
}

/// Runtime type of an operand, used to pick a query primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Bool,
    Number,
    String,
    Date,
    NonFinite,
    Absent,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Bool => write!(f, "boolean"),
            LiteralKind::Number => write!(f, "number"),
            LiteralKind::String => write!(f, "string"),
            LiteralKind::Date => write!(f, "date"),
            LiteralKind::NonFinite => write!(f, "non-finite number"),
            LiteralKind::Absent => write!(f, "no value"),
        }
    }
}

impl Literal {
    /// Classify decoded string content as a date or a plain string.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if is_date_like(&text) {
            Literal::Date(text)
        } else {
            Literal::String(text)
        }
    }

    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Bool(_) => LiteralKind::Bool,
            Literal::Number(_) => LiteralKind::Number,
            Literal::String(_) => LiteralKind::String,
            Literal::Date(_) => LiteralKind::Date,
            Literal::NonFinite(_) => LiteralKind::NonFinite,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Bool(b) => serde_json::Value::Bool(*b),
            Literal::Number(n) => serde_json::Value::Number(n.clone()),
            Literal::String(s) | Literal::Date(s) => serde_json::Value::String(s.clone()),
            Literal::NonFinite(_) => serde_json::Value::Null,
        }
    }
}

fn is_date_like(text: &str) -> bool {
    OffsetDateTime::parse(text, &Rfc3339).is_ok()
        || Date::parse(text, format_description!("[year]-[month]-[day]")).is_ok()
}

/// JSON literal encoding, as used by the grammar. Non-finite numbers
/// print as `NaN`/`inf`, which the grammar rejects.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::NonFinite(value) => write!(f, "{}", value),
            _ => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Number(n) => n.serialize(serializer),
            Literal::String(s) | Literal::Date(s) => serializer.serialize_str(s),
            Literal::NonFinite(value) => serializer.serialize_f64(*value),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

macro_rules! literal_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Literal {
            fn from(value: $t) -> Self {
                Literal::Number(serde_json::Number::from(value))
            }
        })*
    };
}

literal_from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Literal::NonFinite(value), Literal::Number)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::from_text(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::from_text(value)
    }
}

impl From<Date> for Literal {
    fn from(value: Date) -> Self {
        Literal::Date(value.to_string())
    }
}

impl From<OffsetDateTime> for Literal {
    fn from(value: OffsetDateTime) -> Self {
        // Rfc3339 only rejects years outside 0..=9999
        match value.format(&Rfc3339) {
            Ok(text) => Literal::Date(text),
            Err(_) => Literal::String(value.to_string()),
        }
    }
}

/// JSON-encode a property name between double quotes.
pub(crate) fn quote_property(property: &str) -> String {
    serde_json::Value::String(property.to_string()).to_string()
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", quote_property(&self.property), self.operator)?;
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.join)?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Condition(c) => c.fmt(f),
            Expr::Group(g) => g.fmt(f),
        }
    }
}

impl From<Condition> for Expr {
    fn from(value: Condition) -> Self {
        Expr::Condition(value)
    }
}

impl From<Group> for Expr {
    fn from(value: Group) -> Self {
        Expr::Group(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_classification() {
        assert_eq!(Literal::from("2024-02-29").kind(), LiteralKind::Date);
        assert_eq!(
            Literal::from("2024-02-29T10:00:00Z").kind(),
            LiteralKind::Date
        );
        assert_eq!(Literal::from("2023-02-29").kind(), LiteralKind::String);
        assert_eq!(Literal::from("awesome").kind(), LiteralKind::String);
    }

    #[test]
    fn test_literal_json_encoding() {
        assert_eq!(Literal::from(0).to_string(), "0");
        assert_eq!(Literal::from(1.5).to_string(), "1.5");
        assert_eq!(Literal::from("a \"b\"").to_string(), r#""a \"b\"""#);
        assert_eq!(Literal::from(true).to_string(), "true");
    }

    #[test]
    fn test_non_finite_floats_stay_numeric() {
        assert_eq!(Literal::from(f64::NAN).kind(), LiteralKind::NonFinite);
        assert_eq!(Literal::from(f64::INFINITY).to_string(), "inf");
        assert_eq!(Literal::from(f64::NEG_INFINITY).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_condition_display() {
        let cond = Condition {
            property: "my_prop".into(),
            operator: OperatorTag::Eq,
            value: Some(Literal::from(10)),
        };
        assert_eq!(cond.to_string(), r#""my_prop" == 10"#);

        let exists = Condition {
            property: "my_prop".into(),
            operator: OperatorTag::Exists,
            value: None,
        };
        assert_eq!(exists.to_string(), r#""my_prop" exists"#);
    }

    #[test]
    fn test_negating_operators() {
        assert_eq!(OperatorTag::Ne.negates(), Some(OperatorTag::Eq));
        assert_eq!(
            OperatorTag::NotContains.negates(),
            Some(OperatorTag::Contains)
        );
        assert_eq!(OperatorTag::Missing.negates(), Some(OperatorTag::Exists));
        assert_eq!(OperatorTag::Gt.negates(), None);
    }
}
