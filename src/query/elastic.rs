//! Elasticsearch query DSL backend.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::dispatch::{QueryBuilderDef, RangeBound};
use crate::dsl::Literal;

/// A node of an Elasticsearch query tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EsQuery {
    Term(TermQuery),
    Range(RangeQuery),
    Exists(ExistsQuery),
    Match(MatchQuery),
    Bool(BoolQuery),
}

/// `{"term": {"<field>": <value>}}`
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub field: String,
    pub value: Literal,
}

/// `{"range": {"<field>": {"<bound>": <value>}}}`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub bound: RangeBound,
    pub value: Literal,
}

/// `{"exists": {"field": "<field>"}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsQuery {
    pub field: String,
}

/// `{"match": {"<field>": <value>}}`
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub field: String,
    pub value: Literal,
}

/// `{"bool": {"must": [..], "should": [..], "must_not": [..]}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<EsQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<EsQuery>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<EsQuery>,
}

fn serialize_field_entry<S, V>(serializer: S, field: &str, value: &V) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(field, value)?;
    map.end()
}

impl Serialize for TermQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_field_entry(serializer, &self.field, &self.value)
    }
}

impl Serialize for MatchQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_field_entry(serializer, &self.field, &self.value)
    }
}

struct RangeBody<'a> {
    bound: RangeBound,
    value: &'a Literal,
}

impl Serialize for RangeBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_field_entry(serializer, self.bound.key(), self.value)
    }
}

impl Serialize for RangeQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = RangeBody {
            bound: self.bound,
            value: &self.value,
        };
        serialize_field_entry(serializer, &self.field, &body)
    }
}

impl EsQuery {
    pub fn term(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        EsQuery::Term(TermQuery {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn range(field: impl Into<String>, bound: RangeBound, value: impl Into<Literal>) -> Self {
        EsQuery::Range(RangeQuery {
            field: field.into(),
            bound,
            value: value.into(),
        })
    }

    pub fn exists(field: impl Into<String>) -> Self {
        EsQuery::Exists(ExistsQuery {
            field: field.into(),
        })
    }

    pub fn matches(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        EsQuery::Match(MatchQuery {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn must(children: Vec<EsQuery>) -> Self {
        EsQuery::Bool(BoolQuery {
            must: children,
            ..BoolQuery::default()
        })
    }

    pub fn should(children: Vec<EsQuery>) -> Self {
        EsQuery::Bool(BoolQuery {
            should: children,
            ..BoolQuery::default()
        })
    }

    pub fn must_not(child: EsQuery) -> Self {
        EsQuery::Bool(BoolQuery {
            must_not: vec![child],
            ..BoolQuery::default()
        })
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, EsQuery::Bool(_))
    }

    /// Render as Elasticsearch query DSL JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Builds `EsQuery` trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElasticBuilder;

impl QueryBuilderDef for ElasticBuilder {
    type Query = EsQuery;

    fn term(&self, field: &str, value: &Literal) -> EsQuery {
        tracing::debug!(field, value = %value, "term query");
        EsQuery::term(field, value.clone())
    }

    fn range(&self, field: &str, bound: RangeBound, value: &Literal) -> EsQuery {
        tracing::debug!(field, %bound, value = %value, "range query");
        EsQuery::range(field, bound, value.clone())
    }

    fn exists(&self, field: &str) -> EsQuery {
        tracing::debug!(field, "exists query");
        EsQuery::exists(field)
    }

    fn contains(&self, field: &str, value: &Literal) -> EsQuery {
        tracing::debug!(field, value = %value, "match query");
        EsQuery::matches(field, value.clone())
    }

    fn must(&self, children: Vec<EsQuery>) -> EsQuery {
        EsQuery::must(children)
    }

    fn should(&self, children: Vec<EsQuery>) -> EsQuery {
        EsQuery::should(children)
    }

    fn must_not(&self, child: EsQuery) -> EsQuery {
        EsQuery::must_not(child)
    }
}
