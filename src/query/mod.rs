//! Query construction: the dispatch table contract and the default
//! Elasticsearch backend.

mod dispatch;
mod elastic;

pub use dispatch::{Primitive, QueryBuilderDef, RangeBound, default_dispatch};
pub use elastic::{
    BoolQuery, ElasticBuilder, EsQuery, ExistsQuery, MatchQuery, RangeQuery, TermQuery,
};
