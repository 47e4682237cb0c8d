//! # Data Sources and Queries

use std::collections::BTreeMap;
use std::sync::OnceLock;

use board_codec::{declared, map_of, nested, optional, OneOf, Schema, Schematic, Str};

use crate::aggregation::Aggregation;

/// Backends a data source may point at.
pub const DATA_SOURCE_KINDS: [&str; 4] = ["prometheus", "influxdb", "elasticsearch", "csv"];

/// A named connection to a metrics backend.
#[derive(Debug, Clone)]
pub struct DataSource {
    pub id: String,
    pub name: String,
    /// One of [`DATA_SOURCE_KINDS`].
    pub kind: String,
    pub url: Option<String>,
    /// Extra request headers, e.g. authorization.
    pub headers: BTreeMap<String, String>,
}

impl DataSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            url: None,
            headers: BTreeMap::new(),
        }
    }
}

impl Schematic for DataSource {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<DataSource>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let kinds = OneOf::declare(Str, DATA_SOURCE_KINDS.map(String::from));
            declared(
                Schema::record("DataSource")
                    .field("id", Str, |d: &DataSource| &d.id)
                    .field("name", Str, |d: &DataSource| &d.name)
                    .field("kind", kinds, |d: &DataSource| &d.kind)
                    .field("url", optional(Str), |d: &DataSource| &d.url)
                    .field("headers", map_of(Str), |d: &DataSource| &d.headers)
                    .build(|bag| {
                        Ok(DataSource {
                            id: bag.take("id")?,
                            name: bag.take("name")?,
                            kind: bag.take("kind")?,
                            url: bag.take("url")?,
                            headers: bag.take("headers")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

/// An expression evaluated against one data source.
#[derive(Debug, Clone)]
pub struct Query {
    /// The `id` of a [`DataSource`].
    pub source: String,
    pub expression: String,
    pub aggregation: Option<Aggregation>,
    /// Label matchers applied before aggregation.
    pub filters: BTreeMap<String, String>,
}

impl Query {
    pub fn new(source: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            expression: expression.into(),
            aggregation: None,
            filters: BTreeMap::new(),
        }
    }
}

impl Schematic for Query {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Query>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Query")
                    .field("source", Str, |q: &Query| &q.source)
                    .field("expression", Str, |q: &Query| &q.expression)
                    .field("aggregation", optional(nested::<Aggregation>()), |q: &Query| {
                        &q.aggregation
                    })
                    .field("filters", map_of(Str), |q: &Query| &q.filters)
                    .build(|bag| {
                        Ok(Query {
                            source: bag.take("source")?,
                            expression: bag.take("expression")?,
                            aggregation: bag.take("aggregation")?,
                            filters: bag.take("filters")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}
