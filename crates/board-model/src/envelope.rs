//! # Query Envelopes
//!
//! Request and response bodies exchanged with a query backend. The
//! transport is the caller's concern: a client sends
//! `board_codec::encode(&request)` and decodes the body it gets back as a
//! [`QueryResponse`].
//!
//! Sample arrays are opaque ([`board_codec::Any`]). Their shape differs by
//! backend and is neither validated nor typed here.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use board_codec::{array_of, declared, map_of, nested, Any, Schema, Schematic, Str};
use serde_json::Value;

use crate::query::Query;
use crate::time_range::TimeRange;

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub time_range: TimeRange,
    pub queries: Vec<Query>,
}

impl Schematic for QueryRequest {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<QueryRequest>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("QueryRequest")
                    .field("time_range", nested::<TimeRange>(), |r: &QueryRequest| &r.time_range)
                    .field("queries", array_of(nested::<Query>()), |r: &QueryRequest| &r.queries)
                    .build(|bag| {
                        Ok(QueryRequest {
                            time_range: bag.take("time_range")?,
                            queries: bag.take("queries")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

/// One labelled series of samples.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub samples: Value,
}

impl Schematic for Series {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Series>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Series")
                    .field("name", Str, |s: &Series| &s.name)
                    .field("labels", map_of(Str), |s: &Series| &s.labels)
                    .field("samples", Any, |s: &Series| &s.samples)
                    .build(|bag| {
                        Ok(Series {
                            name: bag.take("name")?,
                            labels: bag.take("labels")?,
                            samples: bag.take("samples")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub series: Vec<Series>,
}

impl QueryResponse {
    /// Look up a series by name.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

impl Schematic for QueryResponse {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<QueryResponse>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("QueryResponse")
                    .field("series", array_of(nested::<Series>()), |r: &QueryResponse| &r.series)
                    .build(|bag| Ok(QueryResponse { series: bag.take("series")? }))
                    .map(Schema::Record),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::MINUTES;
    use serde_json::json;

    #[test]
    fn request_encodes_for_the_wire() {
        let request = QueryRequest {
            time_range: TimeRange::relative(15.0, &MINUTES),
            queries: vec![Query::new("prom", "up")],
        };
        assert_eq!(
            board_codec::encode(&request),
            json!({
                "time_range": {"type": "relative", "amount": 15, "unit": "minutes"},
                "queries": [{"source": "prom", "expression": "up", "filters": {}}]
            })
        );
    }

    #[test]
    fn samples_pass_through_untyped() {
        let body = json!({
            "series": [{
                "name": "up",
                "labels": {"job": "api"},
                "samples": [[1768478400, 1], [1768478460, null], "gap"]
            }]
        });
        let response: QueryResponse = board_codec::decode(&body).unwrap();
        let up = response.series("up").unwrap();
        assert_eq!(up.samples[2], json!("gap"));
        assert_eq!(board_codec::encode(&response), body);
    }

    #[test]
    fn sample_equality_is_structural() {
        let a: Series = board_codec::decode(&json!({
            "name": "up", "labels": {}, "samples": {"t": [1, 2], "v": [0.5, 1]}
        }))
        .unwrap();
        let b: Series = board_codec::decode(&json!({
            "name": "up", "labels": {}, "samples": {"v": [0.5, 1.0], "t": [1, 2]}
        }))
        .unwrap();
        assert!(board_codec::equals(Some(&a), Some(&b)));
    }
}
