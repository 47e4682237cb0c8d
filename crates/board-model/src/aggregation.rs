//! # Aggregations
//!
//! How a query's raw samples are reduced per bucket. A discriminated union
//! on `type`:
//!
//! | Tag | Fields |
//! |-----|--------|
//! | `sum`, `avg`, `min`, `max` | `sampling` |
//! | `last` | none |
//! | `percentile` | `sampling`, `percentile` (50, 90, 95 or 99) |

use std::sync::OnceLock;

use board_codec::{declared, Discriminated, Number, OneOf, Schema, Schematic, SubTypes};

use crate::units::Sampling;

/// Percentiles a query may request.
pub const PERCENTILES: [f64; 4] = [50.0, 90.0, 95.0, 99.0];

/// Declare a record aggregation holding only a `sampling`.
macro_rules! sampled_aggregation {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            pub sampling: Sampling,
        }

        impl $name {
            pub fn new(sampling: Sampling) -> Self {
                Self { sampling }
            }
        }

        impl Schematic for $name {
            fn schema() -> &'static Schema<Self> {
                static SCHEMA: OnceLock<Schema<$name>> = OnceLock::new();
                SCHEMA.get_or_init(|| {
                    declared(
                        Schema::record(stringify!($name))
                            .field("sampling", Sampling::field(), |a: &$name| &a.sampling)
                            .build(|bag| Ok($name { sampling: bag.take("sampling")? }))
                            .map(Schema::Record),
                    )
                })
            }
        }

        impl Discriminated for $name {
            const TAG: &'static str = $tag;
        }
    };
}

sampled_aggregation!(
    /// Sum of samples per bucket.
    SumAggregation,
    "sum"
);
sampled_aggregation!(
    /// Arithmetic mean per bucket.
    AvgAggregation,
    "avg"
);
sampled_aggregation!(MinAggregation, "min");
sampled_aggregation!(MaxAggregation, "max");

/// The most recent sample, unbucketed.
#[derive(Debug, Clone)]
pub struct LastAggregation;

impl Schematic for LastAggregation {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<LastAggregation>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("LastAggregation")
                    .build(|_| Ok(LastAggregation))
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for LastAggregation {
    const TAG: &'static str = "last";
}

#[derive(Debug, Clone)]
pub struct PercentileAggregation {
    pub sampling: Sampling,
    pub percentile: f64,
}

impl Schematic for PercentileAggregation {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<PercentileAggregation>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("PercentileAggregation")
                    .field("sampling", Sampling::field(), |a: &PercentileAggregation| &a.sampling)
                    .field(
                        "percentile",
                        OneOf::declare(Number, PERCENTILES),
                        |a: &PercentileAggregation| &a.percentile,
                    )
                    .build(|bag| {
                        Ok(PercentileAggregation {
                            sampling: bag.take("sampling")?,
                            percentile: bag.take("percentile")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for PercentileAggregation {
    const TAG: &'static str = "percentile";
}

// ─── Union ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Aggregation {
    Sum(SumAggregation),
    Avg(AvgAggregation),
    Min(MinAggregation),
    Max(MaxAggregation),
    Last(LastAggregation),
    Percentile(PercentileAggregation),
}

impl Aggregation {
    /// The discriminant written to documents.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Sum(_) => SumAggregation::TAG,
            Self::Avg(_) => AvgAggregation::TAG,
            Self::Min(_) => MinAggregation::TAG,
            Self::Max(_) => MaxAggregation::TAG,
            Self::Last(_) => LastAggregation::TAG,
            Self::Percentile(_) => PercentileAggregation::TAG,
        }
    }

    /// The bucket width, if this aggregation buckets at all.
    pub fn sampling(&self) -> Option<&Sampling> {
        match self {
            Self::Sum(a) => Some(&a.sampling),
            Self::Avg(a) => Some(&a.sampling),
            Self::Min(a) => Some(&a.sampling),
            Self::Max(a) => Some(&a.sampling),
            Self::Last(_) => None,
            Self::Percentile(a) => Some(&a.sampling),
        }
    }
}

impl Schematic for Aggregation {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Aggregation>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                SubTypes::builder("Aggregation", Aggregation::tag)
                    .variant(Aggregation::Sum, |a| match a {
                        Aggregation::Sum(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Aggregation::Avg, |a| match a {
                        Aggregation::Avg(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Aggregation::Min, |a| match a {
                        Aggregation::Min(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Aggregation::Max, |a| match a {
                        Aggregation::Max(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Aggregation::Last, |a| match a {
                        Aggregation::Last(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Aggregation::Percentile, |a| match a {
                        Aggregation::Percentile(inner) => Some(inner),
                        _ => None,
                    })
                    .build()
                    .map(Schema::Union),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{HOURS, SECONDS};
    use board_codec::{CodecError, DecodeReason, Overrides};
    use serde_json::json;

    #[test]
    fn sum_decodes_with_sampling() {
        let agg: Aggregation =
            board_codec::decode(&json!({"type": "sum", "sampling": {"size": 42, "unit": "seconds"}}))
                .unwrap();
        assert_eq!(agg.tag(), "sum");
        let sampling = agg.sampling().unwrap();
        assert_eq!(sampling.size, 42.0);
        assert!(std::ptr::eq(sampling.unit, &SECONDS));
    }

    #[test]
    fn last_has_no_fields() {
        let agg: Aggregation = board_codec::decode(&json!({"type": "last"})).unwrap();
        assert!(agg.sampling().is_none());
        assert_eq!(board_codec::encode(&agg), json!({"type": "last"}));
    }

    #[test]
    fn percentile_is_restricted() {
        let err = board_codec::decode::<Aggregation>(&json!({
            "type": "percentile",
            "sampling": {"size": 1, "unit": "minutes"},
            "percentile": 75
        }))
        .unwrap_err();
        assert_eq!(err.path.to_string(), "$.percentile");
        assert!(matches!(err.reason, DecodeReason::NotAllowed { .. }));
    }

    #[test]
    fn registry_lists_every_tag() {
        assert_eq!(
            Aggregation::schema().tags(),
            vec!["sum", "avg", "min", "max", "last", "percentile"]
        );
    }

    #[test]
    fn variants_with_equal_fields_still_differ() {
        let sampling = Sampling::new(1.0, &HOURS);
        let sum = Aggregation::Sum(SumAggregation::new(sampling.clone()));
        let avg = Aggregation::Avg(AvgAggregation::new(sampling));
        assert!(!board_codec::equals(Some(&sum), Some(&avg)));
        assert_eq!(board_codec::diff(&sum, &avg), vec!["type"]);
    }

    #[test]
    fn mutate_replaces_sampling() {
        let sum = Aggregation::Sum(SumAggregation::new(Sampling::new(1.0, &HOURS)));
        let finer = sum
            .mutate(Overrides::new().set("sampling", Sampling::new(10.0, &SECONDS)))
            .unwrap();
        assert_eq!(finer.sampling().unwrap().width_seconds(), 10.0);
        assert_eq!(sum.sampling().unwrap().width_seconds(), 3_600.0);
        let err = sum
            .mutate(Overrides::new().set("percentile", 99.0))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownField { .. }));
    }
}
