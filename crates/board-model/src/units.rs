//! # Time Units and Sampling
//!
//! [`TimeUnit`] is a closed set of singletons. Documents name a unit by its
//! tag (`"weeks"`); decoding always yields a reference to the exported
//! static, so two decoded units are the same unit exactly when they are the
//! same pointer.
//!
//! | Tag | Seconds |
//! |-----|---------|
//! | `seconds` | 1 |
//! | `minutes` | 60 |
//! | `hours` | 3 600 |
//! | `days` | 86 400 |
//! | `weeks` | 604 800 |
//! | `months` | 2 592 000 (30 days) |

use std::fmt;
use std::sync::OnceLock;

use board_codec::{declared, nested, Const, Nested, Number, Schema, Schematic, Tagged};

/// A calendar unit of time. Only the statics below exist.
#[derive(Debug)]
pub struct TimeUnit {
    tag: &'static str,
    seconds: u64,
}

pub static SECONDS: TimeUnit = TimeUnit { tag: "seconds", seconds: 1 };
pub static MINUTES: TimeUnit = TimeUnit { tag: "minutes", seconds: 60 };
pub static HOURS: TimeUnit = TimeUnit { tag: "hours", seconds: 3_600 };
pub static DAYS: TimeUnit = TimeUnit { tag: "days", seconds: 86_400 };
pub static WEEKS: TimeUnit = TimeUnit { tag: "weeks", seconds: 604_800 };
pub static MONTHS: TimeUnit = TimeUnit { tag: "months", seconds: 2_592_000 };

/// Every unit, smallest first.
pub static TIME_UNITS: [&TimeUnit; 6] = [&SECONDS, &MINUTES, &HOURS, &DAYS, &WEEKS, &MONTHS];

impl TimeUnit {
    /// The enumerated field type decoding a tag to one of [`TIME_UNITS`].
    pub fn field() -> Const<TimeUnit> {
        Const::declare("time unit", &TIME_UNITS)
    }

    /// Look up a unit by tag.
    pub fn from_tag(tag: &str) -> Option<&'static TimeUnit> {
        TIME_UNITS.iter().copied().find(|unit| unit.tag == tag)
    }

    pub fn as_str(&self) -> &'static str {
        self.tag
    }

    /// Length of one unit in seconds.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }
}

impl Tagged for TimeUnit {
    fn tag(&self) -> &'static str {
        self.tag
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)
    }
}

// ─── Sampling ────────────────────────────────────────────────────────

/// A bucket width: `size` multiples of `unit`.
#[derive(Debug, Clone)]
pub struct Sampling {
    pub size: f64,
    pub unit: &'static TimeUnit,
}

impl Sampling {
    pub fn new(size: f64, unit: &'static TimeUnit) -> Self {
        Self { size, unit }
    }

    /// Bucket width in seconds.
    pub fn width_seconds(&self) -> f64 {
        self.size * self.unit.seconds as f64
    }

    /// Field type for a nested `sampling` object.
    pub fn field() -> Nested<Sampling> {
        nested()
    }
}

impl Schematic for Sampling {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Sampling>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Sampling")
                    .field("size", Number, |s: &Sampling| &s.size)
                    .field("unit", TimeUnit::field(), |s: &Sampling| &s.unit)
                    .build(|bag| {
                        Ok(Sampling {
                            size: bag.take("size")?,
                            unit: bag.take("unit")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_codec::{DecodeReason, FieldType, Path};
    use serde_json::json;

    #[test]
    fn all_units_are_unique() {
        let mut tags: Vec<_> = TIME_UNITS.iter().map(|u| u.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), TIME_UNITS.len());
    }

    #[test]
    fn units_are_ordered_by_length() {
        assert!(TIME_UNITS.windows(2).all(|w| w[0].seconds() < w[1].seconds()));
    }

    #[test]
    fn decode_yields_the_exported_singleton() {
        let unit = TimeUnit::field().decode(&json!("weeks"), &Path::root()).unwrap();
        assert!(std::ptr::eq(unit, &WEEKS));
        assert_eq!(unit.to_string(), "weeks");
    }

    #[test]
    fn unknown_unit_lists_every_tag() {
        let err = TimeUnit::field().decode(&json!("fortnights"), &Path::root()).unwrap_err();
        match err.reason {
            DecodeReason::UnknownConst { tag, valid } => {
                assert_eq!(tag, "fortnights");
                assert_eq!(valid.len(), 6);
            }
            other => panic!("unexpected reason: {other:?}"),
        }
    }

    #[test]
    fn from_tag_matches_field_decode() {
        assert!(std::ptr::eq(TimeUnit::from_tag("hours").unwrap(), &HOURS));
        assert!(TimeUnit::from_tag("HOURS").is_none());
    }

    #[test]
    fn sampling_width() {
        let sampling = Sampling::new(5.0, &MINUTES);
        assert_eq!(sampling.width_seconds(), 300.0);
    }

    #[test]
    fn sampling_decodes_and_encodes() {
        let raw = json!({"size": 42, "unit": "seconds"});
        let sampling: Sampling = board_codec::decode(&raw).unwrap();
        assert_eq!(sampling.size, 42.0);
        assert!(std::ptr::eq(sampling.unit, &SECONDS));
        assert_eq!(board_codec::encode(&sampling), raw);
    }
}
