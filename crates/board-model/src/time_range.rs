//! # Time Ranges
//!
//! The window a dashboard or query covers: either `relative` to now
//! (`{"type": "relative", "amount": 6, "unit": "hours"}`) or `absolute`
//! between two instants.
//!
//! Absolute ranges hold [`Timestamp`] fields, whose equality is never true.
//! An absolute range therefore never equals another range, itself included,
//! and a dashboard holding one always reports its time range as changed.

use std::sync::OnceLock;

use board_codec::{declared, Discriminated, Number, Schema, Schematic, SubTypes, Timestamp};
use chrono::{DateTime, Duration, Utc};

use crate::units::{TimeUnit, HOURS};

/// The last `amount` multiples of `unit`.
#[derive(Debug, Clone)]
pub struct RelativeTimeRange {
    pub amount: f64,
    pub unit: &'static TimeUnit,
}

impl Schematic for RelativeTimeRange {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<RelativeTimeRange>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("RelativeTimeRange")
                    .field("amount", Number, |r: &RelativeTimeRange| &r.amount)
                    .field("unit", TimeUnit::field(), |r: &RelativeTimeRange| &r.unit)
                    .build(|bag| {
                        Ok(RelativeTimeRange {
                            amount: bag.take("amount")?,
                            unit: bag.take("unit")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for RelativeTimeRange {
    const TAG: &'static str = "relative";
}

/// A fixed window between two UTC instants.
#[derive(Debug, Clone)]
pub struct AbsoluteTimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Schematic for AbsoluteTimeRange {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<AbsoluteTimeRange>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("AbsoluteTimeRange")
                    .field("from", Timestamp, |r: &AbsoluteTimeRange| &r.from)
                    .field("to", Timestamp, |r: &AbsoluteTimeRange| &r.to)
                    .build(|bag| {
                        Ok(AbsoluteTimeRange {
                            from: bag.take("from")?,
                            to: bag.take("to")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for AbsoluteTimeRange {
    const TAG: &'static str = "absolute";
}

// ─── Union ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum TimeRange {
    Relative(RelativeTimeRange),
    Absolute(AbsoluteTimeRange),
}

impl TimeRange {
    pub fn relative(amount: f64, unit: &'static TimeUnit) -> Self {
        Self::Relative(RelativeTimeRange { amount, unit })
    }

    pub fn absolute(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self::Absolute(AbsoluteTimeRange { from, to })
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Relative(_) => RelativeTimeRange::TAG,
            Self::Absolute(_) => AbsoluteTimeRange::TAG,
        }
    }

    /// Resolve to concrete `(from, to)` instants relative to `now`.
    ///
    /// Fractional amounts are truncated to whole milliseconds. A window
    /// reaching past the representable range starts at `MIN_UTC`, or at
    /// `MAX_UTC` for a negative amount. A NaN amount resolves to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        match self {
            Self::Relative(r) => {
                let millis = r.amount * r.unit.seconds() as f64 * 1_000.0;
                // `as` saturates; NaN becomes zero.
                let from = Duration::try_milliseconds(millis as i64)
                    .and_then(|offset| now.checked_sub_signed(offset))
                    .unwrap_or(if millis > 0.0 {
                        DateTime::<Utc>::MIN_UTC
                    } else {
                        DateTime::<Utc>::MAX_UTC
                    });
                (from, now)
            }
            Self::Absolute(a) => (a.from, a.to),
        }
    }
}

impl Default for TimeRange {
    /// The last hour.
    fn default() -> Self {
        Self::relative(1.0, &HOURS)
    }
}

impl Schematic for TimeRange {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<TimeRange>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                SubTypes::builder("TimeRange", TimeRange::tag)
                    .variant(TimeRange::Relative, |r| match r {
                        TimeRange::Relative(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(TimeRange::Absolute, |r| match r {
                        TimeRange::Absolute(inner) => Some(inner),
                        _ => None,
                    })
                    .build()
                    .map(Schema::Union),
            )
        })
    }
}
