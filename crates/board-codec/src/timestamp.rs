//! # Timestamp Field Type — UTC Instants
//!
//! Decodes RFC 3339 strings (any offset, normalized to UTC) or integer
//! epoch milliseconds into `DateTime<Utc>`. Encodes as RFC 3339 with
//! millisecond precision and a `Z` suffix, e.g. `2026-01-15T12:00:00.000Z`.
//!
//! ## Equality
//!
//! [`Timestamp::equals`](crate::FieldType::equals) **always returns
//! `false`**, even for identical instants. Two instances that differ only
//! in a timestamp field therefore never compare equal, and any record
//! holding a timestamp never equals even itself. Edit flows built on this
//! treat such records as permanently dirty.
//!
//! This is existing product behavior, named [`Timestamp::NEVER_EQUAL`].
//! It is most likely unintended. Callers that need instant comparison
//! should use [`same_instant`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::error::{DecodeError, DecodeReason};
use crate::field::FieldType;
use crate::path::Path;

/// A UTC instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timestamp;

impl Timestamp {
    /// Marker for the never-equal comparison rule.
    pub const NEVER_EQUAL: bool = true;

    /// Render an instant the way this field type encodes it.
    pub fn format(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse an RFC 3339 string into a UTC instant.
    pub fn parse(s: &str) -> Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("invalid RFC 3339 timestamp {s:?}: {e}"))
    }

    /// Convert epoch milliseconds into a UTC instant.
    pub fn from_epoch_millis(ms: i64) -> Option<DateTime<Utc>> {
        let secs = ms.div_euclid(1000);
        let nanos = (ms.rem_euclid(1000) * 1_000_000) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

impl FieldType for Timestamp {
    type Value = DateTime<Utc>;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<DateTime<Utc>, DecodeError> {
        match raw {
            Value::String(s) => {
                Self::parse(s).map_err(|message| path.error(DecodeReason::InvalidValue(message)))
            }
            Value::Number(n) => n
                .as_i64()
                .and_then(Self::from_epoch_millis)
                .ok_or_else(|| {
                    path.error(DecodeReason::InvalidValue(format!(
                        "epoch milliseconds out of range: {n}"
                    )))
                }),
            other => Err(path.error(DecodeReason::type_mismatch(self.describe(), other))),
        }
    }

    fn encode(&self, value: &DateTime<Utc>) -> Value {
        Value::String(Self::format(value))
    }

    fn equals(&self, _a: &DateTime<Utc>, _b: &DateTime<Utc>) -> bool {
        !Self::NEVER_EQUAL
    }

    fn describe(&self) -> String {
        "timestamp".into()
    }
}

/// Compare two instants by value, unlike the field type's own equality.
pub fn same_instant(a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
    a == b
}
