//! # board-model — Dashboard Domain Model
//!
//! Every entity of the dashboard application, declared purely through
//! `board-codec` schemas. Nothing here parses JSON by hand: each type
//! implements [`board_codec::Schematic`], so decode, encode, clone, mutate,
//! equality and diff come from the codec engine.
//!
//! ## Polymorphic Types
//!
//! | Union | Tags |
//! |-------|------|
//! | [`Aggregation`] | `sum`, `avg`, `min`, `max`, `last`, `percentile` |
//! | [`TimeRange`] | `relative`, `absolute` |
//! | [`Visualization`] | `line`, `bar`, `table`, `stat`, `text` |
//!
//! ## Crate Policy
//!
//! - Depends only on `board-codec` internally.
//! - Instances are plain values; edits produce new instances through
//!   `mutate`.

pub mod aggregation;
pub mod dashboard;
pub mod envelope;
pub mod query;
pub mod time_range;
pub mod units;
pub mod visualization;

// Re-export primary types for ergonomic imports.
pub use aggregation::{
    Aggregation, AvgAggregation, LastAggregation, MaxAggregation, MinAggregation,
    PercentileAggregation, SumAggregation, PERCENTILES,
};
pub use dashboard::{Dashboard, Layout, Panel, REFRESH_INTERVALS};
pub use envelope::{QueryRequest, QueryResponse, Series};
pub use query::{DataSource, Query, DATA_SOURCE_KINDS};
pub use time_range::{AbsoluteTimeRange, RelativeTimeRange, TimeRange};
pub use units::{Sampling, TimeUnit, DAYS, HOURS, MINUTES, MONTHS, SECONDS, TIME_UNITS, WEEKS};
pub use visualization::{BarChart, LineChart, Stat, Table, Text, Visualization};
