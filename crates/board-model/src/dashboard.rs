//! # Dashboards
//!
//! The top-level document: a titled grid of [`Panel`]s sharing one time
//! range, refresh interval, variable set and data-source list.
//!
//! Instances are never edited in place. Edits go through
//! [`Schematic::mutate`] or the `with_*` helpers below, each of which
//! returns a new dashboard and leaves the original untouched, so an edit
//! layer can compare the two with [`board_codec::equals`] to track dirty
//! state.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use board_codec::{
    array_of, declared, map_of, nested, optional, CodecError, Number, OneOf, Overrides, Schema,
    Schematic, Str,
};
use uuid::Uuid;

use crate::query::{DataSource, Query};
use crate::time_range::TimeRange;
use crate::visualization::Visualization;

/// Refresh intervals a dashboard may auto-reload on, in seconds.
pub const REFRESH_INTERVALS: [f64; 5] = [5.0, 10.0, 30.0, 60.0, 300.0];

/// Grid placement in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether two placements share any area.
    pub fn overlaps(&self, other: &Layout) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

impl Schematic for Layout {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Layout>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Layout")
                    .field("x", Number, |l: &Layout| &l.x)
                    .field("y", Number, |l: &Layout| &l.y)
                    .field("width", Number, |l: &Layout| &l.width)
                    .field("height", Number, |l: &Layout| &l.height)
                    .build(|bag| {
                        Ok(Layout {
                            x: bag.take("x")?,
                            y: bag.take("y")?,
                            width: bag.take("width")?,
                            height: bag.take("height")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

// ─── Panel ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Panel {
    pub id: String,
    pub title: String,
    pub layout: Layout,
    pub visualization: Visualization,
}

impl Panel {
    /// A new panel with a fresh random id.
    pub fn new(title: impl Into<String>, layout: Layout, visualization: Visualization) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            layout,
            visualization,
        }
    }
}

impl Schematic for Panel {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Panel>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Panel")
                    .field("id", Str, |p: &Panel| &p.id)
                    .field("title", Str, |p: &Panel| &p.title)
                    .field("layout", nested::<Layout>(), |p: &Panel| &p.layout)
                    .field("visualization", nested::<Visualization>(), |p: &Panel| {
                        &p.visualization
                    })
                    .build(|bag| {
                        Ok(Panel {
                            id: bag.take("id")?,
                            title: bag.take("title")?,
                            layout: bag.take("layout")?,
                            visualization: bag.take("visualization")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

// ─── Dashboard ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub time_range: TimeRange,
    /// Auto-refresh period in seconds, one of [`REFRESH_INTERVALS`].
    pub refresh: Option<f64>,
    pub panels: Vec<Panel>,
    /// Template variables substituted into query expressions.
    pub variables: BTreeMap<String, String>,
    pub tags: Vec<String>,
    pub data_sources: Vec<DataSource>,
}

impl Dashboard {
    /// An empty dashboard over the last hour, with a fresh random id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            time_range: TimeRange::default(),
            refresh: None,
            panels: Vec::new(),
            variables: BTreeMap::new(),
            tags: Vec::new(),
            data_sources: Vec::new(),
        }
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn data_source(&self, id: &str) -> Option<&DataSource> {
        self.data_sources.iter().find(|d| d.id == id)
    }

    /// Every query issued by every panel, in panel order.
    pub fn queries(&self) -> impl Iterator<Item = &Query> + '_ {
        self.panels.iter().flat_map(|p| p.visualization.queries())
    }

    /// Query source ids with no matching entry in `data_sources`.
    pub fn dangling_sources(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .queries()
            .map(|q| q.source.as_str())
            .filter(|source| self.data_source(source).is_none())
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    /// A copy with `panel` appended.
    pub fn with_panel(&self, panel: Panel) -> Result<Dashboard, CodecError> {
        let mut panels = self.panels.clone();
        panels.push(panel);
        self.mutate(Overrides::new().set("panels", panels))
    }

    /// A copy without the panel `id`. Unknown ids leave the panels as-is.
    pub fn without_panel(&self, id: &str) -> Result<Dashboard, CodecError> {
        let panels: Vec<Panel> = self.panels.iter().filter(|p| p.id != id).cloned().collect();
        self.mutate(Overrides::new().set("panels", panels))
    }

    /// A copy covering `time_range`.
    pub fn with_time_range(&self, time_range: TimeRange) -> Result<Dashboard, CodecError> {
        self.mutate(Overrides::new().set("time_range", time_range))
    }
}

impl Schematic for Dashboard {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Dashboard>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let refresh = optional(OneOf::declare(Number, REFRESH_INTERVALS));
            declared(
                Schema::record("Dashboard")
                    .field("id", Str, |d: &Dashboard| &d.id)
                    .field("title", Str, |d: &Dashboard| &d.title)
                    .field("description", optional(Str), |d: &Dashboard| &d.description)
                    .field("time_range", nested::<TimeRange>(), |d: &Dashboard| &d.time_range)
                    .field("refresh", refresh, |d: &Dashboard| &d.refresh)
                    .field("panels", array_of(nested::<Panel>()), |d: &Dashboard| &d.panels)
                    .field("variables", map_of(Str), |d: &Dashboard| &d.variables)
                    .field("tags", array_of(Str), |d: &Dashboard| &d.tags)
                    .field("data_sources", array_of(nested::<DataSource>()), |d: &Dashboard| {
                        &d.data_sources
                    })
                    .build(|bag| {
                        Ok(Dashboard {
                            id: bag.take("id")?,
                            title: bag.take("title")?,
                            description: bag.take("description")?,
                            time_range: bag.take("time_range")?,
                            refresh: bag.take("refresh")?,
                            panels: bag.take("panels")?,
                            variables: bag.take("variables")?,
                            tags: bag.take("tags")?,
                            data_sources: bag.take("data_sources")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}
