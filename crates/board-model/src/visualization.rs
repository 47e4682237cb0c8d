//! # Visualizations
//!
//! What a panel draws. A discriminated union on `type`: `line`, `bar`,
//! `table`, `stat` and `text`. Rendering lives outside this crate; these
//! types only carry the configuration.

use std::sync::OnceLock;

use board_codec::{
    array_of, declared, nested, optional, Bool, Discriminated, Number, Schema, Schematic, Str,
    SubTypes,
};

use crate::query::Query;

/// Time series drawn as lines, optionally stacked.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub queries: Vec<Query>,
    pub stacked: bool,
}

impl Schematic for LineChart {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<LineChart>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("LineChart")
                    .field("queries", array_of(nested::<Query>()), |v: &LineChart| &v.queries)
                    .field("stacked", Bool, |v: &LineChart| &v.stacked)
                    .build(|bag| {
                        Ok(LineChart {
                            queries: bag.take("queries")?,
                            stacked: bag.take("stacked")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for LineChart {
    const TAG: &'static str = "line";
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub queries: Vec<Query>,
    pub horizontal: bool,
}

impl Schematic for BarChart {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<BarChart>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("BarChart")
                    .field("queries", array_of(nested::<Query>()), |v: &BarChart| &v.queries)
                    .field("horizontal", Bool, |v: &BarChart| &v.horizontal)
                    .build(|bag| {
                        Ok(BarChart {
                            queries: bag.take("queries")?,
                            horizontal: bag.take("horizontal")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for BarChart {
    const TAG: &'static str = "bar";
}

/// One query's latest values as rows, restricted to `columns`.
#[derive(Debug, Clone)]
pub struct Table {
    pub query: Query,
    pub columns: Vec<String>,
}

impl Schematic for Table {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Table>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Table")
                    .field("query", nested::<Query>(), |v: &Table| &v.query)
                    .field("columns", array_of(Str), |v: &Table| &v.columns)
                    .build(|bag| {
                        Ok(Table {
                            query: bag.take("query")?,
                            columns: bag.take("columns")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for Table {
    const TAG: &'static str = "table";
}

/// A single headline number, colored by ascending `thresholds`.
#[derive(Debug, Clone)]
pub struct Stat {
    pub query: Query,
    pub unit: Option<String>,
    pub thresholds: Vec<f64>,
}

impl Schematic for Stat {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Stat>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Stat")
                    .field("query", nested::<Query>(), |v: &Stat| &v.query)
                    .field("unit", optional(Str), |v: &Stat| &v.unit)
                    .field("thresholds", array_of(Number), |v: &Stat| &v.thresholds)
                    .build(|bag| {
                        Ok(Stat {
                            query: bag.take("query")?,
                            unit: bag.take("unit")?,
                            thresholds: bag.take("thresholds")?,
                        })
                    })
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for Stat {
    const TAG: &'static str = "stat";
}

/// Static markdown.
#[derive(Debug, Clone)]
pub struct Text {
    pub markdown: String,
}

impl Schematic for Text {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Text>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                Schema::record("Text")
                    .field("markdown", Str, |v: &Text| &v.markdown)
                    .build(|bag| Ok(Text { markdown: bag.take("markdown")? }))
                    .map(Schema::Record),
            )
        })
    }
}

impl Discriminated for Text {
    const TAG: &'static str = "text";
}

// ─── Union ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Visualization {
    Line(LineChart),
    Bar(BarChart),
    Table(Table),
    Stat(Stat),
    Text(Text),
}

impl Visualization {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Line(_) => LineChart::TAG,
            Self::Bar(_) => BarChart::TAG,
            Self::Table(_) => Table::TAG,
            Self::Stat(_) => Stat::TAG,
            Self::Text(_) => Text::TAG,
        }
    }

    /// Every query this visualization issues, in display order.
    pub fn queries(&self) -> Vec<&Query> {
        match self {
            Self::Line(v) => v.queries.iter().collect(),
            Self::Bar(v) => v.queries.iter().collect(),
            Self::Table(v) => vec![&v.query],
            Self::Stat(v) => vec![&v.query],
            Self::Text(_) => Vec::new(),
        }
    }
}

impl Schematic for Visualization {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Visualization>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            declared(
                SubTypes::builder("Visualization", Visualization::tag)
                    .variant(Visualization::Line, |v| match v {
                        Visualization::Line(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Visualization::Bar, |v| match v {
                        Visualization::Bar(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Visualization::Table, |v| match v {
                        Visualization::Table(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Visualization::Stat, |v| match v {
                        Visualization::Stat(inner) => Some(inner),
                        _ => None,
                    })
                    .variant(Visualization::Text, |v| match v {
                        Visualization::Text(inner) => Some(inner),
                        _ => None,
                    })
                    .build()
                    .map(Schema::Union),
            )
        })
    }
}
