//! # Path Tracker — Decode Locations
//!
//! Tracks where inside the source document a decode is currently working,
//! so that a failure deep inside a dashboard can be reported as
//! `$.panels[2].visualization.query.aggregation.type` instead of "bad value".
//!
//! ## Design
//!
//! Decoding descends recursively, so the tracker is a borrowed chain: each
//! nested call receives a [`Path`] whose `parent` points at the caller's
//! frame. Extending a path is a stack allocation and never clones the
//! segments above it. Only when a [`DecodeError`] is actually built is the
//! chain materialized into an owned [`JsonPath`].

use std::fmt;

use crate::error::{DecodeError, DecodeReason};

/// One step of a borrowed decode path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A schema field name.
    Field(&'a str),
    /// A position inside a sequence.
    Index(usize),
    /// A key inside a string-keyed map.
    Key(&'a str),
}

/// The location of the value currently being decoded.
///
/// Constructed fresh by [`Path::root`] for each top-level decode and
/// extended by one segment per nested descent.
#[derive(Debug, Clone, Copy)]
pub struct Path<'a> {
    parent: Option<&'a Path<'a>>,
    segment: Option<Segment<'a>>,
}

impl Path<'static> {
    /// The document root (`$`).
    pub const fn root() -> Self {
        Path {
            parent: None,
            segment: None,
        }
    }
}

impl<'a> Path<'a> {
    /// Descend into a named field.
    pub fn field<'b>(&'b self, name: &'b str) -> Path<'b> {
        self.child(Segment::Field(name))
    }

    /// Descend into a sequence element.
    pub fn index(&self, index: usize) -> Path<'_> {
        self.child(Segment::Index(index))
    }

    /// Descend into a map entry.
    pub fn key<'b>(&'b self, key: &'b str) -> Path<'b> {
        self.child(Segment::Key(key))
    }

    fn child<'b>(&'b self, segment: Segment<'b>) -> Path<'b> {
        Path {
            parent: Some(self),
            segment: Some(segment),
        }
    }

    /// Number of segments between the root and this location.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = Some(self);
        while let Some(path) = cursor {
            if path.segment.is_some() {
                depth += 1;
            }
            cursor = path.parent;
        }
        depth
    }

    /// Materialize the borrowed chain into an owned path.
    pub fn to_json_path(&self) -> JsonPath {
        let mut segments = Vec::with_capacity(self.depth());
        let mut cursor = Some(self);
        while let Some(path) = cursor {
            if let Some(segment) = path.segment {
                segments.push(PathSegment::from(segment));
            }
            cursor = path.parent;
        }
        segments.reverse();
        JsonPath(segments)
    }

    /// Build a [`DecodeError`] located at this path.
    pub fn error(&self, reason: DecodeReason) -> DecodeError {
        DecodeError {
            path: self.to_json_path(),
            reason,
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_json_path(), f)
    }
}

// ─── Owned Paths ─────────────────────────────────────────────────────

/// An owned path segment, as carried by [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
    Key(String),
}

impl From<Segment<'_>> for PathSegment {
    fn from(segment: Segment<'_>) -> Self {
        match segment {
            Segment::Field(name) => Self::Field(name.to_owned()),
            Segment::Index(index) => Self::Index(index),
            Segment::Key(key) => Self::Key(key.to_owned()),
        }
    }
}

/// An owned location inside a source document.
///
/// Renders in JSONPath-like notation: `$`, `$.panels[0].title`,
/// `$.variables["env"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns true for the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments from the root outward.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Append a segment, returning the extended path.
    pub fn join(mut self, segment: PathSegment) -> Self {
        self.0.push(segment);
        self
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_dollar() {
        assert_eq!(Path::root().to_string(), "$");
        assert!(Path::root().to_json_path().is_root());
        assert_eq!(Path::root().depth(), 0);
    }

    #[test]
    fn nested_segments_render_in_order() {
        let root = Path::root();
        let panels = root.field("panels");
        let second = panels.index(2);
        let vars = second.field("variables");
        let env = vars.key("env");
        assert_eq!(env.to_string(), r#"$.panels[2].variables["env"]"#);
        assert_eq!(env.depth(), 4);
    }

    #[test]
    fn sibling_paths_do_not_interfere() {
        let root = Path::root();
        let a = root.field("a");
        let b = root.field("b");
        assert_eq!(a.to_string(), "$.a");
        assert_eq!(b.to_string(), "$.b");
    }

    #[test]
    fn owned_path_segments() {
        let root = Path::root();
        let items = root.field("items");
        let first = items.index(0);
        let owned = first.to_json_path();
        assert_eq!(
            owned.segments(),
            &[PathSegment::Field("items".into()), PathSegment::Index(0)]
        );
        let joined = owned.join(PathSegment::Key("k".into()));
        assert_eq!(joined.to_string(), r#"$.items[0]["k"]"#);
    }

    #[test]
    fn error_carries_location() {
        let root = Path::root();
        let title = root.field("title");
        let err = title.error(DecodeReason::InvalidValue("empty".into()));
        assert_eq!(err.path.to_string(), "$.title");
    }
}
