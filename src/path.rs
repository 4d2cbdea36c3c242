//! Path language for addressing nodes inside documents and schemas
//!
//! A path is a dot-separated list of segments:
//! - a field name (`address`)
//! - a concrete array index (`0`, `12`)
//! - the wildcard token (default `<idx>`), meaning every element of the array
//!   at that position
//!
//! The wildcard is only meaningful as an input to deletion and narrowing.
//! Paths produced by the update decomposer always use concrete indices.

use std::fmt;

use thiserror::Error;

/// Default token for the "every element" segment.
pub const DEFAULT_WILDCARD: &str = "<idx>";

/// Errors raised while parsing a path string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// `a..b`, a leading dot or a trailing dot
    #[error("path '{path}' contains an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    /// Paths are restricted to ASCII
    #[error("path '{0}' contains non-ASCII characters")]
    NonAscii(String),
}

/// Result type for path parsing
pub type PathResult<T> = Result<T, PathError>;

/// One component of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object key
    Name(String),
    /// Position inside an array. On an object it addresses the key with the
    /// same decimal spelling.
    Index(usize),
    /// Every element of the array at this depth
    Wildcard,
}

impl Segment {
    /// Classifies a raw segment string.
    ///
    /// Only canonical decimal spellings become indices (`"0"`, `"7"`, not
    /// `"07"`), so rendering a parsed path reproduces the input.
    pub fn parse(raw: &str, wildcard: &str) -> Self {
        if raw == wildcard {
            return Segment::Wildcard;
        }
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));
        if canonical {
            if let Ok(index) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Name(raw.to_string())
    }

    /// Returns the object key this segment addresses, if any.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Segment::Name(name) => Some(name.clone()),
            Segment::Index(index) => Some(index.to_string()),
            Segment::Wildcard => None,
        }
    }

    fn render(&self, wildcard: &str, out: &mut String) {
        match self {
            Segment::Name(name) => out.push_str(name),
            Segment::Index(index) => out.push_str(&index.to_string()),
            Segment::Wildcard => out.push_str(wildcard),
        }
    }
}

/// An ordered sequence of segments. The empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The root path (no segments)
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from already classified segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parses a dot-separated path using `wildcard` as the wildcard token.
    ///
    /// The empty string parses to the root path.
    pub fn parse(raw: &str, wildcard: &str) -> PathResult<Self> {
        if !raw.is_ascii() {
            return Err(PathError::NonAscii(raw.to_string()));
        }
        if raw.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for (position, part) in raw.split('.').enumerate() {
            if part.is_empty() {
                return Err(PathError::EmptySegment {
                    path: raw.to_string(),
                    position,
                });
            }
            segments.push(Segment::parse(part, wildcard));
        }
        Ok(Self { segments })
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if any segment is the wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }

    /// Appends a field name.
    pub fn child(&self, name: impl Into<String>) -> Self {
        self.with(Segment::Name(name.into()))
    }

    /// Appends a concrete array index.
    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    /// Appends the wildcard segment.
    pub fn wildcard(&self) -> Self {
        self.with(Segment::Wildcard)
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Renders the path with an explicit wildcard token.
    pub fn render(&self, wildcard: &str) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            segment.render(wildcard, &mut out);
        }
        out
    }
}

/// Renders with [`DEFAULT_WILDCARD`]. Use [`Path::render`] for a configured token.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_WILDCARD))
    }
}
