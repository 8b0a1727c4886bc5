//! Question paths for addressing within a payload
//!
//! Provides [`QuestionPath`] for dotted, optionally indexed addressing of
//! values inside a JSON payload (`nodes[2].cpu`).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One dot-separated step of a [`QuestionPath`]
///
/// `name` selects an object member; each entry of `indices` then selects an
/// array element, left to right (`matrix[1][0]` has two indices).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: String,
    indices: Vec<usize>,
}

impl PathSegment {
    /// Plain member segment
    #[inline]
    #[must_use]
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indices: Vec::new(),
        }
    }

    /// Member segment followed by one array index
    #[inline]
    #[must_use]
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            indices: vec![index],
        }
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Array indices applied after the member lookup
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Check if segment carries at least one index
    #[inline]
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    fn parse(raw: &str) -> Result<Self, PathSyntaxError> {
        if raw.is_empty() {
            return Err(PathSyntaxError::EmptySegment);
        }

        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(PathSyntaxError::MalformedIndex(raw.to_string()));
            }
            return Ok(Self::key(raw));
        };

        let name = &raw[..open];
        if name.is_empty() || name.contains(']') {
            return Err(PathSyntaxError::MalformedIndex(raw.to_string()));
        }

        let mut indices = Vec::new();
        let mut rest = &raw[open..];
        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('[')
                .and_then(|r| r.split_once(']'))
                .ok_or_else(|| PathSyntaxError::MalformedIndex(raw.to_string()))?;
            let (digits, tail) = inner;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PathSyntaxError::MalformedIndex(raw.to_string()));
            }
            let index = digits
                .parse::<usize>()
                .map_err(|_| PathSyntaxError::MalformedIndex(raw.to_string()))?;
            indices.push(index);
            rest = tail;
        }

        Ok(Self {
            name: name.to_string(),
            indices,
        })
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for index in &self.indices {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// Address of a value within a payload
///
/// Always has at least one segment. Paths are relative to whatever object
/// they are resolved against.
///
/// # Examples
/// - `mode` → member `mode` of the root
/// - `nodes[2].cpu` → member `cpu` of element 2 of array `nodes`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionPath(Vec<PathSegment>);

impl QuestionPath {
    /// Create path from segments
    ///
    /// # Errors
    /// Returns error if `segments` is empty
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, PathSyntaxError> {
        if segments.is_empty() {
            return Err(PathSyntaxError::Empty);
        }
        Ok(Self(segments))
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments to descend through before the write
    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[PathSegment] {
        &self.0[..self.0.len() - 1]
    }

    /// Segment that receives the write
    #[inline]
    #[must_use]
    pub fn leaf(&self) -> &PathSegment {
        &self.0[self.0.len() - 1]
    }
}

impl Display for QuestionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for QuestionPath {
    type Err = PathSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathSyntaxError::Empty);
        }

        let segments = s
            .split('.')
            .map(PathSegment::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(segments)
    }
}

/// Errors raised while parsing a path string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathSyntaxError {
    /// Path has no segments
    #[error("path is empty")]
    Empty,

    /// Empty segment in path (`a..b`)
    #[error("path contains empty segment")]
    EmptySegment,

    /// Bracket syntax is not `name[digits]`
    #[error("malformed index in segment: {0}")]
    MalformedIndex(String),
}
