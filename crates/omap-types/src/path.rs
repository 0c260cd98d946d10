//! Path tuples.
//!
//! A path is the ordered sequence of segment names from the tree root to a
//! node. The root itself is the one-element sequence `[""]`, so `/a/b` is
//! `["", "a", "b"]`.
//!
//! Paths order lexicographically by segment. The path index depends on this:
//! every path that has `p` as a prefix sorts at or after `p`, and all of them
//! form one contiguous run in a sorted map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// An ordered, non-empty sequence of segment names.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ObjectPath(Vec<String>);

impl ObjectPath {
    /// The root path `[""]`.
    pub fn root() -> Self {
        Self(vec![String::new()])
    }

    /// Build a path from raw segments.
    ///
    /// The sequence must be non-empty. Segments are not otherwise validated,
    /// so paths that do not start at a root segment are accepted as-is.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(TypeError::EmptyPath);
        }
        Ok(Self(segments))
    }

    /// Parse a slash-separated absolute path (`/`, `/a`, `/a/b`).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };
        let Some(rest) = s.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };
        if rest.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = vec![String::new()];
        for segment in rest.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }
            segments.push(segment.to_string());
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (the root has length 1).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; paths hold at least one segment.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_empty()
    }

    /// The last segment.
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }

    /// The immediate parent, or `None` for a one-segment path.
    pub fn parent(&self) -> Option<ObjectPath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(self.prefix(self.0.len() - 1))
    }

    /// The path of a child named `name`.
    pub fn child(&self, name: impl Into<String>) -> ObjectPath {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// The first `len` segments. `len` is clamped to `1..=self.len()`.
    pub fn prefix(&self, len: usize) -> ObjectPath {
        let len = len.clamp(1, self.0.len());
        Self(self.0[..len].to_vec())
    }

    /// Returns `true` if `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &ObjectPath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Every prefix from the first segment down to (and including) `self`.
    pub fn prefixes(&self) -> impl Iterator<Item = ObjectPath> + '_ {
        (1..=self.0.len()).map(move |len| self.prefix(len))
    }

    /// Proper ancestors, nearest first: parent, grandparent, ..., root.
    pub fn ancestors(&self) -> impl Iterator<Item = ObjectPath> + '_ {
        (1..self.0.len()).rev().map(move |len| self.prefix(len))
    }

    /// Replace the leading `from` with `to`.
    ///
    /// Returns `None` if `from` is not a prefix of `self`.
    pub fn rebase(&self, from: &ObjectPath, to: &ObjectPath) -> Option<ObjectPath> {
        if !from.is_prefix_of(self) {
            return None;
        }
        let mut segments = to.0.clone();
        segments.extend_from_slice(&self.0[from.0.len()..]);
        Some(Self(segments))
    }
}

impl fmt::Debug for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectPath({self})")
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for ObjectPath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<String>> for ObjectPath {
    type Error = TypeError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_segments(segments)
    }
}

impl From<ObjectPath> for Vec<String> {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}
