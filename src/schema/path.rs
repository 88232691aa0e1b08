//! Structured settings paths.
//!
//! Every configuration field and every renderable node is identified by a
//! [`FieldPath`], an ordered sequence of string segments. Paths are compared
//! and stored structurally; the dot-joined canonical form is produced only
//! where a flat string is required (backend labels, translation lookup).

use std::fmt;

/// Separator used for the canonical string form of a path.
pub const PATH_SEP: &str = ".";

/// Ordered segment sequence identifying a configuration field or widget.
///
/// Segments are, in order: module, section, optional subsection and leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a canonical dot-joined string into a path.
    ///
    /// Empty segments are dropped, so `parse("")` yields the empty path.
    pub fn parse(key: &str) -> Self {
        Self {
            segments: key
                .split(PATH_SEP)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Builds a path from segment pieces.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the path's segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the segment at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// First segment: the owning module.
    pub fn module(&self) -> Option<&str> {
        self.get(0)
    }

    /// Last segment: the leaf name.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Removes and returns the last segment.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Returns the parent path (empty path for a root segment).
    pub fn parent(&self) -> Self {
        let mut path = self.clone();
        path.pop();
        path
    }

    /// Whether `prefix` is a leading sub-sequence of this path.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(PATH_SEP))
    }
}

impl From<&str> for FieldPath {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let path = FieldPath::parse("main.gui.show_hidden");
        assert_eq!(path.segments(), ["main", "gui", "show_hidden"]);
        assert_eq!(path.to_string(), "main.gui.show_hidden");
        assert_eq!(path.module(), Some("main"));
        assert_eq!(path.last(), Some("show_hidden"));
    }

    #[test]
    fn parse_empty_is_empty() {
        assert!(FieldPath::parse("").is_empty());
        assert_eq!(FieldPath::parse("").to_string(), "");
    }

    #[test]
    fn child_and_parent() {
        let section = FieldPath::parse("grep.filters");
        let leaf = section.child("symbol");
        assert_eq!(leaf.to_string(), "grep.filters.symbol");
        assert_eq!(leaf.parent(), section);
    }

    #[test]
    fn starts_with_matches_segment_prefixes_only() {
        let leaf = FieldPath::parse("grep.filters.symbol");
        assert!(leaf.starts_with(&FieldPath::parse("grep.filters")));
        assert!(leaf.starts_with(&FieldPath::parse("grep")));
        assert!(!leaf.starts_with(&FieldPath::parse("grep.filt")));
        assert!(!FieldPath::parse("grep").starts_with(&leaf));
    }
}
