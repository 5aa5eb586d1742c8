use std::fmt;

use crate::source::{center_on_column, SourceId, SourceSet};

/// `(source, start_byte, end_byte)`, `start <= end`. Value semantics: it
/// never owns the `Source` it points into (spec.md §3).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub source: SourceId,
    pub start: u32,
    pub end: u32,
}

impl Range {
    pub fn new(source: SourceId, start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Range { source, start, end }
    }

    /// A zero-length range at `at`, used for the synthetic end-of-file
    /// token and for diagnostics that point at a single position.
    pub fn empty(source: SourceId, at: u32) -> Self {
        Range { source, start: at, end: at }
    }

    pub fn contains(&self, index: u32) -> bool {
        self.start <= index && index <= self.end
    }

    /// True when the two ranges share at least one byte, or when either is
    /// zero-length and lies within the other.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.source == other.source && self.start < other.end && other.start < self.end
            || (self.start == self.end && other.contains(self.start))
            || (other.start == other.end && self.contains(other.start))
    }

    /// Merges two ranges in the same source into their convex hull.
    pub fn merge(&self, other: &Range) -> Range {
        debug_assert_eq!(self.source, other.source);
        Range { source: self.source, start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    pub fn slice<'a>(&self, sources: &'a SourceSet) -> &'a str {
        &sources.get(self.source).contents()[self.start as usize..self.end as usize]
    }

    /// `name:line:col`, 1-based line and column, as used in diagnostic
    /// headers.
    pub fn location_string(&self, sources: &SourceSet) -> String {
        let source = sources.get(self.source);
        let (line, col) = source.index_to_line_column(self.start);
        format!("{}:{}:{}", source.name(), line + 1, col + 1)
    }

    /// Renders the source line(s) this range touches plus a caret/underline
    /// beneath it, truncated and centered per
    /// [`crate::source::center_on_column`].
    pub fn format_snippet(&self, sources: &SourceSet, max_width: usize) -> String {
        let source = sources.get(self.source);
        let (start_line, start_col) = source.index_to_line_column(self.start);
        let (end_line, end_col) = source.index_to_line_column(self.end);
        let line_text = source.contents_of_line(start_line);
        let (snippet, caret_col) = center_on_column(line_text, start_col as usize, max_width);
        let underline_len = if start_line == end_line {
            (end_col.saturating_sub(start_col)).max(1) as usize
        } else {
            1
        };
        let mut out = String::new();
        out.push_str(&snippet);
        out.push('\n');
        out.push_str(&" ".repeat(caret_col));
        out.push_str(&"^".repeat(underline_len));
        out
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}..{}]", self.source, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceSet;

    fn fixture() -> (SourceSet, SourceId) {
        let mut set = SourceSet::new();
        let id = set.add("a.glsl", "void main(){\n  gl_FragColor = vec4(1.0);\n}\n");
        (set, id)
    }

    #[test]
    fn location_string_is_one_based() {
        let (set, id) = fixture();
        let r = Range::new(id, 15, 27);
        assert_eq!(r.location_string(&set), "a.glsl:2:3");
    }

    #[test]
    fn overlap_detects_shared_bytes() {
        let (_, id) = fixture();
        let a = Range::new(id, 0, 10);
        let b = Range::new(id, 5, 15);
        let c = Range::new(id, 20, 25);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn empty_range_contains_its_own_point() {
        let (_, id) = fixture();
        let a = Range::empty(id, 5);
        assert!(a.contains(5));
        assert!(!a.contains(6));
    }

    #[test]
    fn slice_pulls_exact_bytes() {
        let (set, id) = fixture();
        let r = Range::new(id, 0, 4);
        assert_eq!(r.slice(&set), "void");
    }
}
