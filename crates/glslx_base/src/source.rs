use std::cell::OnceCell;
use std::fmt;

use unicode_width::UnicodeWidthChar;

/// A handle into a [`SourceSet`]. Cheap, `Copy`, and carries no lifetime —
/// the idiomatic substitute for "ranges never own the source" in a
/// language without a tracing GC (see DESIGN.md, glslx_base entry).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SourceId(u32);

/// A named text buffer plus a lazily-built table of line-start byte
/// offsets. The table is built on first use, not at construction time,
/// matching spec.md §3's "built lazily from the contents".
pub struct Source {
    name: String,
    contents: String,
    line_starts: OnceCell<Vec<u32>>,
}

impl Source {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Source { name: name.into(), contents: contents.into(), line_starts: OnceCell::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    fn line_starts(&self) -> &[u32] {
        self.line_starts.get_or_init(|| {
            let mut starts = vec![0u32];
            for (i, b) in self.contents.bytes().enumerate() {
                if b == b'\n' {
                    starts.push((i + 1) as u32);
                }
            }
            starts
        })
    }

    /// Converts a byte index into a zero-based `(line, column)` pair.
    /// The column is a byte offset into the line, not a grapheme count;
    /// callers that need a display column should go through
    /// [`Source::contents_of_line`] and measure width themselves.
    pub fn index_to_line_column(&self, index: u32) -> (u32, u32) {
        let starts = self.line_starts();
        let line = match starts.binary_search(&index) {
            Ok(l) => l,
            Err(l) => l - 1,
        };
        (line as u32, index - starts[line])
    }

    /// Inverse of [`Self::index_to_line_column`]: a zero-based `(line,
    /// column)` pair to a byte index, clamped to the line's own length so
    /// an out-of-range column (e.g. from a stale editor position) still
    /// yields a usable index rather than panicking.
    pub fn line_column_to_index(&self, line: u32, column: u32) -> u32 {
        let starts = self.line_starts();
        let line = (line as usize).min(starts.len() - 1);
        let line_start = starts[line];
        let line_len = self.contents_of_line(line as u32).len() as u32;
        line_start + column.min(line_len)
    }

    /// The text of line `line` (zero-based), without its trailing newline.
    pub fn contents_of_line(&self, line: u32) -> &str {
        let starts = self.line_starts();
        let line = line as usize;
        let start = starts[line] as usize;
        let end = starts.get(line + 1).map_or(self.contents.len(), |&s| s as usize);
        self.contents[start..end].trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts().len() as u32
    }
}

/// Owns every [`Source`] that participates in a compile; [`SourceId`]s are
/// indices into it. Mirrors `rustc_span`'s `SourceMap` in spirit, scaled
/// down to this system's needs.
#[derive(Default)]
pub struct SourceSet {
    sources: Vec<Source>,
}

impl SourceSet {
    pub fn new() -> Self {
        SourceSet { sources: Vec::new() }
    }

    pub fn add(&mut self, name: impl Into<String>, contents: impl Into<String>) -> SourceId {
        let id = SourceId(self.sources.len() as u32);
        self.sources.push(Source::new(name, contents));
        id
    }

    pub fn get(&self, id: SourceId) -> &Source {
        &self.sources[id.0 as usize]
    }

    pub fn find_by_name(&self, name: &str) -> Option<SourceId> {
        self.sources.iter().position(|s| s.name == name).map(|i| SourceId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Unicode-aware display width of a single character, used to expand tabs
/// and to center long lines in diagnostic snippets without splitting a
/// wide glyph in half.
pub fn char_display_width(c: char) -> usize {
    if c == '\t' {
        4
    } else {
        UnicodeWidthChar::width(c).unwrap_or(0)
    }
}

/// Expands tabs to `char_display_width` columns, for use when rendering a
/// source line inside a diagnostic caret/snippet.
pub fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '\t' {
            let width = char_display_width(c);
            out.extend(std::iter::repeat(' ').take(width));
        } else {
            out.push(c);
        }
    }
    out
}

/// Renders a single source line centered (by display column, not byte
/// offset) on `column`, truncating to `max_width` columns with ellipses
/// when the line is too long to show in full. Used by diagnostic snippet
/// formatting (spec.md §3, "column-bounded centering").
pub fn center_on_column(line: &str, column: usize, max_width: usize) -> (String, usize) {
    let expanded = expand_tabs(line);
    let chars: Vec<char> = expanded.chars().collect();
    if chars.len() <= max_width {
        return (expanded, column);
    }
    let half = max_width / 2;
    let start = column.saturating_sub(half);
    let start = start.min(chars.len().saturating_sub(max_width));
    let end = (start + max_width).min(chars.len());
    let mut snippet: String = chars[start..end].iter().collect();
    let mut new_column = column.saturating_sub(start);
    if start > 0 {
        snippet.insert_str(0, "...");
        new_column += 3;
    }
    if end < chars.len() {
        snippet.push_str("...");
    }
    (snippet, new_column)
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts_are_lazy_and_correct() {
        let s = Source::new("<test>", "abc\ndef\nghi");
        assert_eq!(s.index_to_line_column(0), (0, 0));
        assert_eq!(s.index_to_line_column(4), (1, 0));
        assert_eq!(s.index_to_line_column(9), (2, 1));
        assert_eq!(s.contents_of_line(1), "def");
        assert_eq!(s.line_count(), 3);
    }

    #[test]
    fn line_column_to_index_round_trips_with_index_to_line_column() {
        let s = Source::new("<test>", "abc\ndef\nghi");
        assert_eq!(s.line_column_to_index(1, 0), 4);
        assert_eq!(s.line_column_to_index(2, 1), 9);
        assert_eq!(s.index_to_line_column(s.line_column_to_index(1, 2)), (1, 2));
    }

    #[test]
    fn contents_of_line_handles_crlf() {
        let s = Source::new("<test>", "a\r\nb\r\nc");
        assert_eq!(s.contents_of_line(0), "a");
        assert_eq!(s.contents_of_line(1), "b");
        assert_eq!(s.contents_of_line(2), "c");
    }

    #[test]
    fn source_set_round_trips_by_name() {
        let mut set = SourceSet::new();
        let id = set.add("foo.glsl", "void main(){}");
        assert_eq!(set.find_by_name("foo.glsl"), Some(id));
        assert_eq!(set.get(id).contents(), "void main(){}");
    }

    #[test]
    fn center_on_column_truncates_long_lines() {
        let line = "x".repeat(200);
        let (snippet, col) = center_on_column(&line, 150, 40);
        assert!(snippet.len() <= 40 + 6);
        assert!(col < snippet.chars().count());
    }
}
