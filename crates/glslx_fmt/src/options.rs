/// What to do with the final newline of the formatted output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrailingNewline {
    /// Keep whatever the input had (a trailing newline stays, its absence
    /// stays).
    Preserve,
    /// Always strip a trailing newline, however many the input had.
    Remove,
    /// Always end with exactly one newline.
    Insert,
}

/// spec.md §6's `format(text, {indent, newline, trailingNewline})`.
#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub indent: String,
    pub newline: String,
    pub trailing_newline: TrailingNewline,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { indent: "  ".to_string(), newline: "\n".to_string(), trailing_newline: TrailingNewline::Insert }
    }
}
