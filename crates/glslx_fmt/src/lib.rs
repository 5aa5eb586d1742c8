//! Token-driven reformatting of raw source text (spec.md §6's
//! `format(text, {indent, newline, trailingNewline})`). Unlike
//! `glslx_emit`, this never requires the source to parse or type check —
//! it runs over the lexical token stream alone.

mod options;
mod printer;
mod spelling;

pub use options::{FormatOptions, TrailingNewline};
pub use printer::format;
