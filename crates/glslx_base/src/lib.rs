//! Text buffers, byte ranges, and the diagnostic accumulator ("Log") that
//! every later stage of the compiler reports into.
//!
//! This crate purposefully does not depend on the lexer, parser, or AST
//! crates: it is the leaf of the dependency graph (spec.md §2's "Source &
//! Range" and "Log" rows), the same way `rustc_span`/`rustc_errors` sit
//! below the rest of rustc.

pub mod log;
pub mod range;
pub mod source;

pub use log::{Diagnostic, Log, Severity};
pub use range::Range;
pub use source::{Source, SourceId, SourceSet};
