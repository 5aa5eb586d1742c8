use glslx_base::Range;

/// External collaborator injected into the parser for `#include "path"`
/// resolution (spec.md §6, "File-access hook"). Returns `None` when the
/// file cannot be found; the parser turns that into a diagnostic rather
/// than treating it as fatal.
pub trait FileAccess {
    fn resolve(&mut self, file_path: &str, relative_to: &str) -> Option<String>;
}

/// The hook used when no file system access is wired up (embedded
/// sources, unit tests): every `#include` fails to resolve.
pub struct NullFileAccess;

impl FileAccess for NullFileAccess {
    fn resolve(&mut self, _file_path: &str, _relative_to: &str) -> Option<String> {
        None
    }
}

/// A `(original_range, included_range)` pair recording where a file was
/// included and the span of the resulting source (spec.md GLOSSARY,
/// "Include record").
#[derive(Clone, Copy, Debug)]
pub struct IncludeRecord {
    pub original_range: Range,
    pub included_range: Range,
}
