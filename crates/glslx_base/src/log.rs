use std::collections::HashSet;

use crate::range::Range;
use crate::source::SourceSet;

/// `WARNING` vs `ERROR` (spec.md §7). Both are non-fatal; only an `ERROR`
/// suppresses code generation in `compile` (not `typeCheck`/IDE queries).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub range: Range,
    pub text: String,
    pub note_range: Option<Range>,
    pub note_text: Option<String>,
}

/// Accumulates diagnostics across every stage of a compile. Diagnostics
/// appear in issue order (spec.md §5's ordering guarantee); a stage never
/// aborts because of one (the sole exception, a tokenizer error aborting
/// *that source's* tokenization, is implemented in `glslx_lexer`, not
/// here).
#[derive(Default)]
pub struct Log {
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<(crate::source::SourceId, u32, Severity, String)>,
}

impl Log {
    pub fn new() -> Self {
        Log::default()
    }

    fn push(&mut self, severity: Severity, range: Range, text: String) {
        let key = (range.source, range.start, severity, text.clone());
        if !self.seen.insert(key) {
            return;
        }
        self.diagnostics.push(Diagnostic { severity, range, text, note_range: None, note_text: None });
    }

    pub fn error(&mut self, range: Range, text: impl Into<String>) {
        self.push(Severity::Error, range, text.into());
    }

    pub fn warning(&mut self, range: Range, text: impl Into<String>) {
        self.push(Severity::Warning, range, text.into());
    }

    /// Attaches a note to the most recently emitted diagnostic, per
    /// spec.md §7's `noteRange`/`noteText` pair. A no-op if nothing has
    /// been emitted yet (or the last emission was suppressed as a
    /// duplicate).
    pub fn note(&mut self, range: Range, text: impl Into<String>) {
        if let Some(last) = self.diagnostics.last_mut() {
            last.note_range = Some(range);
            last.note_text = Some(text.into());
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Renders every diagnostic as `name:line:col: error: text`, one per
    /// line, in issue order, with note lines indented beneath the
    /// diagnostic they attach to.
    pub fn render(&self, sources: &SourceSet) -> String {
        let mut out = String::new();
        for d in &self.diagnostics {
            let kind = match d.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            out.push_str(&format!("{}: {}: {}\n", d.range.location_string(sources), kind, d.text));
            if let (Some(note_range), Some(note_text)) = (d.note_range, &d.note_text) {
                out.push_str(&format!("  {}: note: {}\n", note_range.location_string(sources), note_text));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceSet;

    fn fixture_range(set: &mut SourceSet) -> Range {
        let id = set.add("a.glsl", "int x;\n");
        Range::new(id, 0, 3)
    }

    #[test]
    fn duplicate_errors_at_same_position_are_suppressed() {
        let mut set = SourceSet::new();
        let r = fixture_range(&mut set);
        let mut log = Log::new();
        log.error(r, "bad thing");
        log.error(r, "bad thing");
        assert_eq!(log.diagnostics().len(), 1);
    }

    #[test]
    fn distinct_messages_at_same_position_both_appear() {
        let mut set = SourceSet::new();
        let r = fixture_range(&mut set);
        let mut log = Log::new();
        log.error(r, "first problem");
        log.error(r, "second problem");
        assert_eq!(log.diagnostics().len(), 2);
    }

    #[test]
    fn note_attaches_to_most_recent_diagnostic() {
        let mut set = SourceSet::new();
        let r = fixture_range(&mut set);
        let mut log = Log::new();
        log.error(r, "bad thing");
        log.note(r, "see here");
        assert_eq!(log.diagnostics()[0].note_text.as_deref(), Some("see here"));
    }

    #[test]
    fn has_errors_and_has_warnings_are_independent() {
        let mut set = SourceSet::new();
        let r = fixture_range(&mut set);
        let mut log = Log::new();
        log.warning(r, "a warning");
        assert!(!log.has_errors());
        assert!(log.has_warnings());
    }
}
