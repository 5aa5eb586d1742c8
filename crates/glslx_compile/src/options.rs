/// `M` in spec.md §6's `--renaming=M`. `All`/`InternalOnly` both run the
/// renamer (`glslx_sema::rename`) exactly as it already skips imported
/// symbols and the `gl_` prefix; the distinction this orchestration layer
/// adds on top is which symbols the per-entry-point "unexport everything
/// else" step (spec.md §2) leaves exported going into the renamer — see
/// `compile::compile_entry` for where that split actually happens.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RenamingMode {
    #[default]
    All,
    InternalOnly,
    None,
}

/// spec.md §6's programmatic `compile` options (`renaming`,
/// `disableRewriting`, `keepWhitespace`/`prettyPrint`,
/// `trimSymbols`/`keepSymbols`); `fileAccess` and `format` are separate
/// parameters on [`crate::compile`] rather than fields here, since one is
/// a trait object and the other is the CLI's concern (see
/// `SPEC_FULL.md` §5.2).
#[derive(Clone, Copy, Debug)]
pub struct CompileOptions {
    pub renaming: RenamingMode,
    pub disable_rewriting: bool,
    pub keep_whitespace: bool,
    pub trim_symbols: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { renaming: RenamingMode::All, disable_rewriting: false, keep_whitespace: false, trim_symbols: true }
    }
}

/// One `{name, contents}` compile-unit input (spec.md §6, "a source, a
/// `{name,contents}` pair, or an array thereof" — the array case is just
/// `&[SourceUnit]`).
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub name: String,
    pub contents: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        SourceUnit { name: name.into(), contents: contents.into() }
    }
}

impl From<&str> for SourceUnit {
    fn from(contents: &str) -> Self {
        SourceUnit::new("<input>", contents)
    }
}

impl From<String> for SourceUnit {
    fn from(contents: String) -> Self {
        SourceUnit::new("<input>", contents)
    }
}
