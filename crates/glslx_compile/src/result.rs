use std::collections::BTreeMap;

/// One compiled output (spec.md §2, "for each exported entry point"):
/// `name` is the entry point's own source name (before it was forced to
/// `main`), `contents` is the emitted GLSL text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledShader {
    pub name: String,
    pub contents: String,
}

/// spec.md §6's programmatic `compile` result, generalized from its
/// literal `{log, output}` shape to carry every entry point's output
/// (scenario 4 compiles two entry points into two shaders at once; a
/// single `output: Option<String>` field cannot hold both). The common
/// single-entry-point case is just `shaders[0].contents`.
///
/// `shaders` is empty when `log` contains an error (spec.md §7: codegen
/// is suppressed when `hasErrors`).
#[derive(Clone, Debug, Default)]
pub struct CompileResult {
    pub log: String,
    pub shaders: Vec<CompiledShader>,
    pub renaming: BTreeMap<String, String>,
}
