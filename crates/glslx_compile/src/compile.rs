use std::collections::BTreeMap;

use glslx_ast::{NodeId, NodeKind, SymbolFlags, SymbolId, SymbolTable, Tree};
use glslx_base::{Log, SourceSet};
use glslx_emit::EmitOptions;
use glslx_parse::FileAccess;
use glslx_sema::{rename, resolve, rewrite, RenameResult};

use crate::builtins::{self, API_SOURCE, API_SOURCE_NAME};
use crate::options::{CompileOptions, RenamingMode, SourceUnit};
use crate::result::{CompiledShader, CompileResult};

/// Parses `units` (with the built-in API source prepended) into one
/// shared tree and scope, exactly the shape [`compile_entry`] below
/// re-does per entry point - used here only to discover entry points and
/// to surface a parse/resolve error without paying for a second parse.
fn parse_and_resolve(sources: &mut SourceSet, file_access: &mut dyn FileAccess, units: &[SourceUnit]) -> glslx_parse::ParseResult {
    let api_id = sources.add(API_SOURCE_NAME, API_SOURCE);
    let mut entries = vec![api_id];
    for unit in units {
        entries.push(sources.add(unit.name.clone(), unit.contents.clone()));
    }
    let mut result = glslx_parse::parse(sources, &entries, file_access);
    builtins::tag_extension_gated_builtins(&mut result.symbols, result.global_scope);
    resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
    result
}

fn top_level_functions(tree: &Tree, symbols: &SymbolTable) -> Vec<(NodeId, SymbolId)> {
    let Some(root) = tree.root else { return Vec::new() };
    tree.children(root)
        .filter(|&n| tree.kind(n) == NodeKind::Function)
        .filter_map(|n| tree.get(n).symbol.map(|id| (n, id)))
        .collect()
}

/// Every `export`ed top-level function name, in declaration order, each
/// appearing once even if paired with a forward declaration; or, if none
/// are exported, the single implicit `main` (spec.md GLOSSARY, "Entry
/// point").
fn discover_entry_points(tree: &Tree, symbols: &SymbolTable) -> (Vec<String>, bool) {
    let mut explicit = Vec::new();
    let mut has_plain_main = false;
    for (_, id) in top_level_functions(tree, symbols) {
        let sym = symbols.get(id);
        if sym.is_exported() {
            if !explicit.contains(&sym.name) {
                explicit.push(sym.name.clone());
            }
        } else if sym.name == "main" {
            has_plain_main = true;
        }
    }
    if !explicit.is_empty() {
        (explicit, true)
    } else if has_plain_main {
        (vec!["main".to_string()], false)
    } else {
        (Vec::new(), false)
    }
}

/// Picks the symbol this entry point's output will be built from: the
/// definition (body present) if both a forward declaration and a
/// definition matched, otherwise whichever candidate exists.
fn find_entry_symbol(tree: &Tree, symbols: &SymbolTable, entry_name: &str, entries_are_exported: bool) -> Option<SymbolId> {
    let candidates: Vec<SymbolId> = top_level_functions(tree, symbols)
        .into_iter()
        .map(|(_, id)| id)
        .filter(|&id| {
            let sym = symbols.get(id);
            sym.name == entry_name && (!entries_are_exported || sym.is_exported())
        })
        .collect();
    candidates
        .iter()
        .copied()
        .find(|&id| symbols.get(id).as_function().is_some_and(|f| f.body.is_some()))
        .or_else(|| candidates.first().copied())
}

/// Clears `EXPORTED` from every symbol except `keep` (spec.md §2,
/// "unexport everything else"). Function symbols are cleared
/// unconditionally: once this tree no longer builds that sibling entry
/// point, it is just an ordinary internal helper, dead-code-eligible if
/// unreferenced by the chosen entry. Non-function globals (uniforms,
/// attributes shared across compiled units) are left exported unless
/// `expose_globals` asks for them to be renamed too.
fn unexport_others(symbols: &mut SymbolTable, keep: SymbolId, expose_globals: bool) {
    let ids: Vec<SymbolId> = symbols.symbols_iter().map(|s| s.id).filter(|&id| id != keep && symbols.get(id).is_exported()).collect();
    for id in ids {
        let is_function = symbols.get(id).as_function().is_some();
        if is_function || expose_globals {
            symbols.get_mut(id).flags.remove(SymbolFlags::EXPORTED);
        }
    }
}

struct EntryOutput {
    name: String,
    contents: String,
    rename: RenameResult,
}

/// Compiles one entry point in isolation (spec.md §2: "for each exported
/// entry point: clone-parse again into a fresh tree, unexport everything
/// else, rewriter, collect"). Returns `None` if the re-parse/resolve
/// itself produced errors; the caller already knows this can't happen
/// when the shared first pass succeeded, since both passes see identical
/// source text, but a defensive `None` keeps this function total.
#[tracing::instrument(level = "debug", skip_all, fields(entry = entry_name))]
fn compile_entry(
    sources: &mut SourceSet,
    file_access: &mut dyn FileAccess,
    units: &[SourceUnit],
    entry_name: &str,
    entries_are_exported: bool,
    options: &CompileOptions,
) -> Option<EntryOutput> {
    let mut result = parse_and_resolve(sources, file_access, units);
    if result.log.has_errors() {
        return None;
    }

    let entry_symbol = find_entry_symbol(&result.tree, &result.symbols, entry_name, entries_are_exported)?;
    unexport_others(&mut result.symbols, entry_symbol, false);

    if !options.disable_rewriting {
        rewrite(&mut result.tree, &mut result.symbols, &mut result.data, options.trim_symbols);
    }

    if options.renaming == RenamingMode::All {
        unexport_others(&mut result.symbols, entry_symbol, true);
    }

    let rename_result = if options.renaming != RenamingMode::None { rename(&mut result.symbols) } else { RenameResult::default() };

    result.symbols.get_mut(entry_symbol).name = "main".to_string();

    let contents = glslx_emit::emit(&result.tree, &result.symbols, EmitOptions { minify: !options.keep_whitespace });
    Some(EntryOutput { name: entry_name.to_string(), contents, rename: rename_result })
}

/// spec.md §6's programmatic `compile`: sources in, a log plus one
/// compiled shader per exported entry point (or a single implicit `main`
/// shader) out. Codegen is suppressed entirely when the shared parse
/// finds an error (spec.md §7).
#[tracing::instrument(level = "info", skip_all, fields(units = units.len()))]
pub fn compile(units: &[SourceUnit], options: &CompileOptions, file_access: &mut dyn FileAccess) -> CompileResult {
    let mut sources = SourceSet::new();
    let shared = parse_and_resolve(&mut sources, file_access, units);
    let log_text = shared.log.render(&sources);

    if shared.log.has_errors() {
        return CompileResult { log: log_text, shaders: Vec::new(), renaming: BTreeMap::new() };
    }

    let (entry_names, entries_are_exported) = discover_entry_points(&shared.tree, &shared.symbols);
    if entry_names.is_empty() {
        let mut log = Log::new();
        log.error(shared.tree.get(shared.tree.root.expect("resolve requires a parsed tree")).range, "no entry point found: declare an exported function or a function named 'main'");
        return CompileResult { log: log.render(&sources), shaders: Vec::new(), renaming: BTreeMap::new() };
    }

    let mut shaders = Vec::with_capacity(entry_names.len());
    let mut renaming = BTreeMap::new();
    for entry_name in &entry_names {
        let mut entry_sources = SourceSet::new();
        let Some(output) = compile_entry(&mut entry_sources, file_access, units, entry_name, entries_are_exported, options) else {
            continue;
        };
        for (old, new) in output.rename.attribute_renames.into_iter().chain(output.rename.uniform_renames) {
            renaming.entry(old).or_insert(new);
        }
        shaders.push(CompiledShader { name: output.name, contents: output.contents });
    }

    CompileResult { log: log_text, shaders, renaming }
}

#[cfg(test)]
mod tests {
    use glslx_parse::NullFileAccess;

    use super::*;

    fn run(text: &str) -> CompileResult {
        let units = [SourceUnit::new("<test>", text)];
        let mut access = NullFileAccess;
        compile(&units, &CompileOptions::default(), &mut access)
    }

    #[test]
    fn compiles_an_implicit_main() {
        let result = run("void main() { gl_FragColor = vec4(1.0); }");
        assert_eq!(result.shaders.len(), 1);
        assert!(result.shaders[0].contents.contains("vec4(1.0)"), "got: {}", result.shaders[0].contents);
    }

    #[test]
    fn compiles_two_exported_entry_points_separately() {
        let result = run(
            "void helper() { gl_FragColor = vec4(0.5); }\n\
             export void a() { helper(); }\n\
             export void b() { gl_FragColor = vec4(1.0); }",
        );
        assert_eq!(result.shaders.len(), 2);
        let names: Vec<&str> = result.shaders.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(result.shaders[0].contents.contains("main"));
        assert!(result.shaders[1].contents.contains("main"));
        assert!(!result.shaders[1].contents.contains(".5"), "b's shader should not carry a's dead helper: {}", result.shaders[1].contents);
    }

    #[test]
    fn errors_suppress_codegen_entirely() {
        let result = run("void main() { gl_FragColor = undefined_name; }");
        assert!(result.shaders.is_empty());
        assert!(!result.log.is_empty());
    }

    #[test]
    fn vector_constructor_rejects_mismatched_argument_component_types() {
        let result = run("void main() { bool b = true; int i = 2; gl_FragColor = vec4(b, i, 0.0, 1.0); }");
        assert!(result.shaders.is_empty());
        assert!(!result.log.is_empty());
    }

    #[test]
    fn vector_constructor_still_allows_a_single_scalar_broadcast_across_types() {
        let result = run("void main() { int i = 1; gl_FragColor = vec4(i); }");
        assert_eq!(result.shaders.len(), 1);
    }

    #[test]
    fn extension_auto_enables_on_first_use_with_no_explicit_directive() {
        let result = run("void main() { gl_FragColor = vec4(dFdx(gl_FragCoord.x)); }");
        assert_eq!(result.shaders.len(), 1);
        assert!(result.shaders[0].contents.starts_with("#extension GL_OES_standard_derivatives:enable"), "got: {}", result.shaders[0].contents);
    }
}
