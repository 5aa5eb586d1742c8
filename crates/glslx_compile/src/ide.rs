use std::collections::HashMap;

use glslx_ast::{NodeId, SymbolTable, Tree};
use glslx_base::{SourceId, SourceSet};
use glslx_ide::{CompletionItem, CompletionQuery, DocumentSymbol, JsonRange, RenameQuery, SignatureInfo, SignatureQuery, SymbolInfo, SymbolQuery, SymbolsQuery};
use glslx_parse::FileAccess;
use glslx_sema::resolve;

use crate::builtins::{self, API_SOURCE, API_SOURCE_NAME};
use crate::options::SourceUnit;

/// spec.md §6's `compileIDE`: parses and resolves `units` once (no
/// rewriting, renaming, or emitting - an editor wants the tree as the
/// user wrote it) and exposes the six query types as methods rather than
/// standalone closures, since each closure spec.md describes would need
/// to borrow this session's tree and symbols for as long as the caller
/// holds it.
pub struct IdeSession {
    tree: Tree,
    symbols: SymbolTable,
    sources: SourceSet,
    root: NodeId,
    source_ids: HashMap<String, SourceId>,
    pub log: String,
}

impl IdeSession {
    fn source_id(&self, name: &str) -> Option<SourceId> {
        self.source_ids.get(name).copied()
    }

    /// Every declared symbol with a zero use count, imported/exported
    /// ones excepted (spec.md §6, "list of unused symbols").
    pub fn unused_symbol_names(&self) -> Vec<String> {
        self.symbols.symbols_iter().filter(|s| s.use_count == 0 && !s.is_exported() && !s.is_imported()).map(|s| s.name.clone()).collect()
    }

    pub fn tooltip_query(&self, source: &str, line: u32, column: u32) -> Option<SymbolInfo> {
        let source = self.source_id(source)?;
        SymbolQuery::run(&self.tree, self.root, &self.symbols, &self.sources, source, line, column)
    }

    pub fn definition_query(&self, source: &str, line: u32, column: u32) -> Option<JsonRange> {
        self.tooltip_query(source, line, column)?.definition_range
    }

    pub fn symbols_query(&self, source: &str) -> Vec<DocumentSymbol> {
        let Some(source) = self.source_id(source) else { return Vec::new() };
        SymbolsQuery::run(&self.tree, self.root, &self.symbols, &self.sources, source)
    }

    pub fn rename_query(&self, source: &str, line: u32, column: u32) -> Vec<JsonRange> {
        let Some(source) = self.source_id(source) else { return Vec::new() };
        RenameQuery::run(&self.tree, self.root, &self.symbols, &self.sources, source, line, column)
    }

    pub fn completion_query(&self, source: &str, line: u32, column: u32) -> Vec<CompletionItem> {
        let Some(source) = self.source_id(source) else { return Vec::new() };
        CompletionQuery::run(&self.tree, self.root, &self.symbols, &self.sources, source, line, column)
    }

    pub fn signature_query(&self, source: &str, line: u32, column: u32) -> Option<(Vec<SignatureInfo>, Option<usize>)> {
        let source = self.source_id(source)?;
        SignatureQuery::run(&self.tree, self.root, &self.symbols, &self.sources, source, line, column)
    }
}

pub fn compile_ide(units: &[SourceUnit], file_access: &mut dyn FileAccess) -> IdeSession {
    let mut sources = SourceSet::new();
    let api_id = sources.add(API_SOURCE_NAME, API_SOURCE);
    let mut source_ids = HashMap::new();
    let mut entries = vec![api_id];
    for unit in units {
        let id = sources.add(unit.name.clone(), unit.contents.clone());
        source_ids.insert(unit.name.clone(), id);
        entries.push(id);
    }

    let mut result = glslx_parse::parse(&mut sources, &entries, file_access);
    builtins::tag_extension_gated_builtins(&mut result.symbols, result.global_scope);
    resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
    let log = result.log.render(&sources);
    let root = result.tree.root.expect("resolve requires a parsed tree");

    IdeSession { tree: result.tree, symbols: result.symbols, sources, root, source_ids, log }
}

#[cfg(test)]
mod tests {
    use glslx_parse::NullFileAccess;

    use super::*;

    #[test]
    fn reports_an_unused_local_and_answers_a_tooltip_query() {
        let units = [SourceUnit::new("<test>", "void main() { float unused = 1.0; gl_FragColor = vec4(0.0); }")];
        let mut access = NullFileAccess;
        let session = compile_ide(&units, &mut access);
        assert!(session.unused_symbol_names().contains(&"unused".to_string()));
        let symbols = session.symbols_query("<test>");
        assert!(symbols.iter().any(|s| s.name == "main"));
    }
}
