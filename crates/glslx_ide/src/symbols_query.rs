use glslx_ast::{NodeId, NodeKind, SymbolTable, Tree};
use glslx_base::{SourceId, SourceSet};
use serde::Serialize;

use crate::position::JsonRange;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolDisplayKind {
    Function,
    Struct,
    Variable,
}

#[derive(Clone, Debug, Serialize)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolDisplayKind,
    pub range: JsonRange,
}

/// spec.md §4.8's `SymbolsQuery`: "enumerates top-level declared symbols
/// in a source". Only nodes whose own range lies in `source` are
/// reported, so `#include`-pulled declarations are attributed to the file
/// that actually declares them, not the one that included it.
pub struct SymbolsQuery;

impl SymbolsQuery {
    pub fn run(tree: &Tree, root: NodeId, symbols: &SymbolTable, sources: &SourceSet, source: SourceId) -> Vec<DocumentSymbol> {
        let mut out = Vec::new();
        for child in tree.children(root) {
            match tree.kind(child) {
                NodeKind::Function => {
                    if let Some(id) = tree.get(child).symbol {
                        if symbols.get(id).range.source == source {
                            out.push(DocumentSymbol {
                                name: symbols.get(id).name.clone(),
                                kind: SymbolDisplayKind::Function,
                                range: JsonRange::from_range(tree.get(child).range, sources),
                            });
                        }
                    }
                }
                NodeKind::Struct => {
                    if let Some(id) = tree.get(child).symbol {
                        if symbols.get(id).range.source == source {
                            out.push(DocumentSymbol {
                                name: symbols.get(id).name.clone(),
                                kind: SymbolDisplayKind::Struct,
                                range: JsonRange::from_range(tree.get(child).range, sources),
                            });
                        }
                    }
                }
                NodeKind::Variables => {
                    for var in tree.children(child) {
                        if let Some(id) = tree.get(var).symbol {
                            if symbols.get(id).range.source == source {
                                out.push(DocumentSymbol {
                                    name: symbols.get(id).name.clone(),
                                    kind: SymbolDisplayKind::Variable,
                                    range: JsonRange::from_range(tree.get(var).range, sources),
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};
    use glslx_sema::resolve;

    use super::*;

    #[test]
    fn enumerates_top_level_functions_structs_and_globals() {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", "struct Light { vec3 position; }; uniform vec3 color; void main() { }");
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        let syms = SymbolsQuery::run(&result.tree, result.root, &result.symbols, &sources, id);
        let names: Vec<&str> = syms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Light", "color", "main"]);
    }
}
