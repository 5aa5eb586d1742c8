use glslx_ast::{FunctionSymbol, NodeId, NodeKind, SymbolKind, SymbolTable, Tree};
use glslx_base::{SourceId, SourceSet};
use serde::Serialize;

use crate::locate::node_at;
use crate::type_text::render_type;

#[derive(Clone, Debug, Serialize)]
pub struct SignatureInfo {
    pub name: String,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub active: bool,
}

/// spec.md §4.8's `SignatureQuery`: "on a call whose target is a name,
/// lists every overload in source order, flags the one the resolver
/// actually picked, and reports which argument the cursor sits in".
pub struct SignatureQuery;

impl SignatureQuery {
    pub fn run(
        tree: &Tree,
        root: NodeId,
        symbols: &SymbolTable,
        sources: &SourceSet,
        source: SourceId,
        line: u32,
        column: u32,
    ) -> Option<(Vec<SignatureInfo>, Option<usize>)> {
        let index = sources.get(source).line_column_to_index(line, column);
        let node = node_at(tree, root, source, index)?;
        let call = enclosing_call(tree, node)?;
        let scope = enclosing_scope(tree, call)?;

        let mut children = tree.children(call);
        let callee = children.next()?;
        if tree.kind(callee) != NodeKind::Name {
            return None;
        }
        let args: Vec<NodeId> = children.collect();
        let name = tree.get(callee).text.clone();
        let active_id = tree.get(callee).symbol;

        let mut overloads: Vec<_> = symbols
            .overloads(scope, &name)
            .into_iter()
            .filter(|&id| {
                matches!(&symbols.get(id).kind, SymbolKind::Function(f) if f.body.is_some() || f.sibling.is_none())
            })
            .collect();
        if overloads.is_empty() {
            return None;
        }
        overloads.sort_by_key(|&id| symbols.get(id).range.start);

        let signatures = overloads
            .iter()
            .map(|&id| {
                let func = symbols.get(id).as_function().unwrap();
                SignatureInfo {
                    name: name.clone(),
                    parameters: render_parameters(func, symbols, tree),
                    return_type: render_type(tree.get(func.return_type_node).resolved_type.as_ref().unwrap_or(&glslx_ast::Type::Error), symbols),
                    active: Some(id) == active_id,
                }
            })
            .collect();

        let active_argument = args.iter().position(|&a| {
            let r = tree.get(a).range;
            r.source == source && r.contains(index)
        });

        Some((signatures, active_argument))
    }
}

fn render_parameters(func: &FunctionSymbol, symbols: &SymbolTable, tree: &Tree) -> Vec<String> {
    func.arguments
        .iter()
        .map(|&a| {
            let var = symbols.get(a).as_variable().unwrap();
            let ty = tree.get(var.type_node).resolved_type.as_ref().unwrap_or(&glslx_ast::Type::Error);
            format!("{} {}", render_type(ty, symbols), symbols.get(a).name)
        })
        .collect()
}

fn enclosing_call(tree: &Tree, mut node: NodeId) -> Option<NodeId> {
    loop {
        if tree.kind(node) == NodeKind::Call {
            return Some(node);
        }
        node = tree.get(node).parent()?;
    }
}

fn enclosing_scope(tree: &Tree, mut node: NodeId) -> Option<glslx_ast::ScopeId> {
    loop {
        if let Some(scope) = tree.get(node).scope {
            return Some(scope);
        }
        node = tree.get(node).parent()?;
    }
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};
    use glslx_sema::resolve;

    use super::*;

    #[test]
    fn signature_help_reports_overloads_and_active_argument() {
        let mut sources = SourceSet::new();
        let id = sources.add(
            "<test>",
            "float f(float a) { return a; } float f(float a, float b) { return a + b; } void main() { float x = f(1.0, 2.0); }",
        );
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);

        let byte = sources.get(id).contents().find("2.0").unwrap() as u32;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let (signatures, active_argument) =
            SignatureQuery::run(&result.tree, result.root, &result.symbols, &sources, id, line, column).unwrap();
        assert_eq!(signatures.len(), 2);
        assert_eq!(active_argument, Some(1));
        assert!(signatures.iter().any(|s| s.active && s.parameters.len() == 2));
    }
}
