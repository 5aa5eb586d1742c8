use glslx_ast::{NodeId, Tree};
use glslx_base::SourceId;

/// Converts a `{source, line, column}` IDE message into a byte index,
/// then walks `tree` depth-first to find the innermost node whose range
/// touches it (spec.md §4.8: "each query walks the tree along the token
/// range containing a given `(source, index)` position").
///
/// Off-tree nodes (a function's return-type/argument nodes, which live
/// only in the `FunctionSymbol`, never as tree children — see
/// `glslx_emit`'s own notes on tree shape) are not reachable this way;
/// queries that land on one of those simply find nothing, which is no
/// worse than spec.md §9's "partial results" guidance for unresolved
/// positions.
pub fn node_at(tree: &Tree, root: NodeId, source: SourceId, index: u32) -> Option<NodeId> {
    for child in tree.children(root) {
        if let Some(found) = node_at(tree, child, source, index) {
            return Some(found);
        }
    }
    let data = tree.get(root);
    if data.range.source == source && data.range.contains(index) {
        Some(root)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use glslx_ast::NodeKind;
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};

    use super::*;

    #[test]
    fn finds_the_innermost_name_node() {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", "void main() { float x = 1.0; }");
        let mut access = NullFileAccess;
        let result = parse(&mut sources, &[id], &mut access);
        let index = sources.get(id).contents().find("1.0").unwrap() as u32;
        let found = node_at(&result.tree, result.root, id, index).expect("should find the float literal");
        assert_eq!(result.tree.kind(found), NodeKind::Float);
    }
}
