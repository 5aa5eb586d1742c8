use glslx_ast::{NodeId, SymbolId, SymbolTable, Tree};
use glslx_base::{SourceId, SourceSet};

use crate::locate::node_at;
use crate::position::JsonRange;

fn collect_references(tree: &Tree, node: NodeId, target: SymbolId, out: &mut Vec<NodeId>) {
    if tree.get(node).symbol == Some(target) {
        out.push(node);
    }
    for child in tree.children(node) {
        collect_references(tree, child, target, out);
    }
}

/// spec.md §4.8's `RenameQuery`: "collects every range referencing the
/// symbol discovered at the position (including the symbol's defining
/// range and its forward-declaration sibling if any); sorts and
/// deduplicates overlapping ranges".
pub struct RenameQuery;

impl RenameQuery {
    pub fn run(
        tree: &Tree,
        root: NodeId,
        symbols: &SymbolTable,
        sources: &SourceSet,
        source: SourceId,
        line: u32,
        column: u32,
    ) -> Vec<JsonRange> {
        let index = sources.get(source).line_column_to_index(line, column);
        let Some(node) = node_at(tree, root, source, index) else { return Vec::new() };
        let Some(target) = tree.get(node).symbol else { return Vec::new() };

        let mut hits = Vec::new();
        collect_references(tree, root, target, &mut hits);

        let mut ranges: Vec<(SourceId, u32, u32)> =
            hits.iter().map(|&n| tree.get(n).range).map(|r| (r.source, r.start, r.end)).collect();
        ranges.push({
            let r = symbols.get(target).range;
            (r.source, r.start, r.end)
        });
        if let Some(sibling) = symbols.get(target).as_function().and_then(|f| f.sibling) {
            let r = symbols.get(sibling).range;
            ranges.push((r.source, r.start, r.end));
        }

        ranges.sort_by_key(|&(src, start, end)| (src, start, end));
        ranges.dedup();

        ranges
            .into_iter()
            .map(|(src, start, end)| JsonRange::from_range(glslx_base::Range::new(src, start, end), sources))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};
    use glslx_sema::resolve;

    use super::*;

    #[test]
    fn renaming_a_local_finds_declaration_and_every_use() {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", "void main() { float abc = 1.0; float y = abc + abc; }");
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);

        let byte = sources.get(id).contents().find("abc").unwrap() as u32;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let ranges = RenameQuery::run(&result.tree, result.root, &result.symbols, &sources, id, line, column);
        // declaration + two uses = 3 distinct ranges.
        assert_eq!(ranges.len(), 3);
    }
}
