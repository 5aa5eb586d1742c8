use glslx_ast::{NodeId, NodeKind, SymbolTable, Tree, Type};
use glslx_base::{SourceId, SourceSet};
use serde::Serialize;

use crate::locate::node_at;
use crate::position::JsonRange;
use crate::type_text::render_type;

/// A vector/matrix member access's swizzle: the member text as written
/// (`"xy"`, `"rgba"`, …) alongside its resolved type, reported separately
/// from `resolved_type` since a swizzle has no backing `Symbol`.
#[derive(Clone, Debug, Serialize)]
pub struct SwizzleInfo {
    pub member: String,
    pub resolved_type: String,
}

/// spec.md §4.8's `SymbolQuery`: "the innermost node whose range touches
/// the index, along with its symbol, resolved type, and (for swizzles)
/// the swizzle name/type". Also serves as the basis for go-to-definition
/// (`definition_range`) and hover tooltips on the glslx_compile facade.
#[derive(Clone, Debug, Serialize)]
pub struct SymbolInfo {
    pub node_range: JsonRange,
    pub symbol_name: Option<String>,
    pub resolved_type: Option<String>,
    pub definition_range: Option<JsonRange>,
    pub swizzle: Option<SwizzleInfo>,
}

pub struct SymbolQuery;

impl SymbolQuery {
    pub fn run(
        tree: &Tree,
        root: NodeId,
        symbols: &SymbolTable,
        sources: &SourceSet,
        source: SourceId,
        line: u32,
        column: u32,
    ) -> Option<SymbolInfo> {
        let index = sources.get(source).line_column_to_index(line, column);
        let node = node_at(tree, root, source, index)?;
        let data = tree.get(node);

        let symbol_name = data.symbol.map(|id| symbols.get(id).name.clone());
        let definition_range = data.symbol.map(|id| JsonRange::from_range(symbols.get(id).range, sources));
        let resolved_type = data.resolved_type.as_ref().map(|t| render_type(t, symbols));
        // `Dot` never carries a `.symbol`, whether it's a swizzle or a
        // struct field access (the field symbol is resolved but attached
        // nowhere on the Dot node itself) — so the two are told apart by
        // the target's own resolved type instead.
        let swizzle = if tree.kind(node) == NodeKind::Dot {
            let target = tree.children(node).next();
            let target_is_struct =
                target.is_some_and(|t| matches!(tree.get(t).resolved_type, Some(Type::Struct(_))));
            if target_is_struct {
                None
            } else {
                data.resolved_type
                    .as_ref()
                    .map(|t| SwizzleInfo { member: data.text.clone(), resolved_type: render_type(t, symbols) })
            }
        } else {
            None
        };

        Some(SymbolInfo {
            node_range: JsonRange::from_range(data.range, sources),
            symbol_name,
            resolved_type,
            definition_range,
            swizzle,
        })
    }
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};
    use glslx_sema::resolve;

    use super::*;

    fn compile(text: &str) -> (Tree, SymbolTable, NodeId, SourceSet, SourceId) {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", text);
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        (result.tree, result.symbols, result.root, sources, id)
    }

    #[test]
    fn hovering_a_name_reports_its_declaration_range() {
        let (tree, symbols, root, sources, id) =
            compile("void main() { float abc = 1.0; float y = abc; }");
        let byte = sources.get(id).contents().rfind("abc").unwrap() as u32;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let info = SymbolQuery::run(&tree, root, &symbols, &sources, id, line, column).unwrap();
        assert_eq!(info.symbol_name.as_deref(), Some("abc"));
        assert_eq!(info.resolved_type.as_deref(), Some("float"));
        assert!(info.definition_range.is_some());
    }

    #[test]
    fn hovering_a_swizzle_reports_its_member_and_type() {
        let (tree, symbols, root, sources, id) =
            compile("void main() { vec4 v = vec4(1.0); float x = v.xy.x; }");
        let byte = sources.get(id).contents().find(".xy").unwrap() as u32 + 1;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let info = SymbolQuery::run(&tree, root, &symbols, &sources, id, line, column).unwrap();
        let swizzle = info.swizzle.expect("dot access on a vector is a swizzle");
        assert_eq!(swizzle.member, "xy");
        assert_eq!(swizzle.resolved_type, "vec2");
    }

    #[test]
    fn hovering_a_struct_field_access_is_not_reported_as_a_swizzle() {
        let (tree, symbols, root, sources, id) = compile(
            "struct Light { vec3 position; }; void main() { Light l = Light(vec3(0.0)); float x = l.position.x; }",
        );
        let byte = sources.get(id).contents().find(".position").unwrap() as u32 + 1;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let info = SymbolQuery::run(&tree, root, &symbols, &sources, id, line, column).unwrap();
        assert!(info.swizzle.is_none());
        assert_eq!(info.symbol_name.as_deref(), None);
    }
}
