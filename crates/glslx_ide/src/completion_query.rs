use glslx_ast::{BaseType, NodeId, NodeKind, SymbolKind, SymbolTable, Tree, Type};
use glslx_base::{SourceId, SourceSet};
use serde::Serialize;

use crate::locate::node_at;

const KEYWORDS: &[&str] = &[
    "if", "else", "while", "do", "for", "break", "continue", "discard", "return", "struct", "precision", "const",
    "uniform", "attribute", "varying", "in", "out", "inout", "highp", "mediump", "lowp", "true", "false", "export",
    "import",
];

const BUILTIN_TYPES: &[BaseType] = &[
    BaseType::Void,
    BaseType::Bool,
    BaseType::Int,
    BaseType::Float,
    BaseType::Vec2,
    BaseType::Vec3,
    BaseType::Vec4,
    BaseType::Bvec2,
    BaseType::Bvec3,
    BaseType::Bvec4,
    BaseType::Ivec2,
    BaseType::Ivec3,
    BaseType::Ivec4,
    BaseType::Mat2,
    BaseType::Mat3,
    BaseType::Mat4,
    BaseType::Sampler2D,
    BaseType::SamplerCube,
];

/// Swizzle completions only ever use `xyzw`: the component sets are
/// interchangeable aliases of the same positions, so offering all three
/// would just triple the list for no semantic gain.
const SWIZZLE_LETTERS: &str = "xyzw";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Keyword,
    Type,
    Variable,
    Function,
    Struct,
    Swizzle,
    Field,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompletionItem {
    pub name: String,
    pub kind: CompletionKind,
}

pub struct CompletionQuery;

impl CompletionQuery {
    pub fn run(
        tree: &Tree,
        root: NodeId,
        symbols: &SymbolTable,
        sources: &SourceSet,
        source: SourceId,
        line: u32,
        column: u32,
    ) -> Vec<CompletionItem> {
        let index = sources.get(source).line_column_to_index(line, column);

        if let Some(node) = node_at(tree, root, source, index) {
            if tree.kind(node) == NodeKind::Dot {
                if let Some(member_completions) = Self::member_completions(tree, node, symbols) {
                    return member_completions;
                }
            }
        }

        let mut out: Vec<CompletionItem> =
            KEYWORDS.iter().map(|&k| CompletionItem { name: k.to_string(), kind: CompletionKind::Keyword }).collect();
        out.extend(BUILTIN_TYPES.iter().map(|b| CompletionItem { name: b.keyword().to_string(), kind: CompletionKind::Type }));

        let mut scope = node_at(tree, root, source, index).and_then(|n| enclosing_scope(tree, n));
        while let Some(s) = scope {
            for (name, id) in symbols.scope(s).names() {
                let kind = match &symbols.get(id).kind {
                    SymbolKind::Variable(_) => CompletionKind::Variable,
                    SymbolKind::Function(_) => CompletionKind::Function,
                    SymbolKind::Struct(_) => CompletionKind::Struct,
                };
                out.push(CompletionItem { name: name.to_string(), kind });
            }
            scope = symbols.scope(s).parent;
        }
        out
    }

    fn member_completions(tree: &Tree, dot: NodeId, symbols: &SymbolTable) -> Option<Vec<CompletionItem>> {
        let target = tree.children(dot).next()?;
        let target_type = tree.get(target).resolved_type.clone()?;
        match &target_type {
            Type::Struct(id) => {
                let fields = symbols.get(*id).as_struct()?.fields.clone();
                Some(
                    fields
                        .into_iter()
                        .map(|f| CompletionItem { name: symbols.get(f).name.clone(), kind: CompletionKind::Field })
                        .collect(),
                )
            }
            _ => {
                let count = target_type.component_count()? as usize;
                Some(swizzle_permutations(count.min(4)))
            }
        }
    }
}

/// Every non-empty string of length 1..=`max_len` over the first `max_len`
/// letters of `xyzw`.
fn swizzle_permutations(max_len: usize) -> Vec<CompletionItem> {
    let letters: Vec<char> = SWIZZLE_LETTERS.chars().take(max_len).collect();
    let mut out = Vec::new();
    let mut stack: Vec<String> = letters.iter().map(|c| c.to_string()).collect();
    out.extend(stack.iter().cloned());
    for _ in 1..max_len {
        let mut next = Vec::new();
        for s in &stack {
            for &c in &letters {
                next.push(format!("{s}{c}"));
            }
        }
        out.extend(next.iter().cloned());
        stack = next;
    }
    out.into_iter().map(|name| CompletionItem { name, kind: CompletionKind::Swizzle }).collect()
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
    fn completion_includes_keywords_types_and_locals() {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", "void main() { float abc = 1.0; abc ; }");
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        let byte = sources.get(id).contents().rfind("abc ;").unwrap() as u32;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let items = CompletionQuery::run(&result.tree, result.root, &result.symbols, &sources, id, line, column);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"if"));
        assert!(names.contains(&"vec4"));
        assert!(names.contains(&"abc"));
        assert!(names.contains(&"main"));
    }

    #[test]
    fn completion_after_dot_on_a_vector_lists_swizzles() {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", "void main() { vec2 v = vec2(1.0); float x = v.x; }");
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        let byte = sources.get(id).contents().find(".x").unwrap() as u32 + 1;
        let (line, column) = sources.get(id).index_to_line_column(byte);
        let items = CompletionQuery::run(&result.tree, result.root, &result.symbols, &sources, id, line, column);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert!(names.contains(&"x"));
        assert!(names.contains(&"xy"));
        assert!(!names.contains(&"xyz"));
    }
}
