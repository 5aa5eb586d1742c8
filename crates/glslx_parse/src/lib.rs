mod cursor;
mod expr;
mod include;
mod parser;
mod precedence;

pub use include::{FileAccess, IncludeRecord, NullFileAccess};
pub use parser::{parse, ParseResult};

#[cfg(test)]
mod tests {
    use glslx_ast::{NodeKind, SymbolKind};
    use glslx_base::SourceSet;

    use super::*;

    fn parse_source(text: &str) -> ParseResult {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", text);
        let mut access = NullFileAccess;
        parse(&mut sources, &[id], &mut access)
    }

    #[test]
    fn parses_global_variable_declaration() {
        let result = parse_source("uniform vec3 color;");
        assert!(!result.log.has_errors());
        let children: Vec<_> = result.tree.children(result.root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(result.tree.kind(children[0]), NodeKind::Variables);
    }

    #[test]
    fn parses_function_with_body() {
        let result = parse_source("float square(float x) { return x * x; }");
        assert!(!result.log.has_errors());
        let children: Vec<_> = result.tree.children(result.root).collect();
        assert_eq!(children.len(), 1);
        let func = children[0];
        assert_eq!(result.tree.kind(func), NodeKind::Function);
        let symbol = result.tree.get(func).symbol.expect("function node has a symbol");
        assert!(matches!(result.symbols.get(symbol).kind, SymbolKind::Function(_)));
    }

    #[test]
    fn pairs_forward_declaration_with_definition() {
        let result = parse_source("float square(float x); float square(float x) { return x * x; }");
        assert!(!result.log.has_errors());
        let children: Vec<_> = result.tree.children(result.root).collect();
        assert_eq!(children.len(), 2);
        let forward_id = result.tree.get(children[0]).symbol.unwrap();
        let def_id = result.tree.get(children[1]).symbol.unwrap();
        let forward = result.symbols.get(forward_id).as_function().unwrap();
        assert_eq!(forward.sibling, Some(def_id));
    }

    #[test]
    fn parses_struct_with_fields() {
        let result = parse_source("struct Light { vec3 position; float intensity; };");
        assert!(!result.log.has_errors());
        let children: Vec<_> = result.tree.children(result.root).collect();
        assert_eq!(result.tree.kind(children[0]), NodeKind::Struct);
        let symbol = result.tree.get(children[0]).symbol.unwrap();
        let s = result.symbols.get(symbol).as_struct().unwrap();
        assert_eq!(s.fields.len(), 2);
    }

    #[test]
    fn ternary_is_right_associative_and_binds_below_assign() {
        let result = parse_source("void main() { float x = a ? b : c ? d : e; }");
        assert!(!result.log.has_errors());
    }

    #[test]
    fn assignment_is_right_associative() {
        let result = parse_source("void main() { a = b = c; }");
        assert!(!result.log.has_errors());
        let func = result.tree.children(result.root).next().unwrap();
        let body = result.tree.children(func).next().unwrap();
        let stmt = result.tree.children(body).next().unwrap();
        let assign = result.tree.children(stmt).next().unwrap();
        assert_eq!(result.tree.kind(assign), NodeKind::Assign);
        let rhs = result.tree.nth_child(assign, 1).unwrap();
        assert_eq!(result.tree.kind(rhs), NodeKind::Assign);
    }

    #[test]
    fn for_loop_omitted_clauses_use_sentinels() {
        let result = parse_source("void main() { for (;;) { } }");
        assert!(!result.log.has_errors());
        let func = result.tree.children(result.root).next().unwrap();
        let body = result.tree.children(func).next().unwrap();
        let for_node = result.tree.children(body).next().unwrap();
        assert_eq!(result.tree.kind(for_node), NodeKind::For);
        let setup = result.tree.nth_child(for_node, 0).unwrap();
        let test = result.tree.nth_child(for_node, 1).unwrap();
        let update = result.tree.nth_child(for_node, 2).unwrap();
        assert_eq!(result.tree.kind(setup), NodeKind::Block);
        assert!(!result.tree.get(setup).has_children());
        assert_eq!(result.tree.kind(test), NodeKind::Bool);
        assert_eq!(result.tree.get(test).literal_int, 1);
        assert_eq!(result.tree.kind(update), NodeKind::Sequence);
        assert!(!result.tree.get(update).has_children());
    }

    #[test]
    fn only_first_version_directive_survives() {
        let result = parse_source("#version 100\nvoid main() {}\n#version 100\n");
        let versions: Vec<_> =
            result.tree.children(result.root).filter(|&c| result.tree.kind(c) == NodeKind::Version).collect();
        assert_eq!(versions.len(), 1);
    }

    #[test]
    fn unknown_include_reports_error() {
        let result = parse_source("#include \"missing.glsl\"\n");
        assert!(result.log.has_errors());
    }

    #[test]
    fn unexpected_token_recovers_and_continues() {
        let result = parse_source("@ float x;");
        assert!(result.log.has_errors());
        let children: Vec<_> = result.tree.children(result.root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(result.tree.kind(children[0]), NodeKind::Variables);
    }
}
