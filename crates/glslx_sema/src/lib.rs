mod fold;
mod rename;
mod resolve;
mod rewrite;

pub use fold::fold;
pub use rename::{rename, RenameResult};
pub use resolve::resolve;
pub use rewrite::rewrite;

#[cfg(test)]
mod tests {
    use glslx_ast::{NodeKind, Type, BaseType};
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess, ParseResult};

    use super::*;

    fn compile(text: &str) -> ParseResult {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", text);
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        result
    }

    #[test]
    fn resolves_global_variable_type() {
        let result = compile("uniform vec3 color;");
        assert!(!result.log.has_errors());
        let group = result.tree.children(result.root).next().unwrap();
        let var = result.tree.children(group).next().unwrap();
        assert_eq!(result.tree.get(var).resolved_type, Some(Type::Base(BaseType::Vec3)));
    }

    #[test]
    fn rejects_void_variable() {
        let result = compile("void x;");
        assert!(result.log.has_errors());
    }

    #[test]
    fn undeclared_identifier_reports_error() {
        let result = compile("void main() { float x = y; }");
        assert!(result.log.has_errors());
    }

    #[test]
    fn function_call_resolves_to_return_type() {
        let result = compile("float square(float x) { return x * x; } void main() { float y = square(2.0); }");
        assert!(!result.log.has_errors());
    }

    #[test]
    fn missing_return_is_an_error() {
        let result = compile("float f() { }");
        assert!(result.log.has_errors());
    }

    #[test]
    fn returning_from_every_branch_is_not_an_error() {
        let result = compile("float f(bool b) { if (b) { return 1.0; } else { return 2.0; } }");
        assert!(!result.log.has_errors());
    }

    #[test]
    fn swizzle_with_mismatched_sets_is_an_error() {
        let result = compile("void main() { vec4 v = vec4(1.0); float x = v.xg; }");
        assert!(result.log.has_errors());
    }

    #[test]
    fn assigning_to_a_const_is_an_error() {
        let result = compile("void main() { const float x = 1.0; x = 2.0; }");
        assert!(result.log.has_errors());
    }

    #[test]
    fn infinite_while_true_with_no_break_does_not_require_a_return_after() {
        let result = compile("float f() { while (true) { } }");
        assert!(!result.log.has_errors());
    }

    #[test]
    fn struct_field_access_resolves() {
        let result = compile(
            "struct Light { vec3 position; }; void main() { Light l = Light(vec3(0.0)); float x = l.position.x; }",
        );
        assert!(!result.log.has_errors());
    }

    #[test]
    fn explicit_extension_directive_does_not_error() {
        let result = compile("#extension GL_OES_standard_derivatives : enable\nvoid main() { }");
        assert!(!result.log.has_errors());
    }
}
