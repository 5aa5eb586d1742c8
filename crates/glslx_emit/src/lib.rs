//! Prints a resolved tree back to GLSL source text (spec.md §4.7): a
//! normal, indented rendering and a minified one that drops every byte of
//! whitespace the lexer doesn't require to keep tokens apart.
//!
//! Modeled on `rustc_ast_pretty`'s precedence-driven paren insertion
//! (`FixupContext` in `pprust/state/expr.rs`): rather than a flag on each
//! node recording whether it was originally parenthesized - the parser
//! never stores one - every expression carries its own operator
//! precedence, and a child is wrapped in parens exactly when that
//! precedence falls below what the surrounding context requires.

mod literal;
mod precedence;
mod printer;

use glslx_ast::{SymbolTable, Tree};

/// `minify: false` renders indented, human-readable GLSL; `minify: true`
/// drops all whitespace not required to separate tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmitOptions {
    pub minify: bool,
}

pub fn emit(tree: &Tree, symbols: &SymbolTable, options: EmitOptions) -> String {
    printer::emit_program(tree, symbols, options.minify)
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};
    use glslx_sema::resolve;

    use super::*;

    fn compile(text: &str) -> (Tree, SymbolTable, glslx_ast::CompilerData) {
        let mut sources = SourceSet::new();
        let id = sources.add("<test>", text);
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        resolve(&mut result.tree, &mut result.symbols, &mut result.data, &mut result.log);
        assert!(!result.log.has_errors(), "unexpected errors: {:?}", result.log);
        (result.tree, result.symbols, result.data)
    }

    fn reparses_without_error(text: &str) {
        let mut sources = SourceSet::new();
        let id = sources.add("<reparse>", text);
        let mut access = NullFileAccess;
        let result = parse(&mut sources, &[id], &mut access);
        assert!(!result.log.has_errors(), "re-parsing emitted output failed: {:?}\noutput was:\n{text}", result.log);
    }

    #[test]
    fn minified_mode_still_keeps_a_decimal_point_on_integral_floats() {
        let (tree, symbols, _data) = compile("void main() { gl_FragColor = vec4(1.0); }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(minified.contains("vec4(1.0)"), "got: {minified}");
        reparses_without_error(&minified);
    }

    #[test]
    fn export_keyword_is_dropped_but_the_declaration_survives() {
        let (tree, symbols, _data) = compile("export void main() { }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(!minified.contains("export"), "got: {minified}");
        assert!(minified.contains("main"));
        reparses_without_error(&minified);
    }

    #[test]
    fn normal_mode_keeps_a_decimal_point_on_integral_floats() {
        let (tree, symbols, _data) = compile("void main() { float x = 1.0; }");
        let pretty = emit(&tree, &symbols, EmitOptions { minify: false });
        assert!(pretty.contains("1.0"), "got: {pretty}");
    }

    #[test]
    fn doubled_unary_minus_keeps_its_separating_space() {
        let (tree, symbols, _data) = compile("void main() { float x = 1.0; float y = -(-x); }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(!minified.contains("--"), "got: {minified}");
        reparses_without_error(&minified);
    }

    #[test]
    fn ternary_embedded_as_a_call_argument_keeps_its_parens() {
        let (tree, symbols, _data) = compile("void main() { float a=1.0,b=2.0,c=3.0; float x = max(a, b < c ? a : b); }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        reparses_without_error(&minified);
    }

    #[test]
    fn parenthesized_sequence_round_trips_through_reparsing() {
        let (tree, symbols, _data) = compile("void main() { float a = 1.0, b = 2.0; float x = (a, b); }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(minified.contains('('), "got: {minified}");
        reparses_without_error(&minified);
    }

    #[test]
    fn for_loop_with_all_clauses_omitted_round_trips() {
        let (tree, symbols, _data) = compile("void main() { for (;;) { break; } }");
        let normal = emit(&tree, &symbols, EmitOptions { minify: false });
        reparses_without_error(&normal);
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        reparses_without_error(&minified);
    }

    #[test]
    fn struct_field_access_keeps_its_source_name_after_renaming() {
        let (mut tree, mut symbols, mut data) =
            compile("struct Light { vec3 position; }; void main() { Light l = Light(vec3(0.0)); float x = l.position.x; }");
        glslx_sema::rewrite(&mut tree, &mut symbols, &mut data, true);
        glslx_sema::rename(&mut symbols);
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(minified.contains(".position"), "got: {minified}");
        reparses_without_error(&minified);
    }

    #[test]
    fn postfix_chain_does_not_grow_spurious_parens() {
        let (tree, symbols, _data) = compile("struct P { vec3 v; }; void main() { P p = P(vec3(1.0)); float x = p.v.x; }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(!minified.contains("(p)"), "got: {minified}");
        reparses_without_error(&minified);
    }

    #[test]
    fn extension_directive_is_newline_terminated_even_when_minified() {
        let (tree, symbols, _data) = compile("#extension GL_OES_standard_derivatives : enable\nvoid main() { }");
        let minified = emit(&tree, &symbols, EmitOptions { minify: true });
        assert!(minified.lines().next().unwrap().starts_with("#extension"));
        reparses_without_error(&minified);
    }
}
