use glslx_ast::{ScopeId, SymbolTable};

/// The name every compile unit sees the built-in API source under
/// (spec.md §6, "Built-in API source").
pub const API_SOURCE_NAME: &str = "<api>";

/// GLSL ES 1.0's built-in variables, functions, and (further below)
/// extension-gated intrinsics, as plain `import`ed declarations —
/// parsed into the front of every compile's shared tree exactly like a
/// real source unit (see [`crate::compile`]).
pub const API_SOURCE: &str = include_str!("api.glsl");

/// Built-in functions whose use should auto-enable an extension
/// (spec.md §8 invariant 7) the first time user code references them.
/// `api.glsl` deliberately does not declare these inside a
/// `#extension NAME : kw { … }` gated block: the parser's directive
/// handling unconditionally records whatever behavior keyword is
/// written into the compile-wide extension map as a side effect, and no
/// accepted keyword means "leave this unset" — exactly the state
/// `glslx_sema::resolve`'s auto-enable check needs to find the map in.
/// Tagging the symbols directly after parsing sidesteps that keyword
/// entirely.
const EXTENSION_GATED: &[(&str, &str)] = &[
    ("dFdx", "GL_OES_standard_derivatives"),
    ("dFdy", "GL_OES_standard_derivatives"),
    ("fwidth", "GL_OES_standard_derivatives"),
];

/// Sets `required_extension` on every overload of the extension-gated
/// built-ins. Must run once per parse (fresh `SymbolTable` per
/// per-entry-point re-parse), before resolving.
pub fn tag_extension_gated_builtins(symbols: &mut SymbolTable, global_scope: ScopeId) {
    for &(name, extension) in EXTENSION_GATED {
        for id in symbols.overloads(global_scope, name) {
            symbols.get_mut(id).required_extension = Some(extension.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use glslx_base::SourceSet;
    use glslx_parse::{parse, NullFileAccess};

    use super::*;

    #[test]
    fn api_source_parses_without_errors() {
        let mut sources = SourceSet::new();
        let id = sources.add(API_SOURCE_NAME, API_SOURCE);
        let mut access = NullFileAccess;
        let result = parse(&mut sources, &[id], &mut access);
        assert!(!result.log.has_errors(), "api.glsl failed to parse: {:?}", result.log);
    }

    #[test]
    fn extension_gated_builtins_are_found_and_tagged() {
        let mut sources = SourceSet::new();
        let id = sources.add(API_SOURCE_NAME, API_SOURCE);
        let mut access = NullFileAccess;
        let mut result = parse(&mut sources, &[id], &mut access);
        tag_extension_gated_builtins(&mut result.symbols, result.global_scope);
        let overloads = result.symbols.overloads(result.global_scope, "dFdx");
        assert!(!overloads.is_empty());
        for id in overloads {
            assert_eq!(result.symbols.get(id).required_extension.as_deref(), Some("GL_OES_standard_derivatives"));
        }
    }
}
