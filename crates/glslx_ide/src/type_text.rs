use glslx_ast::{SymbolTable, Type};

/// Renders a resolved [`Type`] back to GLSL source text, for query results
/// that report a type to the editor as a plain string rather than a typed
/// payload (hover tooltips, signature help).
pub fn render_type(ty: &Type, symbols: &SymbolTable) -> String {
    match ty {
        Type::Base(b) => b.keyword().to_string(),
        Type::Struct(id) => symbols.get(*id).name.clone(),
        Type::Array(elem, 0) => format!("{}[]", render_type(elem, symbols)),
        Type::Array(elem, len) => format!("{}[{len}]", render_type(elem, symbols)),
        Type::Error => "<error>".to_string(),
    }
}
