use std::fmt::Write as _;

use glslx_compile::CompileResult;

use crate::cli::OutputFormat;

fn js_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// spec.md §6's name transform: underscores at lower→upper-case
/// transitions, then the whole name uppercased.
fn transform_name(name: &str) -> String {
    let mut out = String::new();
    let mut prev_was_lower = false;
    for c in name.chars() {
        if prev_was_lower && c.is_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
        prev_was_lower = c.is_lowercase();
    }
    out
}

struct ConstantStyle {
    prefix: &'static str,
    rust_typed: bool,
    terminator: &'static str,
}

fn style_for(format: OutputFormat) -> ConstantStyle {
    match format {
        OutputFormat::Js => ConstantStyle { prefix: "export const", rust_typed: false, terminator: ";" },
        OutputFormat::Cpp => ConstantStyle { prefix: "static const char *", rust_typed: false, terminator: ";" },
        OutputFormat::Skew => ConstantStyle { prefix: "const", rust_typed: false, terminator: "" },
        OutputFormat::Rust => ConstantStyle { prefix: "pub static", rust_typed: true, terminator: ";" },
        OutputFormat::Json => unreachable!("json is rendered by render_json"),
    }
}

fn write_constant(out: &mut String, style: &ConstantStyle, name: &str, value: &str) {
    if style.rust_typed {
        let _ = writeln!(out, "{} {}: &str = {}{}", style.prefix, name, js_quote(value), style.terminator);
    } else {
        let _ = writeln!(out, "{} {} = {}{}", style.prefix, name, js_quote(value), style.terminator);
    }
}

/// Renders a [`CompileResult`] in `format` (spec.md §6, "Output
/// formats"). `json` is the only format with a stable programmatic
/// shape; the rest are source-embeddable constant declarations.
pub fn render(result: &CompileResult, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return render_json(result);
    }

    let style = style_for(format);
    let mut out = String::new();
    if format == OutputFormat::Cpp {
        out.push_str("#ifndef GLSLX_STRINGS_H\n#define GLSLX_STRINGS_H\n\n");
    }

    for shader in &result.shaders {
        write_constant(&mut out, &style, &format!("GLSLX_SOURCE_{}", transform_name(&shader.name)), &shader.contents);
    }
    for (old_name, new_name) in &result.renaming {
        write_constant(&mut out, &style, &format!("GLSLX_NAME_{}", transform_name(old_name)), new_name);
    }

    if format == OutputFormat::Cpp {
        out.push_str("\n#endif\n");
    }
    out
}

fn render_json(result: &CompileResult) -> String {
    #[derive(serde::Serialize)]
    struct JsonShader<'a> {
        name: &'a str,
        contents: &'a str,
    }
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        shaders: Vec<JsonShader<'a>>,
        renaming: &'a std::collections::BTreeMap<String, String>,
    }

    let payload = JsonOutput {
        shaders: result.shaders.iter().map(|s| JsonShader { name: &s.name, contents: &s.contents }).collect(),
        renaming: &result.renaming,
    };
    let mut text = serde_json::to_string(&payload).unwrap_or_default();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_camel_case_into_a_screaming_snake_case_suffix() {
        assert_eq!(transform_name("myShader"), "MY_SHADER");
        assert_eq!(transform_name("a"), "A");
    }

    #[test]
    fn js_quoting_escapes_embedded_quotes_and_newlines() {
        assert_eq!(js_quote("a\"b\nc"), "\"a\\\"b\\nc\"");
    }
}
