use glslx_base::{Log, SourceSet};
use glslx_lexer::{tokenize, Purpose, TokenKind};

use crate::options::{FormatOptions, TrailingNewline};
use crate::spelling::punctuation_spelling;

fn is_ident_class(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether gluing two adjacent token spellings with no space between them
/// would re-lex as something other than the original two tokens. Mirrors
/// `glslx_emit::literal::needs_space`'s glue-prevention rule, duplicated
/// here since the two crates don't otherwise share a dependency.
fn needs_space(last: char, first: char) -> bool {
    if is_ident_class(last) && is_ident_class(first) {
        return true;
    }
    if (last == '+' && first == '+') || (last == '-' && first == '-') {
        return true;
    }
    if last == '/' && (first == '/' || first == '*') {
        return true;
    }
    false
}

fn spelling_of(kind: TokenKind, text: &str) -> String {
    if let Some(s) = punctuation_spelling(kind) {
        s.to_string()
    } else {
        text.to_string()
    }
}

/// Reformats `text`: re-indents by brace depth and normalizes horizontal
/// whitespace to a single space, while leaving the author's own choice of
/// *where* to break lines alone — a blank line between two tokens is kept
/// (collapsed to exactly one), any other run of newlines becomes one, and
/// tokens written on the same line stay on the same line. This is
/// token-driven, not tree-driven: it runs over the raw lexical stream
/// (comments included, via [`Purpose::Format`]) rather than a parsed and
/// resolved tree, so it works on source that doesn't type check or even
/// parse cleanly.
#[tracing::instrument(level = "trace", skip_all, fields(len = text.len()))]
pub fn format(text: &str, options: &FormatOptions) -> String {
    let mut sources = SourceSet::new();
    let id = sources.add("<format>", text);
    let mut log = Log::new();
    let tokens = tokenize(id, sources.get(id), Purpose::Format, &mut log);

    let mut out = String::new();
    let mut depth: i32 = 0;
    let mut prev_end: Option<u32> = None;
    let mut force_break = false;

    for tok in &tokens {
        if tok.kind == TokenKind::EndOfFile {
            break;
        }
        let spelling = spelling_of(tok.kind, &tok.text);

        if tok.kind == TokenKind::RightBrace {
            depth -= 1;
        }

        if let Some(end) = prev_end {
            let gap = &text[end as usize..tok.range.start as usize];
            let newline_count = gap.bytes().filter(|&b| b == b'\n').count();
            if force_break || newline_count >= 1 {
                let breaks = if newline_count >= 2 { 2 } else { 1 };
                for _ in 0..breaks {
                    out.push_str(&options.newline);
                }
                for _ in 0..depth.max(0) {
                    out.push_str(&options.indent);
                }
            } else if !gap.is_empty() {
                out.push(' ');
            } else if let (Some(last), Some(first)) = (out.chars().next_back(), spelling.chars().next()) {
                if needs_space(last, first) {
                    out.push(' ');
                }
            }
        }

        out.push_str(&spelling);

        if tok.kind == TokenKind::LeftBrace {
            depth += 1;
        }
        force_break = tok.kind == TokenKind::LineComment;
        prev_end = Some(tok.range.end);
    }

    apply_trailing_newline(out, options)
}

fn apply_trailing_newline(mut out: String, options: &FormatOptions) -> String {
    match options.trailing_newline {
        TrailingNewline::Preserve => out,
        TrailingNewline::Remove => {
            while out.ends_with(options.newline.as_str()) {
                out.truncate(out.len() - options.newline.len());
            }
            out
        }
        TrailingNewline::Insert => {
            while out.ends_with(options.newline.as_str()) {
                out.truncate(out.len() - options.newline.len());
            }
            out.push_str(&options.newline);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(src: &str) -> String {
        format(src, &FormatOptions::default())
    }

    #[test]
    fn reindents_nested_braces_by_depth() {
        let out = fmt("void main(){\nif(true){\ngl_FragColor=vec4(1.0);\n}\n}\n");
        assert_eq!(out, "void main(){\n  if(true){\n    gl_FragColor=vec4(1.0);\n  }\n}\n");
    }

    #[test]
    fn collapses_multiple_blank_lines_to_one() {
        let out = fmt("int a;\n\n\n\nint b;\n");
        assert_eq!(out, "int a;\n\nint b;\n");
    }

    #[test]
    fn normalizes_intraline_whitespace_to_a_single_space() {
        let out = fmt("int   a   =   1;\n");
        assert_eq!(out, "int a = 1;\n");
    }

    #[test]
    fn preserves_glued_tokens_that_would_still_re_lex_the_same() {
        let out = fmt("a[0];\n");
        assert_eq!(out, "a[0];\n");
    }

    #[test]
    fn inserts_a_space_to_prevent_two_identifiers_from_merging() {
        // Can't occur from valid GLSL tokenization (two adjacent
        // identifier-class tokens always have some separator already),
        // but a line comment always forces the next token onto a new line
        // regardless of the source's own layout.
        let out = fmt("int a; // trailing\nint b;\n");
        assert_eq!(out, "int a; // trailing\nint b;\n");
    }

    #[test]
    fn trailing_newline_insert_always_ends_with_exactly_one() {
        let out = format("int a;", &FormatOptions { trailing_newline: TrailingNewline::Insert, ..FormatOptions::default() });
        assert!(out.ends_with('\n') && !out.ends_with("\n\n"));
    }

    #[test]
    fn trailing_newline_remove_strips_every_trailing_newline() {
        let out = format("int a;\n\n\n", &FormatOptions { trailing_newline: TrailingNewline::Remove, ..FormatOptions::default() });
        assert!(!out.ends_with('\n'));
    }
}
