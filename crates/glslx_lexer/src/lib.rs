//! Lexical analysis (spec.md §4.1). `tokenize` never panics and never
//! returns `Err`: a malformed byte sequence is reported through the `Log`
//! and aborts *that source's* token stream, per spec.md §7's sole
//! exception to "stages always continue".

mod cursor;
mod token;

pub use token::{Comment, Purpose, Token, TokenKind};

use cursor::Cursor;
use glslx_base::{Log, Range, Source, SourceId};

/// Reserved words: not part of GLSL ES 1.0's grammar, kept for future
/// revisions of the language. Using one is a diagnostic, but (per
/// spec.md §4.1) the token stream still yields `IDENTIFIER`.
const RESERVED_WORDS: &[&str] = &[
    "asm", "class", "default", "double", "enum", "extern", "goto", "long", "short", "switch",
    "template", "this", "typedef", "union", "unsigned", "volatile", "packed", "sampler1D",
    "sampler3D", "sampler1DShadow", "sampler2DShadow", "sampler2DRect", "sampler3DRect",
    "sampler2DRectShadow", "sizeof", "cast", "namespace", "using", "input", "output", "half",
    "fixed", "superp", "filter", "hvec2", "hvec3", "hvec4", "dvec2", "dvec3", "dvec4", "fvec2",
    "fvec3", "fvec4", "noinline", "public", "static", "external", "interface", "flat",
];

/// Lexes `source`'s contents into a flat token stream, always terminated
/// by a zero-length `END_OF_FILE` token. `purpose` selects whether
/// comments are swallowed into `leading_comments` (`Compile`) or emitted
/// as their own tokens (`Format`).
pub fn tokenize(source_id: SourceId, source: &Source, purpose: Purpose, log: &mut Log) -> Vec<Token> {
    let mut cursor = Cursor::new(source_id, source.contents());
    let mut tokens = Vec::new();
    let mut pending_comments: Vec<Comment> = Vec::new();

    loop {
        let leading_ws_had_comment = cursor.skip_whitespace_collecting_comments(purpose, &mut pending_comments, &mut tokens);
        let _ = leading_ws_had_comment;

        if cursor.is_eof() {
            let range = Range::empty(source_id, cursor.offset());
            tokens.push(Token {
                range,
                kind: TokenKind::EndOfFile,
                text: String::new(),
                leading_comments: std::mem::take(&mut pending_comments),
            });
            break;
        }

        match cursor.next_token(purpose, log) {
            Some(mut tok) => {
                tok.leading_comments = std::mem::take(&mut pending_comments);
                tokens.push(tok);
            }
            None => {
                // Tokenizer error: the cursor already logged it. Abort this
                // source's stream (spec.md §7's lone exception), but still
                // terminate with an EOF so downstream stages see a
                // well-formed (if truncated) token list.
                let range = Range::empty(source_id, cursor.offset());
                tokens.push(Token {
                    range,
                    kind: TokenKind::EndOfFile,
                    text: String::new(),
                    leading_comments: std::mem::take(&mut pending_comments),
                });
                break;
            }
        }
    }

    tokens
}

fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glslx_base::SourceSet;

    fn lex(src: &str) -> (Vec<Token>, Log) {
        let mut set = SourceSet::new();
        let id = set.add("<test>", src);
        let mut log = Log::new();
        let toks = tokenize(id, set.get(id), Purpose::Compile, &mut log);
        (toks, log)
    }

    #[test]
    fn ends_with_zero_length_eof() {
        let (toks, _) = lex("int x;");
        let last = toks.last().unwrap();
        assert_eq!(last.kind, TokenKind::EndOfFile);
        assert_eq!(last.range.start, last.range.end);
    }

    #[test]
    fn classifies_int_literal_forms() {
        let (toks, _) = lex("10 010 0x1A 0");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(&kinds[..4], &[TokenKind::IntLiteral; 4]);
    }

    #[test]
    fn classifies_float_literal_forms() {
        let (toks, _) = lex("1.0 .5 1e10 08");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        // 08 is not a valid octal int, so "anything else that looks
        // numeric is a float" applies.
        assert_eq!(&kinds[..4], &[TokenKind::FloatLiteral; 4]);
    }

    #[test]
    fn reserved_word_still_yields_identifier_with_diagnostic() {
        let (toks, log) = lex("int asm;");
        assert_eq!(toks[1].kind, TokenKind::Identifier);
        assert_eq!(toks[1].text, "asm");
        assert!(log.has_warnings() || log.has_errors());
    }

    #[test]
    fn compile_purpose_attaches_comments_to_next_token() {
        let (toks, _) = lex("// hi\nint x;");
        assert_eq!(toks[0].kind, TokenKind::Int);
        assert_eq!(toks[0].leading_comments.len(), 1);
        assert_eq!(toks[0].leading_comments[0].text, "// hi");
    }

    #[test]
    fn format_purpose_emits_comments_as_tokens() {
        let mut set = SourceSet::new();
        let id = set.add("<test>", "// hi\nint x;");
        let mut log = Log::new();
        let toks = tokenize(id, set.get(id), Purpose::Format, &mut log);
        assert_eq!(toks[0].kind, TokenKind::LineComment);
        assert!(toks[0].leading_comments.is_empty());
    }

    #[test]
    fn directives_map_to_dedicated_kinds() {
        let (toks, _) = lex("#version 100\n#extension GL_OES_standard_derivatives : enable\n#include \"a.glsl\"\n#pragma foo");
        assert_eq!(toks[0].kind, TokenKind::VersionDirective);
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::ExtensionDirective));
        assert!(kinds.contains(&TokenKind::IncludeDirective));
        assert!(kinds.contains(&TokenKind::Pragma));
    }

    #[test]
    fn multichar_operators_prefer_longest_match() {
        let (toks, _) = lex("a <<= b >>= c == d != e <= f >= g && h || i ^^ j");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::LessLessEqual));
        assert!(kinds.contains(&TokenKind::GreaterGreaterEqual));
        assert!(kinds.contains(&TokenKind::EqualEqual));
        assert!(kinds.contains(&TokenKind::BangEqual));
        assert!(kinds.contains(&TokenKind::AmpAmp));
        assert!(kinds.contains(&TokenKind::PipePipe));
        assert!(kinds.contains(&TokenKind::CaretCaret));
    }

    #[test]
    fn garbage_byte_aborts_stream_with_diagnostic() {
        let (toks, log) = lex("int x = @;");
        assert!(log.has_errors());
        assert_eq!(toks.last().unwrap().kind, TokenKind::EndOfFile);
    }
}
