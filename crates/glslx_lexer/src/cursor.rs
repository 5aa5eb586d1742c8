use glslx_base::{Log, Range, SourceId};

use crate::token::{Comment, Purpose, Token, TokenKind};
use crate::is_reserved;

/// A hand-written character cursor, in the shape of `rustc_lexer`'s own
/// `Cursor` (bump/peek/peek_second over the source text) rather than a
/// regex splitter — spec.md DESIGN NOTES §9(b) flags the regex
/// description as a defect and asks implementers to prefer this.
pub(crate) struct Cursor<'a> {
    source_id: SourceId,
    text: &'a str,
    pos: u32,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("void", TokenKind::Void),
    ("bool", TokenKind::Bool),
    ("int", TokenKind::Int),
    ("float", TokenKind::Float),
    ("vec2", TokenKind::Vec2),
    ("vec3", TokenKind::Vec3),
    ("vec4", TokenKind::Vec4),
    ("bvec2", TokenKind::Bvec2),
    ("bvec3", TokenKind::Bvec3),
    ("bvec4", TokenKind::Bvec4),
    ("ivec2", TokenKind::Ivec2),
    ("ivec3", TokenKind::Ivec3),
    ("ivec4", TokenKind::Ivec4),
    ("mat2", TokenKind::Mat2),
    ("mat3", TokenKind::Mat3),
    ("mat4", TokenKind::Mat4),
    ("sampler2D", TokenKind::Sampler2D),
    ("samplerCube", TokenKind::SamplerCube),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("discard", TokenKind::Discard),
    ("return", TokenKind::Return),
    ("struct", TokenKind::Struct),
    ("precision", TokenKind::Precision),
    ("const", TokenKind::Const),
    ("uniform", TokenKind::Uniform),
    ("attribute", TokenKind::Attribute),
    ("varying", TokenKind::Varying),
    ("in", TokenKind::In),
    ("out", TokenKind::Out),
    ("inout", TokenKind::Inout),
    ("highp", TokenKind::Highp),
    ("mediump", TokenKind::Mediump),
    ("lowp", TokenKind::Lowp),
    ("invariant", TokenKind::Invariant),
    ("export", TokenKind::Export),
    ("import", TokenKind::Import),
];

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source_id: SourceId, text: &'a str) -> Self {
        Cursor { source_id, text, pos: 0 }
    }

    pub(crate) fn offset(&self) -> u32 {
        self.pos
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos as usize >= self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos as usize..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.rest().chars();
        it.next();
        it.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn range_from(&self, start: u32) -> Range {
        Range::new(self.source_id, start, self.pos)
    }

    /// Consumes whitespace and comments. Line-comment and block-comment
    /// text is either queued in `pending` (`Compile`) or appended directly
    /// to `tokens` as a standalone token (`Format`). Returns whether any
    /// whitespace or comment was consumed.
    pub(crate) fn skip_whitespace_collecting_comments(
        &mut self,
        purpose: Purpose,
        pending: &mut Vec<Comment>,
        tokens: &mut Vec<Token>,
    ) -> bool {
        let mut any = false;
        loop {
            match self.peek() {
                Some(c) if c == ' ' || c == '\t' || c == '\r' || c == '\n' => {
                    self.bump();
                    any = true;
                }
                Some('/') if self.peek_second() == Some('/') => {
                    any = true;
                    let start = self.pos;
                    self.bump();
                    self.bump();
                    self.eat_while(|c| c != '\n' && c != '\r');
                    self.emit_comment(start, false, purpose, pending, tokens);
                }
                Some('/') if self.peek_second() == Some('*') => {
                    any = true;
                    let start = self.pos;
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            None => break,
                            Some('*') if self.peek_second() == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                        }
                    }
                    self.emit_comment(start, true, purpose, pending, tokens);
                }
                _ => break,
            }
        }
        any
    }

    fn emit_comment(
        &mut self,
        start: u32,
        is_block: bool,
        purpose: Purpose,
        pending: &mut Vec<Comment>,
        tokens: &mut Vec<Token>,
    ) {
        let range = self.range_from(start);
        let text = self.text[start as usize..self.pos as usize].to_string();
        match purpose {
            Purpose::Compile => pending.push(Comment { range, text, is_block }),
            Purpose::Format => tokens.push(Token {
                range,
                kind: if is_block { TokenKind::BlockComment } else { TokenKind::LineComment },
                text,
                leading_comments: Vec::new(),
            }),
        }
    }

    /// Lexes exactly one non-comment, non-whitespace token. Returns
    /// `None` (after logging) when the next byte cannot start any token.
    pub(crate) fn next_token(&mut self, _purpose: Purpose, log: &mut Log) -> Option<Token> {
        let start = self.pos;
        let c = self.peek()?;

        if is_ident_start(c) {
            self.bump();
            self.eat_while(is_ident_continue);
            let text = self.text[start as usize..self.pos as usize].to_string();
            let range = self.range_from(start);
            if let Some(&(_, kind)) = KEYWORDS.iter().find(|(kw, _)| *kw == text) {
                return Some(Token { range, kind, text, leading_comments: Vec::new() });
            }
            if is_reserved(&text) {
                log.warning(range, format!("'{text}' is reserved for future use and should not be used as an identifier"));
            }
            return Some(Token { range, kind: TokenKind::Identifier, text, leading_comments: Vec::new() });
        }

        if c.is_ascii_digit() || (c == '.' && self.peek_second().is_some_and(|d| d.is_ascii_digit())) {
            return Some(self.lex_number(start));
        }

        if c == '"' {
            return Some(self.lex_string(start));
        }

        if c == '#' {
            return Some(self.lex_directive(start));
        }

        if let Some(tok) = self.lex_punctuation(start) {
            return Some(tok);
        }

        self.bump();
        let range = self.range_from(start);
        log.error(range, format!("unexpected character '{c}'"));
        None
    }

    fn lex_number(&mut self, start: u32) -> Token {
        let mut is_float = false;
        let mut is_hex = false;

        if self.peek() == Some('0') && matches!(self.peek_second(), Some('x') | Some('X')) {
            self.bump();
            self.bump();
            is_hex = true;
            self.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.eat_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                is_float = true;
                self.bump();
                self.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e') | Some('E')) {
                let save = self.pos;
                self.bump();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.bump();
                }
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    is_float = true;
                    self.eat_while(|c| c.is_ascii_digit());
                } else {
                    self.pos = save;
                }
            }
            if matches!(self.peek(), Some('f') | Some('F')) {
                is_float = true;
                self.bump();
            }
        }

        let text = self.text[start as usize..self.pos as usize].to_string();
        let range = self.range_from(start);

        let kind = if is_hex {
            TokenKind::IntLiteral
        } else if is_float {
            TokenKind::FloatLiteral
        } else if text.len() > 1 && text.starts_with('0') {
            // Only an all-octal-digit body after a leading zero is a
            // valid octal int; anything else that still looks numeric
            // (e.g. `08`) is classified as a float per spec.md §4.1.
            if text[1..].bytes().all(|b| (b'0'..=b'7').contains(&b)) {
                TokenKind::IntLiteral
            } else {
                TokenKind::FloatLiteral
            }
        } else {
            TokenKind::IntLiteral
        };

        Token { range, kind, text, leading_comments: Vec::new() }
    }

    fn lex_string(&mut self, start: u32) -> Token {
        self.bump(); // opening quote
        let text_start = self.pos;
        self.eat_while(|c| c != '"' && c != '\n');
        let text = self.text[text_start as usize..self.pos as usize].to_string();
        if self.peek() == Some('"') {
            self.bump();
        }
        let range = self.range_from(start);
        Token { range, kind: TokenKind::StringLiteral, text, leading_comments: Vec::new() }
    }

    fn lex_directive(&mut self, start: u32) -> Token {
        self.bump(); // '#'
        self.eat_while(|c| c == ' ' || c == '\t');
        let name_start = self.pos;
        self.eat_while(|c| c.is_ascii_alphabetic());
        let name = &self.text[name_start as usize..self.pos as usize];
        let kind = match name {
            "version" => TokenKind::VersionDirective,
            "extension" => TokenKind::ExtensionDirective,
            "include" => TokenKind::IncludeDirective,
            _ => TokenKind::Pragma,
        };
        // The directive token's text is the remainder of the line, for
        // the parser to re-lex/interpret (the version number, extension
        // name + behavior, include path, or raw pragma body).
        self.eat_while(|c| c == ' ' || c == '\t');
        let rest_start = self.pos;
        self.eat_while(|c| c != '\n' && c != '\r');
        let text = self.text[rest_start as usize..self.pos as usize].trim_end().to_string();
        let range = self.range_from(start);
        Token { range, kind, text, leading_comments: Vec::new() }
    }

    fn lex_punctuation(&mut self, start: u32) -> Option<Token> {
        // Greedy, longest-match-first order, preserved per spec.md
        // DESIGN NOTES §9(b).
        const THREE: &[(&str, TokenKind)] =
            &[("<<=", TokenKind::LessLessEqual), (">>=", TokenKind::GreaterGreaterEqual)];
        const TWO: &[(&str, TokenKind)] = &[
            ("++", TokenKind::PlusPlus),
            ("--", TokenKind::MinusMinus),
            ("+=", TokenKind::PlusEqual),
            ("-=", TokenKind::MinusEqual),
            ("*=", TokenKind::StarEqual),
            ("/=", TokenKind::SlashEqual),
            ("%=", TokenKind::PercentEqual),
            ("&=", TokenKind::AmpEqual),
            ("|=", TokenKind::PipeEqual),
            ("^=", TokenKind::CaretEqual),
            ("==", TokenKind::EqualEqual),
            ("!=", TokenKind::BangEqual),
            ("<=", TokenKind::LessEqual),
            (">=", TokenKind::GreaterEqual),
            ("&&", TokenKind::AmpAmp),
            ("||", TokenKind::PipePipe),
            ("^^", TokenKind::CaretCaret),
            ("<<", TokenKind::LessLess),
            (">>", TokenKind::GreaterGreater),
        ];
        const ONE: &[(char, TokenKind)] = &[
            ('(', TokenKind::LeftParen),
            (')', TokenKind::RightParen),
            ('{', TokenKind::LeftBrace),
            ('}', TokenKind::RightBrace),
            ('[', TokenKind::LeftBracket),
            (']', TokenKind::RightBracket),
            (';', TokenKind::Semicolon),
            (',', TokenKind::Comma),
            ('.', TokenKind::Dot),
            (':', TokenKind::Colon),
            ('?', TokenKind::Question),
            ('+', TokenKind::Plus),
            ('-', TokenKind::Minus),
            ('*', TokenKind::Star),
            ('/', TokenKind::Slash),
            ('%', TokenKind::Percent),
            ('=', TokenKind::Equal),
            ('<', TokenKind::Less),
            ('>', TokenKind::Greater),
            ('!', TokenKind::Bang),
            ('&', TokenKind::Amp),
            ('|', TokenKind::Pipe),
            ('^', TokenKind::Caret),
            ('~', TokenKind::Tilde),
        ];

        let rest = self.rest();
        for (lexeme, kind) in THREE {
            if rest.starts_with(lexeme) {
                self.pos += lexeme.len() as u32;
                return Some(Token { range: self.range_from(start), kind: *kind, text: String::new(), leading_comments: Vec::new() });
            }
        }
        for (lexeme, kind) in TWO {
            if rest.starts_with(lexeme) {
                self.pos += lexeme.len() as u32;
                return Some(Token { range: self.range_from(start), kind: *kind, text: String::new(), leading_comments: Vec::new() });
            }
        }
        let c = self.peek()?;
        for (ch, kind) in ONE {
            if *ch == c {
                self.bump();
                return Some(Token { range: self.range_from(start), kind: *kind, text: String::new(), leading_comments: Vec::new() });
            }
        }
        None
    }
}
