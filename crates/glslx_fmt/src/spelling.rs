use glslx_lexer::TokenKind;

/// The literal spelling of a punctuation/operator token. Keywords,
/// identifiers, literals, directives, and comments already carry their
/// own spelling in [`glslx_lexer::Token::text`]; only fixed punctuation
/// leaves it empty (see `glslx_lexer::cursor::lex_punctuation`), so this
/// table exists to cover exactly that gap.
pub fn punctuation_spelling(kind: TokenKind) -> Option<&'static str> {
    use TokenKind::*;
    Some(match kind {
        LeftParen => "(",
        RightParen => ")",
        LeftBrace => "{",
        RightBrace => "}",
        LeftBracket => "[",
        RightBracket => "]",
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        Colon => ":",
        Question => "?",

        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        PlusPlus => "++",
        MinusMinus => "--",

        Equal => "=",
        PlusEqual => "+=",
        MinusEqual => "-=",
        StarEqual => "*=",
        SlashEqual => "/=",
        PercentEqual => "%=",
        AmpEqual => "&=",
        PipeEqual => "|=",
        CaretEqual => "^=",
        LessLessEqual => "<<=",
        GreaterGreaterEqual => ">>=",

        EqualEqual => "==",
        BangEqual => "!=",
        Less => "<",
        Greater => ">",
        LessEqual => "<=",
        GreaterEqual => ">=",

        AmpAmp => "&&",
        PipePipe => "||",
        CaretCaret => "^^",
        Bang => "!",

        Amp => "&",
        Pipe => "|",
        Caret => "^",
        Tilde => "~",
        LessLess => "<<",
        GreaterGreater => ">>",

        _ => return None,
    })
}
