use glslx_base::SourceId;
use glslx_lexer::Token;

/// One source's token stream plus a read position. Parsing `#include`
/// pushes a fresh `TokenCursor` for the included file and pops back to
/// the includer once its top-level declarations are consumed (spec.md
/// §4.2's "parses it into the same global tree and scope").
pub(crate) struct TokenCursor {
    pub(crate) source_id: SourceId,
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub(crate) fn new(source_id: SourceId, tokens: Vec<Token>) -> Self {
        TokenCursor { source_id, tokens, pos: 0 }
    }

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.current().kind == glslx_lexer::TokenKind::EndOfFile
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// The kind of the token `offset` positions ahead of `current()`, or
    /// `None` if that position runs past the end of the stream.
    pub(crate) fn peek_kind_at(&self, offset: usize) -> Option<glslx_lexer::TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }
}
