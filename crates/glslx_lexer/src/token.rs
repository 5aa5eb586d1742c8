use glslx_base::Range;

/// Which mode the tokenizer runs in (spec.md §4.1).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Purpose {
    /// Comments are swallowed into the following token's
    /// `leading_comments`; no comment tokens are emitted.
    Compile,
    /// Comments are emitted as their own tokens so the formatter can
    /// preserve them verbatim.
    Format,
}

/// A flat enumeration of every lexical category: keywords, literals,
/// operators, directives, and (format-mode only) comments.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum TokenKind {
    EndOfFile,

    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    // Scalar / built-in types.
    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Bvec2,
    Bvec3,
    Bvec4,
    Ivec2,
    Ivec3,
    Ivec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    SamplerCube,

    True,
    False,

    // Control flow.
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Discard,
    Return,

    Struct,
    Precision,

    // Storage / precision qualifiers.
    Const,
    Uniform,
    Attribute,
    Varying,
    In,
    Out,
    Inout,
    Highp,
    Mediump,
    Lowp,
    Invariant,

    // glslx entry-point / include visibility extensions.
    Export,
    Import,

    // Preprocessor-shaped directives.
    VersionDirective,
    ExtensionDirective,
    IncludeDirective,
    Pragma,

    // Punctuation.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,

    // Operators.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    AmpEqual,
    PipeEqual,
    CaretEqual,
    LessLessEqual,
    GreaterGreaterEqual,

    EqualEqual,
    BangEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    AmpAmp,
    PipePipe,
    CaretCaret,
    Bang,

    Amp,
    Pipe,
    Caret,
    Tilde,
    LessLess,
    GreaterGreater,

    // Comments (FORMAT purpose only).
    LineComment,
    BlockComment,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// True for tokens that head a type-expression (a built-in type name
    /// or `struct`); used by the parser to decide whether a bare
    /// identifier-looking statement is a declaration.
    pub fn starts_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Void | Bool
                | Int
                | Float
                | Vec2
                | Vec3
                | Vec4
                | Bvec2
                | Bvec3
                | Bvec4
                | Ivec2
                | Ivec3
                | Ivec4
                | Mat2
                | Mat3
                | Mat4
                | Sampler2D
                | SamplerCube
        )
    }

    /// Keyword text for built-in type keywords, used by the parser to
    /// build the type-expression node without a second lookup table.
    pub fn keyword_text(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            Void => "void",
            Bool => "bool",
            Int => "int",
            Float => "float",
            Vec2 => "vec2",
            Vec3 => "vec3",
            Vec4 => "vec4",
            Bvec2 => "bvec2",
            Bvec3 => "bvec3",
            Bvec4 => "bvec4",
            Ivec2 => "ivec2",
            Ivec3 => "ivec3",
            Ivec4 => "ivec4",
            Mat2 => "mat2",
            Mat3 => "mat3",
            Mat4 => "mat4",
            Sampler2D => "sampler2D",
            SamplerCube => "samplerCube",
            _ => return None,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Comment {
    pub range: Range,
    pub text: String,
    pub is_block: bool,
}

#[derive(Clone, Debug)]
pub struct Token {
    pub range: Range,
    pub kind: TokenKind,
    /// The exact source text of this token: the identifier name, the
    /// literal's raw digits, the extension name following `#extension`,
    /// etc. Empty for pure punctuation.
    pub text: String,
    pub leading_comments: Vec<Comment>,
}

impl Token {
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
