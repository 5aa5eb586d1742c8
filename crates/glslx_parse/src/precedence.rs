use glslx_ast::NodeKind;
use glslx_lexer::TokenKind;

/// Binding power, low to high (spec.md §4.2). Declared as a plain `u8` scale
/// rather than an enum so that "subtract one to force right-associativity"
/// (assignment) is just arithmetic.
pub type Precedence = u8;

pub const COMMA: Precedence = 1;
pub const ASSIGN: Precedence = 2;
pub const LOGICAL_OR: Precedence = 3;
pub const LOGICAL_XOR: Precedence = 4;
pub const LOGICAL_AND: Precedence = 5;
pub const BITWISE_OR: Precedence = 6;
pub const BITWISE_XOR: Precedence = 7;
pub const BITWISE_AND: Precedence = 8;
pub const COMPARE: Precedence = 9;
pub const SHIFT: Precedence = 10;
pub const ADD: Precedence = 11;
pub const MULTIPLY: Precedence = 12;
pub const UNARY_PREFIX: Precedence = 13;
pub const UNARY_POSTFIX: Precedence = 14;
pub const MEMBER: Precedence = 15;

/// One row of the infix operator table: the resulting node kind, this
/// operator's precedence, and whether the right operand recurses at the
/// same precedence (right-associative) or one above (left-associative).
pub struct InfixOp {
    pub kind: NodeKind,
    pub precedence: Precedence,
    pub right_associative: bool,
}

pub fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    use TokenKind::*;
    let (node_kind, precedence, right_assoc) = match kind {
        Comma => (NodeKind::Sequence, COMMA, false),

        Equal => (NodeKind::Assign, ASSIGN, true),
        PlusEqual => (NodeKind::AssignAdd, ASSIGN, true),
        MinusEqual => (NodeKind::AssignSubtract, ASSIGN, true),
        StarEqual => (NodeKind::AssignMultiply, ASSIGN, true),
        SlashEqual => (NodeKind::AssignDivide, ASSIGN, true),
        AmpEqual => (NodeKind::AssignBitwiseAnd, ASSIGN, true),
        PipeEqual => (NodeKind::AssignBitwiseOr, ASSIGN, true),
        CaretEqual => (NodeKind::AssignBitwiseXor, ASSIGN, true),
        LessLessEqual => (NodeKind::AssignShiftLeft, ASSIGN, true),
        GreaterGreaterEqual => (NodeKind::AssignShiftRight, ASSIGN, true),

        PipePipe => (NodeKind::LogicalOr, LOGICAL_OR, false),
        CaretCaret => (NodeKind::LogicalXor, LOGICAL_XOR, false),
        AmpAmp => (NodeKind::LogicalAnd, LOGICAL_AND, false),

        Pipe => (NodeKind::BitwiseOr, BITWISE_OR, false),
        Caret => (NodeKind::BitwiseXor, BITWISE_XOR, false),
        Amp => (NodeKind::BitwiseAnd, BITWISE_AND, false),

        EqualEqual => (NodeKind::Equal, COMPARE, false),
        BangEqual => (NodeKind::NotEqual, COMPARE, false),
        Less => (NodeKind::LessThan, COMPARE, false),
        LessEqual => (NodeKind::LessThanEqual, COMPARE, false),
        Greater => (NodeKind::GreaterThan, COMPARE, false),
        GreaterEqual => (NodeKind::GreaterThanEqual, COMPARE, false),

        LessLess => (NodeKind::ShiftLeft, SHIFT, false),
        GreaterGreater => (NodeKind::ShiftRight, SHIFT, false),

        Plus => (NodeKind::Add, ADD, false),
        Minus => (NodeKind::Subtract, ADD, false),

        Star => (NodeKind::Multiply, MULTIPLY, false),
        Slash => (NodeKind::Divide, MULTIPLY, false),
        // `%` is reserved in GLSL ES 1.0 (no modulus operator in the core
        // language); the parser reports it rather than treating it as an
        // operator here.
        _ => return None,
    };
    Some(InfixOp { kind: node_kind, precedence, right_associative: right_assoc })
}
