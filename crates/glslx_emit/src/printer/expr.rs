use glslx_ast::{NodeId, NodeKind};

use crate::literal::format_float;
use crate::precedence::{self, Precedence};

use super::Emitter;

fn binary_op_text(kind: NodeKind) -> &'static str {
    use NodeKind::*;
    match kind {
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        BitwiseAnd => "&",
        BitwiseOr => "|",
        BitwiseXor => "^",
        LogicalAnd => "&&",
        LogicalOr => "||",
        LogicalXor => "^^",
        Equal => "==",
        NotEqual => "!=",
        LessThan => "<",
        LessThanEqual => "<=",
        GreaterThan => ">",
        GreaterThanEqual => ">=",
        ShiftLeft => "<<",
        ShiftRight => ">>",
        other => unreachable!("{other:?} is not a binary operator"),
    }
}

fn assign_op_text(kind: NodeKind) -> &'static str {
    use NodeKind::*;
    match kind {
        Assign => "=",
        AssignAdd => "+=",
        AssignSubtract => "-=",
        AssignMultiply => "*=",
        AssignDivide => "/=",
        AssignBitwiseAnd => "&=",
        AssignBitwiseOr => "|=",
        AssignBitwiseXor => "^=",
        AssignShiftLeft => "<<=",
        AssignShiftRight => ">>=",
        other => unreachable!("{other:?} is not an assignment operator"),
    }
}

fn unary_prefix_op_text(kind: NodeKind) -> &'static str {
    use NodeKind::*;
    match kind {
        Not => "!",
        BitwiseNot => "~",
        Negative => "-",
        Positive => "+",
        PrefixIncrement => "++",
        PrefixDecrement => "--",
        other => unreachable!("{other:?} is not a unary prefix operator"),
    }
}

fn unary_postfix_op_text(kind: NodeKind) -> &'static str {
    use NodeKind::*;
    match kind {
        PostfixIncrement => "++",
        PostfixDecrement => "--",
        other => unreachable!("{other:?} is not a unary postfix operator"),
    }
}

impl<'a> Emitter<'a> {
    /// Prints `node`, wrapping it in parens iff its own precedence is
    /// below `min_prec` - the one mechanism that reconstructs the parens
    /// the parser's parenthesis-transparent grammar never recorded.
    pub(super) fn emit_expr(&mut self, node: NodeId, min_prec: Precedence) {
        let kind = self.tree.kind(node);
        let needs_parens = precedence::precedence_of(kind) < min_prec;
        if needs_parens {
            self.push_token("(");
        }
        match kind {
            NodeKind::Call => self.emit_call(node),
            NodeKind::Dot => self.emit_dot(node),
            NodeKind::Hook => self.emit_hook(node),
            NodeKind::Index => self.emit_index(node),
            NodeKind::Name => {
                let name = self.symbol_or_text(node);
                self.push_token(&name);
            }
            NodeKind::Sequence => self.emit_sequence(node),
            NodeKind::Bool => {
                self.push_token(if self.tree.get(node).literal_int != 0 { "true" } else { "false" });
            }
            NodeKind::Float => {
                let text = format_float(self.tree.get(node).literal_float, self.minify);
                self.push_token(&text);
            }
            NodeKind::Int => {
                let text = self.tree.get(node).literal_int.to_string();
                self.push_token(&text);
            }
            k if k.is_binary() => self.emit_binary(node, k),
            k if k.is_binary_assign() => self.emit_binary_assign(node, k),
            k if k.is_unary_prefix() || k.is_unary_assign_prefix() => self.emit_unary_prefix(node, k),
            k if k.is_unary_assign_postfix() => self.emit_unary_postfix(node, k),
            other => unreachable!("emit_expr: unhandled expression kind {other:?}"),
        }
        if needs_parens {
            self.push_token(")");
        }
    }

    fn emit_binary(&mut self, node: NodeId, kind: NodeKind) {
        let prec = precedence::precedence_of(kind);
        let children: Vec<NodeId> = self.tree.children(node).collect();
        self.emit_expr(children[0], prec);
        self.space();
        self.push_token(binary_op_text(kind));
        self.space();
        self.emit_expr(children[1], prec + 1);
    }

    /// Assignment operators are right-associative: the left operand must
    /// be strictly tighter than `ASSIGN` (so a chained `a = b = c` never
    /// misparses as `(a = b) = c`), while the right operand recurses at
    /// the same precedence.
    fn emit_binary_assign(&mut self, node: NodeId, kind: NodeKind) {
        let prec = precedence::precedence_of(kind);
        let children: Vec<NodeId> = self.tree.children(node).collect();
        self.emit_expr(children[0], prec + 1);
        self.space();
        self.push_token(assign_op_text(kind));
        self.space();
        self.emit_expr(children[1], prec);
    }

    /// `cond ? then : else`, mirroring the parser's own per-slot
    /// precedence: `then` is parsed at `COMMA` (a bare comma expression is
    /// legal there, delimited by `:`), `else` at `ASSIGN` (so a chained
    /// `a ? b : c ? d : e` reads as `a ? b : (c ? d : e)`).
    fn emit_hook(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        self.emit_expr(children[0], precedence::ASSIGN);
        self.space();
        self.push_token("?");
        self.space();
        self.emit_expr(children[1], precedence::COMMA);
        self.space();
        self.push_token(":");
        self.space();
        self.emit_expr(children[2], precedence::ASSIGN);
    }

    /// The comma operator: a plain left-associative binary node, built by
    /// the same infix-loop machinery as `+`/`*`, except for the special
    /// zero-child sentinel used as `for`'s omitted-update placeholder
    /// (handled by the `for`-loop printer before this is ever reached).
    fn emit_sequence(&mut self, node: NodeId) {
        let prec = precedence::COMMA;
        let children: Vec<NodeId> = self.tree.children(node).collect();
        self.emit_expr(children[0], prec);
        self.push_token(",");
        self.space();
        self.emit_expr(children[1], prec + 1);
    }

    fn emit_unary_prefix(&mut self, node: NodeId, kind: NodeKind) {
        self.push_token(unary_prefix_op_text(kind));
        let child = self.tree.children(node).next().expect("unary prefix op always has an operand");
        self.emit_expr(child, precedence::UNARY_PREFIX);
    }

    fn emit_unary_postfix(&mut self, node: NodeId, kind: NodeKind) {
        let child = self.tree.children(node).next().expect("unary postfix op always has an operand");
        self.emit_expr(child, precedence::UNARY_POSTFIX);
        self.push_token(unary_postfix_op_text(kind));
    }

    /// callee is `children[0]` (always a `Name`); builtin type/struct
    /// constructors resolve their callee's symbol the same way a function
    /// call does, except builtin constructors are left with `symbol =
    /// None` (never renamed) - `symbol_or_text` already knows the rule.
    fn emit_call(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let name = self.symbol_or_text(children[0]);
        self.push_token(&name);
        self.push_token("(");
        for (i, &arg) in children[1..].iter().enumerate() {
            if i > 0 {
                self.push_token(",");
                self.space();
            }
            self.emit_expr(arg, precedence::ASSIGN);
        }
        self.push_token(")");
    }

    /// The target binds at `UNARY_POSTFIX`, not `MEMBER`: chained postfix
    /// operations (`a().b`, `a[0]++`, `a.b.c`) must not force parens
    /// around each other, only around a genuinely lower-precedence
    /// operand exposed through parenthesis transparency (e.g. `(a + b).x`).
    fn emit_dot(&mut self, node: NodeId) {
        let target = self.tree.children(node).next().expect("Dot always has a target");
        self.emit_expr(target, precedence::UNARY_POSTFIX);
        self.push_token(".");
        let member = self.tree.get(node).text.clone();
        self.push_token(&member);
    }

    fn emit_index(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        self.emit_expr(children[0], precedence::UNARY_POSTFIX);
        self.push_token("[");
        self.emit_expr(children[1], precedence::COMMA);
        self.push_token("]");
    }
}
