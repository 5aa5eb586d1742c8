use glslx_ast::{NodeId, NodeKind, ScopeId};
use glslx_base::Range;
use glslx_lexer::TokenKind;

use crate::parser::Parser;
use crate::precedence::{self, Precedence};

fn parse_int_text(text: &str) -> i64 {
    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(rest, 16).unwrap_or(0);
    }
    if text.len() > 1 && text.starts_with('0') {
        return i64::from_str_radix(&text[1..], 8).unwrap_or(0);
    }
    text.parse().unwrap_or(0)
}

fn parse_float_text(text: &str) -> f64 {
    text.trim_end_matches(['f', 'F']).parse().unwrap_or(0.0)
}

/// The Pratt expression parser (spec.md §4.2). Name resolution (binding a
/// `NAME` node to the symbol it refers to) is deliberately left to the
/// resolver: a call can reference a function declared later in the same
/// source, so the parser has no way to know yet.
impl<'p> Parser<'p> {
    pub(crate) fn parse_expression(&mut self, scope: ScopeId, min_precedence: Precedence) -> NodeId {
        let mut left = self.parse_unary(scope);

        loop {
            let kind = self.peek();

            if kind == TokenKind::Question && min_precedence <= precedence::ASSIGN {
                left = self.parse_ternary(scope, left);
                continue;
            }

            let Some(op) = precedence::infix_op(kind) else { break };
            if op.precedence < min_precedence {
                break;
            }
            let op_tok = self.bump();
            let next_min = if op.right_associative { op.precedence } else { op.precedence + 1 };
            let right = self.parse_expression(scope, next_min);

            let range = self.tree.get(left).range.merge(&self.tree.get(right).range);
            let node = self.tree.alloc(op.kind, range);
            self.tree.get_mut(node).internal_range = Some(op_tok.range);
            self.tree.append_child(node, left);
            self.tree.append_child(node, right);
            left = node;
        }

        left
    }

    fn parse_ternary(&mut self, scope: ScopeId, cond: NodeId) -> NodeId {
        self.bump(); // `?`
        let then_branch = self.parse_expression(scope, precedence::COMMA);
        self.expect(TokenKind::Colon, "':'");
        let else_branch = self.parse_expression(scope, precedence::ASSIGN);
        let range = self.tree.get(cond).range.merge(&self.tree.get(else_branch).range);
        let node = self.tree.alloc(NodeKind::Hook, range);
        self.tree.append_child(node, cond);
        self.tree.append_child(node, then_branch);
        self.tree.append_child(node, else_branch);
        node
    }

    fn parse_unary(&mut self, scope: ScopeId) -> NodeId {
        let prefix_kind = match self.peek() {
            TokenKind::Bang => Some(NodeKind::Not),
            TokenKind::Tilde => Some(NodeKind::BitwiseNot),
            TokenKind::Minus => Some(NodeKind::Negative),
            TokenKind::Plus => Some(NodeKind::Positive),
            TokenKind::PlusPlus => Some(NodeKind::PrefixIncrement),
            TokenKind::MinusMinus => Some(NodeKind::PrefixDecrement),
            _ => None,
        };
        if let Some(node_kind) = prefix_kind {
            let tok = self.bump();
            let operand = self.parse_expression(scope, precedence::UNARY_PREFIX);
            let range = tok.range.merge(&self.tree.get(operand).range);
            let node = self.tree.alloc(node_kind, range);
            self.tree.append_child(node, operand);
            return self.parse_postfix(scope, node);
        }
        let primary = self.parse_primary(scope);
        self.parse_postfix(scope, primary)
    }

    fn parse_postfix(&mut self, scope: ScopeId, mut expr: NodeId) -> NodeId {
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.bump();
                    let member = self.expect(TokenKind::Identifier, "a member name");
                    let range = self.tree.get(expr).range.merge(&member.range);
                    let node = self.tree.alloc(NodeKind::Dot, range);
                    self.tree.get_mut(node).text = member.text;
                    self.tree.append_child(node, expr);
                    expr = node;
                }
                TokenKind::LeftBracket => {
                    self.bump();
                    let index = self.parse_expression(scope, precedence::ASSIGN);
                    let close = self.expect(TokenKind::RightBracket, "']'");
                    let range = self.tree.get(expr).range.merge(&close.range);
                    let node = self.tree.alloc(NodeKind::Index, range);
                    self.tree.append_child(node, expr);
                    self.tree.append_child(node, index);
                    expr = node;
                }
                TokenKind::PlusPlus => {
                    let tok = self.bump();
                    let range = self.tree.get(expr).range.merge(&tok.range);
                    let node = self.tree.alloc(NodeKind::PostfixIncrement, range);
                    self.tree.append_child(node, expr);
                    expr = node;
                }
                TokenKind::MinusMinus => {
                    let tok = self.bump();
                    let range = self.tree.get(expr).range.merge(&tok.range);
                    let node = self.tree.alloc(NodeKind::PostfixDecrement, range);
                    self.tree.append_child(node, expr);
                    expr = node;
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self, scope: ScopeId) -> NodeId {
        let tok = self.peek_token();
        match tok.kind {
            TokenKind::True | TokenKind::False => {
                self.bump();
                let node = self.tree.alloc(NodeKind::Bool, tok.range);
                self.tree.get_mut(node).literal_int = if tok.kind == TokenKind::True { 1 } else { 0 };
                node
            }
            TokenKind::IntLiteral => {
                self.bump();
                let node = self.tree.alloc(NodeKind::Int, tok.range);
                self.tree.get_mut(node).literal_int = parse_int_text(&tok.text);
                node
            }
            TokenKind::FloatLiteral => {
                self.bump();
                let node = self.tree.alloc(NodeKind::Float, tok.range);
                self.tree.get_mut(node).literal_float = parse_float_text(&tok.text);
                node
            }
            TokenKind::LeftParen => {
                self.bump();
                let inner = self.parse_expression(scope, precedence::COMMA);
                self.expect(TokenKind::RightParen, "')'");
                inner
            }
            TokenKind::Identifier => self.parse_name_or_call(scope, tok.text.clone(), tok.range),
            k if k.keyword_text().is_some() => {
                let text = k.keyword_text().unwrap().to_string();
                self.parse_name_or_call(scope, text, tok.range)
            }
            _ => {
                self.bump();
                self.log.error(tok.range, "expected an expression");
                self.tree.alloc(NodeKind::Int, tok.range)
            }
        }
    }

    fn parse_name_or_call(&mut self, scope: ScopeId, text: String, start: Range) -> NodeId {
        self.bump();
        let name_node = self.tree.alloc(NodeKind::Name, start);
        self.tree.get_mut(name_node).text = text;

        if self.peek() != TokenKind::LeftParen {
            return name_node;
        }
        self.bump(); // `(`
        let call = self.tree.alloc(NodeKind::Call, start);
        self.tree.append_child(call, name_node);
        if self.peek() != TokenKind::RightParen {
            loop {
                let arg = self.parse_expression(scope, precedence::ASSIGN);
                self.tree.append_child(call, arg);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RightParen, "')'");
        self.tree.get_mut(call).range = start.merge(&close.range);
        call
    }
}
