use glslx_ast::NodeId;
use glslx_ast::NodeKind;

use crate::precedence;

use super::Emitter;

impl<'a> Emitter<'a> {
    pub(super) fn emit_block(&mut self, node: NodeId) {
        self.push_token("{");
        self.newline();
        self.indent_in();
        let stmts: Vec<NodeId> = self.tree.children(node).collect();
        for stmt in stmts {
            self.write_indent();
            self.emit_statement(stmt);
            self.newline();
        }
        self.indent_out();
        self.write_indent();
        self.push_token("}");
    }

    /// Emits a controlled statement (the body of an `if`/`while`/`for`/
    /// `do`): a `Block` prints as `{ ... }` right where it is; a bare,
    /// brace-less single statement is indented one level on its own line
    /// in normal mode, or simply inlined in minified mode.
    fn emit_controlled_body(&mut self, node: NodeId) {
        if self.tree.kind(node) == NodeKind::Block {
            self.emit_block(node);
            return;
        }
        if !self.minify {
            self.newline();
            self.indent_in();
            self.write_indent();
        }
        self.emit_statement(node);
        if !self.minify {
            self.indent_out();
        }
    }

    fn emit_statement(&mut self, node: NodeId) {
        match self.tree.kind(node) {
            NodeKind::Block => self.emit_block(node),
            NodeKind::Break => {
                self.push_token("break");
                self.push_token(";");
            }
            NodeKind::Continue => {
                self.push_token("continue");
                self.push_token(";");
            }
            NodeKind::Discard => {
                self.push_token("discard");
                self.push_token(";");
            }
            NodeKind::ExpressionStmt => {
                let expr = self.tree.children(node).next().expect("ExpressionStmt always wraps an expression");
                self.emit_expr(expr, precedence::COMMA);
                self.push_token(";");
            }
            NodeKind::Return => {
                self.push_token("return");
                if let Some(expr) = self.tree.children(node).next() {
                    self.space();
                    self.emit_expr(expr, precedence::COMMA);
                }
                self.push_token(";");
            }
            NodeKind::Variables => self.emit_variables(node),
            NodeKind::If => self.emit_if(node),
            NodeKind::While => self.emit_while(node),
            NodeKind::DoWhile => self.emit_do_while(node),
            NodeKind::For => self.emit_for(node),
            other => unreachable!("unexpected statement node kind {other:?}"),
        }
    }

    fn emit_if(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let (cond, then_branch) = (children[0], children[1]);
        self.push_token("if");
        self.space();
        self.push_token("(");
        self.emit_expr(cond, precedence::COMMA);
        self.push_token(")");
        let then_is_block = self.tree.kind(then_branch) == NodeKind::Block;
        if then_is_block {
            self.space();
        }
        self.emit_controlled_body(then_branch);

        if let Some(&else_branch) = children.get(2) {
            if then_is_block {
                self.space();
            } else {
                self.newline();
                self.write_indent();
            }
            self.push_token("else");
            self.space();
            if self.tree.kind(else_branch) == NodeKind::If {
                self.emit_if(else_branch);
            } else {
                self.emit_controlled_body(else_branch);
            }
        }
    }

    fn emit_while(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let (cond, body) = (children[0], children[1]);
        self.push_token("while");
        self.space();
        self.push_token("(");
        self.emit_expr(cond, precedence::COMMA);
        self.push_token(")");
        if self.tree.kind(body) == NodeKind::Block {
            self.space();
        }
        self.emit_controlled_body(body);
    }

    /// children = `[body, cond]`.
    fn emit_do_while(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let (body, cond) = (children[0], children[1]);
        let body_is_block = self.tree.kind(body) == NodeKind::Block;
        self.push_token("do");
        if body_is_block {
            self.space();
        }
        self.emit_controlled_body(body);
        if body_is_block {
            self.space();
        } else {
            self.newline();
            self.write_indent();
        }
        self.push_token("while");
        self.space();
        self.push_token("(");
        self.emit_expr(cond, precedence::COMMA);
        self.push_token(")");
        self.push_token(";");
    }

    /// children = `[setup, test, update, body]`, always exactly 4: the
    /// parser fills in sentinels for whichever clauses were omitted (an
    /// empty `Block` for `setup`, a `true` `Bool` for `test`, an empty
    /// `Sequence` for `update`), so printing the sentinel back out as
    /// nothing reproduces the original source exactly.
    fn emit_for(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        let (setup, test, update, body) = (children[0], children[1], children[2], children[3]);
        self.push_token("for");
        self.space();
        self.push_token("(");
        self.emit_for_setup(setup);
        self.space();
        if !self.is_omitted_for_test(test) {
            self.emit_expr(test, precedence::COMMA);
        }
        self.push_token(";");
        self.space();
        if !self.is_omitted_for_update(update) {
            self.emit_expr(update, precedence::COMMA);
        }
        self.push_token(")");
        if self.tree.kind(body) == NodeKind::Block {
            self.space();
        }
        self.emit_controlled_body(body);
    }

    fn is_omitted_for_setup(&self, setup: NodeId) -> bool {
        self.tree.kind(setup) == NodeKind::Block && !self.tree.get(setup).has_children()
    }

    fn is_omitted_for_test(&self, test: NodeId) -> bool {
        self.tree.kind(test) == NodeKind::Bool && self.tree.get(test).literal_int != 0
    }

    fn is_omitted_for_update(&self, update: NodeId) -> bool {
        self.tree.kind(update) == NodeKind::Sequence && !self.tree.get(update).has_children()
    }

    /// `setup` is the one `for`-clause that, when present, is a full
    /// statement (`Variables` or `ExpressionStmt`) that already appends
    /// its own trailing `;`.
    fn emit_for_setup(&mut self, setup: NodeId) {
        if self.is_omitted_for_setup(setup) {
            self.push_token(";");
        } else {
            self.emit_statement(setup);
        }
    }
}
