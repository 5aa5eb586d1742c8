use glslx_ast::{NodeId, SymbolFlags, SymbolId};

use crate::precedence;

use super::Emitter;

impl<'a> Emitter<'a> {
    fn write_keyword(&mut self, kw: &str) {
        self.push_token(kw);
        self.space();
    }

    /// Storage qualifier, then precision qualifier, then the type itself -
    /// `export`/`import` are never printed (spec.md §4.7: imported
    /// declarations are skipped outright, and an exported one is emitted
    /// exactly like a plain one).
    fn emit_qualifiers(&mut self, flags: SymbolFlags) {
        if flags.contains(SymbolFlags::CONST) {
            self.write_keyword("const");
        }
        if flags.contains(SymbolFlags::ATTRIBUTE) {
            self.write_keyword("attribute");
        }
        if flags.contains(SymbolFlags::UNIFORM) {
            self.write_keyword("uniform");
        }
        if flags.contains(SymbolFlags::VARYING) {
            self.write_keyword("varying");
        }
        if flags.contains(SymbolFlags::INOUT) {
            self.write_keyword("inout");
        } else {
            if flags.contains(SymbolFlags::IN) {
                self.write_keyword("in");
            }
            if flags.contains(SymbolFlags::OUT) {
                self.write_keyword("out");
            }
        }
        if flags.contains(SymbolFlags::HIGHP) {
            self.write_keyword("highp");
        }
        if flags.contains(SymbolFlags::MEDIUMP) {
            self.write_keyword("mediump");
        }
        if flags.contains(SymbolFlags::LOWP) {
            self.write_keyword("lowp");
        }
    }

    fn emit_type_node(&mut self, node: NodeId) {
        let text = self.symbol_or_text(node);
        self.push_token(&text);
    }

    fn emit_array_suffix(&mut self, count_node: Option<NodeId>) {
        if let Some(count) = count_node {
            self.push_token("[");
            self.emit_expr(count, precedence::COMMA);
            self.push_token("]");
        }
    }

    /// One `name`, `name[n]`, `name = init` or `name[n] = init` declarator
    /// inside a `Variables` group.
    fn emit_declarator(&mut self, var_node: NodeId) {
        let sym_id = self.tree.get(var_node).symbol.expect("Variable node always carries a symbol");
        let name = self.symbols.get(sym_id).name.clone();
        self.push_token(&name);
        let array_count = self.symbols.get(sym_id).as_variable().and_then(|v| v.array_count_node);
        self.emit_array_suffix(array_count);

        let children: Vec<NodeId> = self.tree.children(var_node).collect();
        if let Some(&init) = children.get(1) {
            self.space();
            self.push_token("=");
            self.space();
            self.emit_expr(init, precedence::ASSIGN);
        }
    }

    /// A `Variables` group: shared qualifiers and type, then one or more
    /// comma-separated declarators. All declarators in a group share one
    /// `SymbolFlags` value, so the first declarator's symbol is enough.
    pub(super) fn emit_variables(&mut self, node: NodeId) {
        let vars: Vec<NodeId> = self.tree.children(node).collect();
        let Some(&first) = vars.first() else { return };
        let first_sym = self.tree.get(first).symbol.expect("declarator always carries a symbol");
        let flags = self.symbols.get(first_sym).flags;
        self.emit_qualifiers(flags);
        let type_node = self.tree.children(first).next().expect("Variable always has a type child");
        self.emit_type_node(type_node);
        self.space();
        for (i, &var) in vars.iter().enumerate() {
            if i > 0 {
                self.push_token(",");
                self.space();
            }
            self.emit_declarator(var);
        }
        self.push_token(";");
    }

    fn emit_argument(&mut self, arg_id: SymbolId) {
        let flags = self.symbols.get(arg_id).flags;
        self.emit_qualifiers(flags);
        let arg = self.symbols.get(arg_id).as_variable().expect("function argument is always a variable symbol");
        let (type_node, array_count) = (arg.type_node, arg.array_count_node);
        self.emit_type_node(type_node);
        self.space();
        let name = self.symbols.get(arg_id).name.clone();
        self.push_token(&name);
        self.emit_array_suffix(array_count);
    }

    /// Return type and argument list live off-tree in the `FunctionSymbol`,
    /// never as tree children - only the body, if any, is a real child.
    pub(super) fn emit_function(&mut self, node: NodeId) {
        let sym_id = self.tree.get(node).symbol.expect("Function node always carries a symbol");
        let func = self.symbols.get(sym_id).as_function().expect("Function symbol").clone();
        self.emit_type_node(func.return_type_node);
        self.space();
        let name = self.symbols.get(sym_id).name.clone();
        self.push_token(&name);
        self.push_token("(");
        for (i, &arg_id) in func.arguments.iter().enumerate() {
            if i > 0 {
                self.push_token(",");
                self.space();
            }
            self.emit_argument(arg_id);
        }
        self.push_token(")");
        match func.body {
            Some(body) => {
                self.space();
                self.emit_block(body);
            }
            None => self.push_token(";"),
        }
    }

    pub(super) fn emit_struct(&mut self, node: NodeId) {
        let sym_id = self.tree.get(node).symbol.expect("Struct node always carries a symbol");
        self.write_keyword("struct");
        let name = self.symbols.get(sym_id).name.clone();
        self.push_token(&name);
        self.space();
        self.push_token("{");
        self.newline();
        self.indent_in();
        let groups: Vec<NodeId> = self.tree.children(node).collect();
        for group in groups {
            self.write_indent();
            self.emit_variables(group);
            self.newline();
        }
        self.indent_out();
        self.write_indent();
        self.push_token("}");
        self.push_token(";");
    }

    pub(super) fn emit_precision(&mut self, node: NodeId) {
        self.write_keyword("precision");
        let qualifier = match self.tree.get(node).literal_int {
            0 => "lowp",
            1 => "mediump",
            2 => "highp",
            other => unreachable!("unknown precision qualifier {other}"),
        };
        self.write_keyword(qualifier);
        let type_node = self.tree.children(node).next().expect("Precision always names a type");
        self.emit_type_node(type_node);
        self.push_token(";");
    }

    pub(super) fn emit_version(&mut self, node: NodeId) {
        self.push_token("#version");
        self.space();
        let version = self.tree.get(node).literal_int.to_string();
        self.push_token(&version);
        self.hard_newline();
    }

    pub(super) fn emit_extension(&mut self, node: NodeId) {
        self.push_token("#extension");
        self.space();
        let name = self.tree.get(node).text.clone();
        self.push_token(&name);
        self.space();
        self.push_token(":");
        self.space();
        let behavior = match self.tree.get(node).literal_int {
            0 => "default",
            1 => "disable",
            2 => "enable",
            3 => "require",
            4 => "warn",
            other => unreachable!("unknown extension behavior {other}"),
        };
        self.push_token(behavior);
        self.hard_newline();
    }

    pub(super) fn emit_pragma(&mut self, node: NodeId) {
        self.push_token("#pragma");
        self.space();
        let text = self.tree.get(node).text.clone();
        self.push_token(&text);
        self.hard_newline();
    }
}
