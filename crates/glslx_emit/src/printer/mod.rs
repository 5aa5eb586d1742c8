mod decl;
mod expr;
mod stmt;

use glslx_ast::{NodeId, NodeKind, SymbolTable, Tree};

use crate::literal::needs_space;

pub(crate) struct Emitter<'a> {
    pub(crate) tree: &'a Tree,
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) minify: bool,
    out: String,
    indent: usize,
}

impl<'a> Emitter<'a> {
    /// Appends `s` as a single token, inserting a separating space ahead of
    /// it in minified mode if the lexer would otherwise glue it to
    /// whatever was just written.
    pub(crate) fn push_token(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if self.minify {
            if let (Some(last), Some(first)) = (self.out.chars().next_back(), s.chars().next()) {
                if needs_space(last, first) {
                    self.out.push(' ');
                }
            }
        }
        self.out.push_str(s);
    }

    /// A formatting-only space: present in normal mode, silent in
    /// minified mode (where [`Self::push_token`] inserts one only if the
    /// lexer would otherwise need it).
    pub(crate) fn space(&mut self) {
        if !self.minify {
            self.out.push(' ');
        }
    }

    pub(crate) fn newline(&mut self) {
        if !self.minify {
            self.out.push('\n');
        }
    }

    /// An unconditional newline, used after preprocessor directives: those
    /// are terminated by the end of the source line in both modes, so
    /// minifying can never fold one onto the next token.
    pub(crate) fn hard_newline(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn write_indent(&mut self) {
        if !self.minify {
            for _ in 0..self.indent {
                self.out.push_str("  ");
            }
        }
    }

    pub(crate) fn indent_in(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn indent_out(&mut self) {
        self.indent -= 1;
    }

    /// `Symbol::name` for any node carrying a `symbol` link (renamed
    /// identifiers, struct type references), otherwise the node's own
    /// `text` (builtin type keywords, builtin-constructor callees, and
    /// `Dot` member names, none of which the renamer ever touches).
    pub(crate) fn symbol_or_text(&self, node: NodeId) -> String {
        let data = self.tree.get(node);
        match data.symbol {
            Some(id) => self.symbols.get(id).name.clone(),
            None => data.text.clone(),
        }
    }

    fn is_declaration_imported(&self, node: NodeId) -> bool {
        let symbol_of_first_declarator = match self.tree.kind(node) {
            NodeKind::Function | NodeKind::Struct => self.tree.get(node).symbol,
            NodeKind::Variables => self.tree.children(node).next().and_then(|var| self.tree.get(var).symbol),
            _ => None,
        };
        symbol_of_first_declarator.map(|id| self.symbols.get(id).is_imported()).unwrap_or(false)
    }

    fn has_body(&self, node: NodeId) -> bool {
        self.tree.kind(node) == NodeKind::Function
            && self
                .tree
                .get(node)
                .symbol
                .and_then(|id| self.symbols.get(id).as_function())
                .map(|f| f.body.is_some())
                .unwrap_or(false)
    }

    /// spec.md §4.7: a blank line separates two top-level siblings when one
    /// is a function with a body, or when a `precision`/`#extension`
    /// directive sits next to the other kind of directive.
    fn wants_blank_line_before(&self, prev: NodeId, next: NodeId) -> bool {
        if self.has_body(prev) || self.has_body(next) {
            return true;
        }
        matches!(
            (self.tree.kind(prev), self.tree.kind(next)),
            (NodeKind::Precision, NodeKind::Extension) | (NodeKind::Extension, NodeKind::Precision)
        )
    }

    fn emit_top_level(&mut self, node: NodeId) {
        self.write_indent();
        match self.tree.kind(node) {
            NodeKind::Version => self.emit_version(node),
            NodeKind::Extension => self.emit_extension(node),
            NodeKind::Pragma => self.emit_pragma(node),
            NodeKind::Precision => self.emit_precision(node),
            NodeKind::Struct => self.emit_struct(node),
            NodeKind::Function => self.emit_function(node),
            NodeKind::Variables => self.emit_variables(node),
            other => unreachable!("unexpected top-level node kind {other:?}"),
        }
    }
}

/// Prints the whole tree rooted at `tree.root`. Imported declarations are
/// dropped entirely, not just their `import` keyword.
pub fn emit_program(tree: &Tree, symbols: &SymbolTable, minify: bool) -> String {
    let mut emitter = Emitter { tree, symbols, minify, out: String::new(), indent: 0 };
    let root = tree.root.expect("emit requires a parsed tree");
    let children: Vec<NodeId> = tree.children(root).filter(|&n| !emitter.is_declaration_imported(n)).collect();

    for (i, &node) in children.iter().enumerate() {
        if i > 0 && emitter.wants_blank_line_before(children[i - 1], node) {
            emitter.newline();
        }
        let is_directive = matches!(tree.kind(node), NodeKind::Version | NodeKind::Extension | NodeKind::Pragma);
        emitter.emit_top_level(node);
        if !is_directive {
            emitter.newline();
        }
    }
    emitter.out
}
