use std::collections::HashSet;

use glslx_ast::{
    CompilerData, ExtensionBehavior, FunctionSymbol, NodeId, NodeKind, ScopeId, ScopeKind, Symbol,
    SymbolFlags, SymbolId, SymbolKind, SymbolTable, Tree, VariableKind, VariableSymbol,
};
use glslx_base::{Log, Range, SourceId, SourceSet};
use glslx_lexer::{tokenize, Purpose, Token, TokenKind};

use crate::cursor::TokenCursor;
use crate::include::{FileAccess, IncludeRecord};
use crate::precedence;

/// Tokens that resynchronize the parser after an unexpected-token
/// diagnostic (spec.md §4.2).
const SYNC_KEYWORDS: &[TokenKind] = &[
    TokenKind::Break,
    TokenKind::Continue,
    TokenKind::Discard,
    TokenKind::Return,
    TokenKind::If,
    TokenKind::Else,
    TokenKind::For,
    TokenKind::Do,
    TokenKind::While,
];

pub struct ParseResult {
    pub tree: Tree,
    pub symbols: SymbolTable,
    pub data: CompilerData,
    pub log: Log,
    pub root: NodeId,
    pub global_scope: ScopeId,
    pub includes: Vec<IncludeRecord>,
}

/// Parses every source in `entries` (in order) into one shared tree and
/// global scope (spec.md §2's "parser (per source, sharing a single
/// global tree and scope)"). Each exported-entry-point re-parse
/// (spec.md §2's dataflow) is just another call to this same function
/// over the same source set — fresh `Tree`/`SymbolTable`/`CompilerData`
/// every time, never reused across calls.
pub fn parse(
    sources: &mut SourceSet,
    entries: &[SourceId],
    file_access: &mut dyn FileAccess,
) -> ParseResult {
    let mut tree = Tree::new();
    let mut symbols = SymbolTable::new();
    let mut data = CompilerData::new();
    let mut log = Log::new();

    let global_scope = symbols.new_scope(ScopeKind::Global, None);
    let first_source = entries.first().copied().unwrap_or_else(|| sources.add("<empty>", ""));
    let root = tree.alloc(NodeKind::Block, Range::empty(first_source, 0));
    tree.root = Some(root);
    tree.get_mut(root).scope = Some(global_scope);

    let includes = {
        let mut parser = Parser {
            sources,
            tree: &mut tree,
            symbols: &mut symbols,
            data: &mut data,
            log: &mut log,
            file_access,
            root,
            global_scope,
            cursors: Vec::new(),
            includes: Vec::new(),
            included_keys: HashSet::new(),
        };
        for &source_id in entries {
            parser.parse_one_source(source_id);
        }
        parser.finish_versions_and_extensions();
        parser.includes
    };

    ParseResult { tree, symbols, data, log, root, global_scope, includes }
}

pub(crate) struct Parser<'p> {
    pub(crate) sources: &'p mut SourceSet,
    pub(crate) tree: &'p mut Tree,
    pub(crate) symbols: &'p mut SymbolTable,
    pub(crate) data: &'p mut CompilerData,
    pub(crate) log: &'p mut Log,
    pub(crate) file_access: &'p mut dyn FileAccess,
    pub(crate) root: NodeId,
    pub(crate) global_scope: ScopeId,
    pub(crate) cursors: Vec<TokenCursor>,
    pub(crate) includes: Vec<IncludeRecord>,
    pub(crate) included_keys: HashSet<String>,
}

impl<'p> Parser<'p> {
    pub(crate) fn cursor(&self) -> &TokenCursor {
        self.cursors.last().expect("parser must always have an active cursor while parsing")
    }

    fn cursor_mut(&mut self) -> &mut TokenCursor {
        self.cursors.last_mut().expect("parser must always have an active cursor while parsing")
    }

    pub(crate) fn peek(&self) -> TokenKind {
        self.cursor().current().kind
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.cursor().current().clone()
    }

    fn at_eof(&self) -> bool {
        self.cursor().is_eof()
    }

    fn source_id(&self) -> SourceId {
        self.cursor().source_id
    }

    pub(crate) fn bump(&mut self) -> Token {
        self.cursor_mut().advance()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Token {
        if let Some(tok) = self.eat(kind) {
            return tok;
        }
        let tok = self.peek_token();
        self.log.error(tok.range, format!("expected {what}"));
        tok
    }

    fn synchronize(&mut self) {
        loop {
            match self.peek() {
                TokenKind::EndOfFile => return,
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::LeftBrace | TokenKind::RightBrace => return,
                k if SYNC_KEYWORDS.contains(&k) => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Lexes `source_id` and pushes it as the active cursor. `#include`
    /// pushes a nested source this same way and pops back once its
    /// top-level declarations are exhausted.
    fn parse_one_source(&mut self, source_id: SourceId) {
        let tokens = {
            let source = self.sources.get(source_id);
            tokenize(source_id, source, Purpose::Compile, self.log)
        };
        self.cursors.push(TokenCursor::new(source_id, tokens));
        let scope = self.global_scope;
        while !self.at_eof() {
            if let Some(node) = self.parse_global_declaration(scope) {
                self.tree.append_child(self.root, node);
            }
        }
        self.cursors.pop();
    }

    fn parse_global_declaration(&mut self, scope: ScopeId) -> Option<NodeId> {
        match self.peek() {
            TokenKind::VersionDirective => Some(self.parse_version()),
            TokenKind::ExtensionDirective => {
                let node = self.parse_extension();
                if self.check(TokenKind::LeftBrace) {
                    self.parse_extension_gated_block(scope, node);
                }
                Some(node)
            }
            TokenKind::IncludeDirective => {
                self.parse_include();
                None
            }
            TokenKind::Pragma => Some(self.parse_pragma()),
            TokenKind::Precision => Some(self.parse_precision(scope)),
            TokenKind::Struct => Some(self.parse_struct_decl(scope)),
            _ => self.parse_declaration_or_function(scope),
        }
    }

    /// `#extension NAME : behavior { decls… }` — only used by the embedded
    /// built-in API source (spec.md §6's "extension-gated symbols"), never
    /// by user sources. Every symbol declared in the block has its
    /// `required_extension` set to `NAME`, so the resolver can auto-enable
    /// it the first time user code references one of these symbols.
    fn parse_extension_gated_block(&mut self, scope: ScopeId, extension_node: NodeId) {
        let name = self.tree.get(extension_node).text.clone();
        self.bump(); // `{`
        let before: HashSet<SymbolId> = self.symbols.symbols_iter().map(|s| s.id).collect();
        while !self.check(TokenKind::RightBrace) && !self.at_eof() {
            if let Some(node) = self.parse_global_declaration(scope) {
                self.tree.append_child(self.root, node);
            }
        }
        self.expect(TokenKind::RightBrace, "'}'");
        let new_ids: Vec<SymbolId> =
            self.symbols.symbols_iter().map(|s| s.id).filter(|id| !before.contains(id)).collect();
        for id in new_ids {
            self.symbols.get_mut(id).required_extension = Some(name.clone());
        }
    }

    fn parse_version(&mut self) -> NodeId {
        let tok = self.bump();
        let version: i64 = tok.text.trim().split_whitespace().next().and_then(|s| s.parse().ok()).unwrap_or(100);
        let node = self.tree.alloc(NodeKind::Version, tok.range);
        self.tree.get_mut(node).literal_int = version;
        node
    }

    fn parse_extension(&mut self) -> NodeId {
        let tok = self.bump();
        let mut parts = tok.text.splitn(2, ':');
        let name = parts.next().unwrap_or_default().trim().to_string();
        let behavior_text = parts.next().unwrap_or_default().trim();
        let behavior = match behavior_text {
            "disable" => ExtensionBehavior::Disable,
            "enable" => ExtensionBehavior::Enable,
            "require" => ExtensionBehavior::Require,
            "warn" => ExtensionBehavior::Warn,
            _ => {
                self.log.warning(tok.range, format!("unknown extension behavior '{behavior_text}'"));
                ExtensionBehavior::Default
            }
        };
        self.data.set_behavior(name.clone(), behavior);
        let node = self.tree.alloc(NodeKind::Extension, tok.range);
        self.tree.get_mut(node).text = name;
        self.tree.get_mut(node).literal_int = behavior as i64;
        node
    }

    fn parse_pragma(&mut self) -> NodeId {
        let tok = self.bump();
        let node = self.tree.alloc(NodeKind::Pragma, tok.range);
        self.tree.get_mut(node).text = tok.text;
        node
    }

    /// `#include "path"`: resolves via the injected hook, tokenizes and
    /// parses the result into the same global tree and scope, recording
    /// an [`IncludeRecord`]. Dedups on the resolved path so a file
    /// included twice is only ever parsed once (spec.md §8 invariant 8).
    fn parse_include(&mut self) {
        let tok = self.bump();
        let path = tok.text.trim_matches('"').to_string();
        let relative_to = self.sources.get(self.source_id()).name().to_string();

        if !self.included_keys.insert(path.clone()) {
            return;
        }

        match self.file_access.resolve(&path, &relative_to) {
            Some(contents) => {
                let included_id = self.sources.add(path.clone(), contents);
                let included_range = Range::new(included_id, 0, self.sources.get(included_id).contents().len() as u32);
                self.includes.push(IncludeRecord { original_range: tok.range, included_range });
                self.parse_one_source(included_id);
            }
            None => {
                self.log.error(tok.range, format!("could not find include file '{path}'"));
            }
        }
    }

    fn parse_precision(&mut self, scope: ScopeId) -> NodeId {
        let start = self.peek_token().range;
        self.bump(); // `precision`
        let qualifier = match self.peek() {
            TokenKind::Highp => 2,
            TokenKind::Mediump => 1,
            TokenKind::Lowp => 0,
            _ => {
                self.log.error(self.peek_token().range, "expected a precision qualifier");
                1
            }
        };
        if matches!(self.peek(), TokenKind::Highp | TokenKind::Mediump | TokenKind::Lowp) {
            self.bump();
        }
        let type_node = self.parse_type(scope);
        self.eat(TokenKind::Semicolon);
        let end = self.tree.get(type_node).range;
        let node = self.tree.alloc(NodeKind::Precision, start.merge(&end));
        self.tree.get_mut(node).literal_int = qualifier;
        self.tree.append_child(node, type_node);
        node
    }

    /// Parses a possibly-qualified type-expression: `export const highp
    /// vec3`-style qualifiers are handled by the caller
    /// ([`Parser::parse_qualifiers`]); this only consumes the bare type
    /// name (built-in keyword or struct identifier).
    fn parse_type(&mut self, scope: ScopeId) -> NodeId {
        let tok = self.peek_token();
        if let Some(keyword) = tok.kind.keyword_text() {
            self.bump();
            let node = self.tree.alloc(NodeKind::Type, tok.range);
            self.tree.get_mut(node).text = keyword.to_string();
            return node;
        }
        if tok.kind == TokenKind::Identifier {
            self.bump();
            let node = self.tree.alloc(NodeKind::Type, tok.range);
            self.tree.get_mut(node).text = tok.text.clone();
            if let Some(sym) = self.symbols.lookup(scope, &tok.text) {
                if matches!(self.symbols.get(sym).kind, SymbolKind::Struct(_)) {
                    self.tree.get_mut(node).symbol = Some(sym);
                } else {
                    self.log.error(tok.range, format!("'{}' is not a type", tok.text));
                }
            } else {
                self.log.error(tok.range, format!("undeclared type '{}'", tok.text));
            }
            return node;
        }
        self.log.error(tok.range, "expected a type");
        self.tree.alloc(NodeKind::Type, tok.range)
    }

    /// Consumes any run of qualifier keywords, returning the accumulated
    /// flags. `export`/`import` are folded into the same bitset as the
    /// storage/precision qualifiers (spec.md §3's `Symbol` flag set).
    fn parse_qualifiers(&mut self) -> SymbolFlags {
        let mut flags = SymbolFlags::empty();
        loop {
            let bit = match self.peek() {
                TokenKind::Const => SymbolFlags::CONST,
                TokenKind::Uniform => SymbolFlags::UNIFORM,
                TokenKind::Attribute => SymbolFlags::ATTRIBUTE,
                TokenKind::Varying => SymbolFlags::VARYING,
                TokenKind::In => SymbolFlags::IN,
                TokenKind::Out => SymbolFlags::OUT,
                TokenKind::Inout => SymbolFlags::INOUT,
                TokenKind::Highp => SymbolFlags::HIGHP,
                TokenKind::Mediump => SymbolFlags::MEDIUMP,
                TokenKind::Lowp => SymbolFlags::LOWP,
                TokenKind::Export => SymbolFlags::EXPORTED,
                TokenKind::Import => SymbolFlags::IMPORTED,
                TokenKind::Invariant => {
                    // Accepted but not tracked: spec.md's flag set has no
                    // INVARIANT bit (it affects codegen only, which this
                    // system does not perform).
                    self.bump();
                    continue;
                }
                _ => break,
            };
            self.bump();
            flags |= bit;
        }
        flags
    }

    fn fresh_symbol_id(&mut self) -> SymbolId {
        self.data.fresh_symbol_id()
    }

    /// Decides between a variable-declaration group and a function
    /// declaration/definition by looking past the type for `IDENT (`.
    fn parse_declaration_or_function(&mut self, scope: ScopeId) -> Option<NodeId> {
        if self.at_eof() {
            return None;
        }
        let flags = self.parse_qualifiers();
        if !self.peek().starts_type() && self.peek() != TokenKind::Identifier {
            let tok = self.peek_token();
            self.log.error(tok.range, "expected a declaration");
            self.synchronize();
            return None;
        }
        let type_node = self.parse_type(scope);

        if self.check(TokenKind::Identifier) && self.looks_like_function_header() {
            return Some(self.parse_function(flags, type_node, scope));
        }

        Some(self.parse_variable_group(flags, type_node, scope, VariableKind::Global))
    }

    /// True when the next tokens are `IDENTIFIER (`: a variable
    /// declarator is never itself followed by `(`, so this alone
    /// disambiguates a function header from a declaration.
    fn looks_like_function_header(&self) -> bool {
        self.cursor().peek_kind_at(1) == Some(TokenKind::LeftParen)
    }

    fn parse_struct_decl(&mut self, scope: ScopeId) -> NodeId {
        let start = self.peek_token().range;
        self.bump(); // `struct`
        let name_tok = self.expect(TokenKind::Identifier, "a struct name");
        let id = self.fresh_symbol_id();
        let struct_scope = self.symbols.new_scope(ScopeKind::Struct, Some(scope));
        let symbol = Symbol {
            id,
            range: name_tok.range,
            name: name_tok.text.clone(),
            scope,
            flags: SymbolFlags::empty(),
            comments: Vec::new(),
            required_extension: None,
            use_count: 0,
            kind: SymbolKind::Struct(glslx_ast::symbol::StructSymbol { fields: Vec::new() }),
        };
        self.symbols.declare(scope, symbol);

        let node = self.tree.alloc(NodeKind::Struct, start);
        self.tree.get_mut(node).symbol = Some(id);
        self.tree.get_mut(node).scope = Some(struct_scope);

        self.expect(TokenKind::LeftBrace, "'{'");
        let mut fields = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.at_eof() {
            let field_flags = self.parse_qualifiers();
            let field_type = self.parse_type(struct_scope);
            let group = self.parse_variable_group(field_flags, field_type, struct_scope, VariableKind::StructField);
            for child in self.tree.children(group).collect::<Vec<_>>() {
                if let Some(sym) = self.tree.get(child).symbol {
                    fields.push(sym);
                }
            }
            self.tree.append_child(node, group);
        }
        let close_range = self.expect(TokenKind::RightBrace, "'}'").range;
        self.eat(TokenKind::Semicolon);

        if let SymbolKind::Struct(s) = &mut self.symbols.get_mut(id).kind {
            s.fields = fields;
        }

        self.tree.get_mut(node).range = start.merge(&close_range);
        node
    }

    /// `type name (args…) { body }` or `type name (args…);` (forward
    /// declaration). Pairs a forward declaration with its later
    /// definition via [`glslx_ast::SymbolTable::pair_forward_declaration`].
    fn parse_function(&mut self, flags: SymbolFlags, return_type: NodeId, scope: ScopeId) -> NodeId {
        let name_tok = self.bump(); // identifier, already peeked
        let fn_scope = self.symbols.new_scope(ScopeKind::Function, Some(scope));

        self.expect(TokenKind::LeftParen, "'('");
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let arg_flags = self.parse_qualifiers();
                let arg_type = self.parse_type(fn_scope);
                let arg_name = self.expect(TokenKind::Identifier, "an argument name");
                let array_count = self.parse_optional_array_count(fn_scope);
                let arg_id = self.fresh_symbol_id();
                let symbol = Symbol {
                    id: arg_id,
                    range: arg_name.range,
                    name: arg_name.text.clone(),
                    scope: fn_scope,
                    flags: arg_flags,
                    comments: Vec::new(),
                    required_extension: None,
                    use_count: 0,
                    kind: SymbolKind::Variable(VariableSymbol {
                        kind: VariableKind::Argument,
                        type_node: arg_type,
                        array_count_node: array_count,
                        declaring_node: None,
                        constant_value: None,
                        resolved_type: None,
                    }),
                };
                self.symbols.declare(fn_scope, symbol);
                arguments.push(arg_id);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "')'");

        let id = self.fresh_symbol_id();
        let has_body = self.check(TokenKind::LeftBrace);
        let node = self.tree.alloc(NodeKind::Function, name_tok.range);
        self.tree.get_mut(node).scope = Some(fn_scope);

        let body = if has_body {
            Some(self.parse_block(fn_scope))
        } else {
            self.eat(TokenKind::Semicolon);
            None
        };
        if let Some(b) = body {
            self.tree.append_child(node, b);
        }

        let symbol = Symbol {
            id,
            range: name_tok.range,
            name: name_tok.text.clone(),
            scope,
            flags,
            comments: Vec::new(),
            required_extension: None,
            use_count: 0,
            kind: SymbolKind::Function(FunctionSymbol {
                arguments,
                return_type_node: return_type,
                body,
                previous_overload: None,
                sibling: None,
            }),
        };
        let (_, previous) = self.symbols.declare(scope, symbol);
        self.tree.get_mut(node).symbol = Some(id);

        // Pair a definition with an immediately preceding forward
        // declaration of the same overload shape (spec.md §3 "sibling").
        if let (Some(prev_id), true) = (previous, has_body) {
            if matches!(self.symbols.get(prev_id).kind, SymbolKind::Function(ref f) if f.body.is_none() && f.arguments.len() == self.symbols.get(id).as_function().unwrap().arguments.len())
            {
                self.symbols.pair_forward_declaration(prev_id, id);
            }
        }

        node
    }

    fn parse_optional_array_count(&mut self, scope: ScopeId) -> Option<NodeId> {
        if self.eat(TokenKind::LeftBracket).is_none() {
            return None;
        }
        let expr = if self.check(TokenKind::RightBracket) {
            None
        } else {
            Some(self.parse_expression(scope, precedence::ASSIGN))
        };
        self.expect(TokenKind::RightBracket, "']'");
        expr
    }

    /// `type name1 [= init1], name2 [= init2], …;` — a `VARIABLES` node
    /// wrapping one `VARIABLE` child per declarator. Every declarator
    /// after the first clones the shared type node, since a tree node may
    /// only ever have one parent (spec.md §3 invariant).
    pub(crate) fn parse_variable_group(
        &mut self,
        flags: SymbolFlags,
        type_node: NodeId,
        scope: ScopeId,
        kind: VariableKind,
    ) -> NodeId {
        let start = self.tree.get(type_node).range;
        let group = self.tree.alloc(NodeKind::Variables, start);
        let mut first = true;
        loop {
            let this_type = if first {
                first = false;
                type_node
            } else {
                self.tree.clone_subtree(type_node)
            };
            let name_tok = self.expect(TokenKind::Identifier, "a variable name");
            let array_count = self.parse_optional_array_count(scope);

            let var_node = self.tree.alloc(NodeKind::Variable, name_tok.range);
            self.tree.append_child(var_node, this_type);

            let initializer = if self.eat(TokenKind::Equal).is_some() {
                Some(self.parse_expression(scope, precedence::ASSIGN))
            } else {
                None
            };
            if let Some(init) = initializer {
                self.tree.append_child(var_node, init);
            }

            let id = self.fresh_symbol_id();
            let symbol = Symbol {
                id,
                range: name_tok.range,
                name: name_tok.text.clone(),
                scope,
                flags,
                comments: Vec::new(),
                required_extension: None,
                use_count: 0,
                kind: SymbolKind::Variable(VariableSymbol {
                    kind,
                    type_node: this_type,
                    array_count_node: array_count,
                    declaring_node: Some(var_node),
                    constant_value: None,
                    resolved_type: None,
                }),
            };
            self.symbols.declare(scope, symbol);
            self.tree.get_mut(var_node).symbol = Some(id);
            self.tree.append_child(group, var_node);

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Semicolon, "';'");
        group
    }

    pub(crate) fn parse_block(&mut self, parent_scope: ScopeId) -> NodeId {
        let start = self.expect(TokenKind::LeftBrace, "'{'").range;
        let scope = self.symbols.new_scope(ScopeKind::Local, Some(parent_scope));
        let node = self.tree.alloc(NodeKind::Block, start);
        self.tree.get_mut(node).scope = Some(scope);
        while !self.check(TokenKind::RightBrace) && !self.at_eof() {
            if let Some(stmt) = self.parse_statement(scope) {
                self.tree.append_child(node, stmt);
            }
        }
        let end = self.expect(TokenKind::RightBrace, "'}'").range;
        self.tree.get_mut(node).range = start.merge(&end);
        node
    }

    /// A statement, or a bare block used as a statement (not a
    /// declaration scope in its own right beyond the usual block scope).
    pub(crate) fn parse_statement(&mut self, scope: ScopeId) -> Option<NodeId> {
        match self.peek() {
            TokenKind::LeftBrace => Some(self.parse_block(scope)),
            TokenKind::If => Some(self.parse_if(scope)),
            TokenKind::While => Some(self.parse_while(scope)),
            TokenKind::Do => Some(self.parse_do_while(scope)),
            TokenKind::For => Some(self.parse_for(scope)),
            TokenKind::Break => Some(self.parse_leaf_keyword(NodeKind::Break)),
            TokenKind::Continue => Some(self.parse_leaf_keyword(NodeKind::Continue)),
            TokenKind::Discard => Some(self.parse_leaf_keyword(NodeKind::Discard)),
            TokenKind::Return => Some(self.parse_return(scope)),
            TokenKind::Precision => Some(self.parse_precision(scope)),
            TokenKind::Struct => Some(self.parse_struct_decl(scope)),
            TokenKind::Semicolon => {
                self.bump();
                None
            }
            k if k.starts_type() => Some(self.parse_local_declaration(scope)),
            TokenKind::Const
            | TokenKind::Uniform
            | TokenKind::Attribute
            | TokenKind::Varying
            | TokenKind::In
            | TokenKind::Out
            | TokenKind::Inout
            | TokenKind::Highp
            | TokenKind::Mediump
            | TokenKind::Lowp
            | TokenKind::Invariant => Some(self.parse_local_declaration(scope)),
            TokenKind::Identifier => {
                if self.identifier_starts_declaration(scope) {
                    Some(self.parse_local_declaration(scope))
                } else {
                    Some(self.parse_expression_statement(scope))
                }
            }
            TokenKind::EndOfFile => None,
            _ => {
                let tok = self.peek_token();
                self.log.error(tok.range, "expected a statement");
                self.synchronize();
                None
            }
        }
    }

    fn identifier_starts_declaration(&self, scope: ScopeId) -> bool {
        let cur = self.cursor();
        let text = &cur.current().text;
        matches!(
            self.symbols.lookup(scope, text).map(|id| &self.symbols.get(id).kind),
            Some(SymbolKind::Struct(_))
        ) && cur.peek_kind_at(1) == Some(TokenKind::Identifier)
    }

    fn parse_local_declaration(&mut self, scope: ScopeId) -> NodeId {
        let flags = self.parse_qualifiers();
        let type_node = self.parse_type(scope);
        self.parse_variable_group(flags, type_node, scope, VariableKind::Local)
    }

    fn parse_leaf_keyword(&mut self, kind: NodeKind) -> NodeId {
        let tok = self.bump();
        self.eat(TokenKind::Semicolon);
        self.tree.alloc(kind, tok.range)
    }

    fn parse_return(&mut self, scope: ScopeId) -> NodeId {
        let tok = self.bump();
        let node = self.tree.alloc(NodeKind::Return, tok.range);
        if !self.check(TokenKind::Semicolon) {
            let expr = self.parse_expression(scope, precedence::COMMA);
            self.tree.append_child(node, expr);
        }
        self.expect(TokenKind::Semicolon, "';'");
        node
    }

    fn parse_expression_statement(&mut self, scope: ScopeId) -> NodeId {
        let expr = self.parse_expression(scope, precedence::COMMA);
        let range = self.tree.get(expr).range;
        self.expect(TokenKind::Semicolon, "';'");
        let node = self.tree.alloc(NodeKind::ExpressionStmt, range);
        self.tree.append_child(node, expr);
        node
    }

    fn parse_if(&mut self, scope: ScopeId) -> NodeId {
        let start = self.bump().range; // `if`
        self.expect(TokenKind::LeftParen, "'('");
        let cond = self.parse_expression(scope, precedence::COMMA);
        self.expect(TokenKind::RightParen, "')'");
        let then_branch = self.parse_statement(scope).unwrap_or_else(|| self.tree.alloc(NodeKind::Block, start));
        let node = self.tree.alloc(NodeKind::If, start);
        self.tree.append_child(node, cond);
        self.tree.append_child(node, then_branch);
        if self.eat(TokenKind::Else).is_some() {
            let else_branch = self.parse_statement(scope).unwrap_or_else(|| self.tree.alloc(NodeKind::Block, start));
            self.tree.append_child(node, else_branch);
        }
        node
    }

    fn parse_while(&mut self, scope: ScopeId) -> NodeId {
        let start = self.bump().range; // `while`
        self.expect(TokenKind::LeftParen, "'('");
        let cond = self.parse_expression(scope, precedence::COMMA);
        self.expect(TokenKind::RightParen, "')'");
        let body = self.parse_statement(scope).unwrap_or_else(|| self.tree.alloc(NodeKind::Block, start));
        let node = self.tree.alloc(NodeKind::While, start);
        self.tree.append_child(node, cond);
        self.tree.append_child(node, body);
        node
    }

    fn parse_do_while(&mut self, scope: ScopeId) -> NodeId {
        let start = self.bump().range; // `do`
        let body = self.parse_statement(scope).unwrap_or_else(|| self.tree.alloc(NodeKind::Block, start));
        self.expect(TokenKind::While, "'while'");
        self.expect(TokenKind::LeftParen, "'('");
        let cond = self.parse_expression(scope, precedence::COMMA);
        self.expect(TokenKind::RightParen, "')'");
        self.expect(TokenKind::Semicolon, "';'");
        let node = self.tree.alloc(NodeKind::DoWhile, start);
        self.tree.append_child(node, body);
        self.tree.append_child(node, cond);
        node
    }

    /// `for (setup; test; update) body`. Per spec.md §4.5's
    /// `for(;true;)` rewrite, an omitted `test` is normalized here to a
    /// literal `true` rather than left absent; an omitted `setup` is an
    /// empty `BLOCK` and an omitted `update` is an empty `SEQUENCE` — both
    /// zero-child sentinels the emitter recognizes and prints as nothing,
    /// keeping the node's arity fixed at exactly four children.
    fn parse_for(&mut self, scope: ScopeId) -> NodeId {
        let start = self.bump().range; // `for`
        let for_scope = self.symbols.new_scope(ScopeKind::Local, Some(scope));
        self.expect(TokenKind::LeftParen, "'('");

        let setup = if self.check(TokenKind::Semicolon) {
            self.bump();
            self.tree.alloc(NodeKind::Block, start)
        } else if self.peek().starts_type() {
            self.parse_local_declaration(for_scope)
        } else {
            self.parse_expression_statement(for_scope)
        };

        let test = if self.check(TokenKind::Semicolon) {
            let node = self.tree.alloc(NodeKind::Bool, start);
            self.tree.get_mut(node).literal_int = 1;
            node
        } else {
            self.parse_expression(for_scope, precedence::COMMA)
        };
        self.expect(TokenKind::Semicolon, "';'");

        let update = if self.check(TokenKind::RightParen) {
            self.tree.alloc(NodeKind::Sequence, start)
        } else {
            self.parse_expression(for_scope, precedence::COMMA)
        };
        self.expect(TokenKind::RightParen, "')'");

        let body = self.parse_statement(for_scope).unwrap_or_else(|| self.tree.alloc(NodeKind::Block, start));

        let node = self.tree.alloc(NodeKind::For, start);
        self.tree.get_mut(node).scope = Some(for_scope);
        self.tree.append_child(node, setup);
        self.tree.append_child(node, test);
        self.tree.append_child(node, update);
        self.tree.append_child(node, body);
        node
    }

    /// Collapses every `#version` directive collected across every
    /// source to just the first, reinserted at the head of `root`
    /// (spec.md §4.3 "Versions"). Extension auto-enable insertion after
    /// it is the resolver's job, not the parser's.
    fn finish_versions_and_extensions(&mut self) {
        let root = self.root;
        let versions: Vec<NodeId> = self
            .tree
            .children(root)
            .filter(|&c| self.tree.kind(c) == NodeKind::Version)
            .collect();
        if versions.is_empty() {
            return;
        }
        let first = versions[0];
        for &extra in &versions[1..] {
            self.tree.remove(extra);
        }
        self.tree.remove(first);
        if let Some(head) = self.tree.children(root).next() {
            self.tree.insert_before(head, first);
        } else {
            self.tree.append_child(root, first);
        }
    }
}
