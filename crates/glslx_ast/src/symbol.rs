use std::collections::HashMap;

use bitflags::bitflags;
use glslx_base::Range;

use crate::ids::{NodeId, ScopeId, SymbolId};
use crate::scope::{Scope, ScopeKind};

bitflags! {
    /// Per-symbol attribute bits (spec.md §3, "Symbol"). Several bits are
    /// mutually exclusive by the language's grammar (a variable is not
    /// both `IN` and `OUT`), but the set is still a flat bitset because
    /// several are combined freely (`EXPORTED | IMPORTED` is a real,
    /// meaningful, and distinct state from either alone).
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct SymbolFlags: u32 {
        const ATTRIBUTE = 1 << 0;
        const CONST     = 1 << 1;
        const HIGHP     = 1 << 2;
        const IN        = 1 << 3;
        const INOUT     = 1 << 4;
        const LOWP      = 1 << 5;
        const MEDIUMP   = 1 << 6;
        const OUT       = 1 << 7;
        const UNIFORM   = 1 << 8;
        const VARYING   = 1 << 9;
        const EXPORTED  = 1 << 10;
        const IMPORTED  = 1 << 11;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VariableKind {
    Argument,
    Global,
    Local,
    StructField,
}

#[derive(Clone, Debug)]
pub struct VariableSymbol {
    pub kind: VariableKind,
    pub type_node: NodeId,
    pub array_count_node: Option<NodeId>,
    /// The `VARIABLE` declarator node holding this variable's initializer
    /// expression, if any.
    pub declaring_node: Option<NodeId>,
    /// Set by the resolver when this is a `const` declaration with a
    /// constant initializer (spec.md §4.3).
    pub constant_value: Option<NodeId>,
    /// The fully resolved (array-wrapped) type, set once resolution of the
    /// declaration finishes. Lets a struct field's shape be inspected
    /// (`Type::contains_array`/`contains_sampler`) without revisiting the
    /// tree.
    pub resolved_type: Option<crate::types::Type>,
}

#[derive(Clone, Debug)]
pub struct FunctionSymbol {
    pub arguments: Vec<SymbolId>,
    pub return_type_node: NodeId,
    pub body: Option<NodeId>,
    /// The previous overload of this name in the same scope, forming a
    /// linked chain rather than a `Vec` owned by the scope (spec.md §9's
    /// own suggested representation: "a vector owned by the scope and
    /// resolve by index" — we instead thread the chain through the
    /// symbols themselves, which keeps `Scope::declare` O(1) and avoids a
    /// second arena indirection).
    pub previous_overload: Option<SymbolId>,
    /// Bidirectional link between a forward declaration and its matching
    /// definition (spec.md §3, §9); both sides are updated together by
    /// [`SymbolTable::pair_forward_declaration`].
    pub sibling: Option<SymbolId>,
}

#[derive(Clone, Debug)]
pub struct StructSymbol {
    pub fields: Vec<SymbolId>,
}

#[derive(Clone, Debug)]
pub enum SymbolKind {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
    Struct(StructSymbol),
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub range: Range,
    pub name: String,
    pub scope: ScopeId,
    pub flags: SymbolFlags,
    pub comments: Vec<String>,
    pub required_extension: Option<String>,
    pub use_count: u32,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match &self.kind {
            SymbolKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut VariableSymbol> {
        match &mut self.kind {
            SymbolKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match &self.kind {
            SymbolKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionSymbol> {
        match &mut self.kind {
            SymbolKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructSymbol> {
        match &self.kind {
            SymbolKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_exported(&self) -> bool {
        self.flags.contains(SymbolFlags::EXPORTED)
    }

    pub fn is_imported(&self) -> bool {
        self.flags.contains(SymbolFlags::IMPORTED)
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(SymbolFlags::CONST)
    }

    pub fn is_uniform(&self) -> bool {
        self.flags.contains(SymbolFlags::UNIFORM)
    }
}

/// Owns every [`Symbol`] and [`Scope`] created while parsing/resolving one
/// tree. `SymbolId`s are minted from the shared
/// [`crate::compiler_data::CompilerData`] counter, so they stay globally
/// unique even though each per-entry-point re-parse builds a brand new
/// `SymbolTable` (spec.md §2, §5) — hence the sparse `HashMap` rather than
/// a dense `Vec`.
#[derive(Default)]
pub struct SymbolTable {
    symbols: HashMap<SymbolId, Symbol>,
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { symbols: HashMap::new(), scopes: Vec::new() }
    }

    pub fn new_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::from_usize(self.scopes.len());
        self.scopes.push(Scope::new(id, kind, parent));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn insert(&mut self, symbol: Symbol) -> SymbolId {
        let id = symbol.id;
        self.symbols.insert(id, symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(&id).expect("dangling SymbolId")
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.symbols.get_mut(&id).expect("dangling SymbolId")
    }

    pub fn try_get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(&id)
    }

    /// Declares a non-function symbol into `scope`, or chains a function
    /// overload onto the existing entry. Returns the previous symbol of
    /// the same name in this scope, if any (a caller wanting the
    /// "redeclaration" diagnostic checks this).
    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> (SymbolId, Option<SymbolId>) {
        let is_function = matches!(symbol.kind, SymbolKind::Function(_));
        let name = symbol.name.clone();
        let id = self.insert(symbol);

        let previous = self.scope(scope).lookup_local(&name);
        if is_function {
            if let Some(prev_id) = previous {
                if matches!(self.get(prev_id).kind, SymbolKind::Function(_)) {
                    self.get_mut(id).as_function_mut().unwrap().previous_overload = Some(prev_id);
                }
            }
        }
        self.scope_mut(scope).bind(name, id);
        (id, previous)
    }

    /// All overloads of `name` reachable from `scope`, nearest scope
    /// first, each scope's overload chain walked most-recent-first.
    pub fn overloads(&self, scope: ScopeId, name: &str) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(mut id) = self.scope(s).lookup_local(name) {
                loop {
                    out.push(id);
                    match self.get(id).as_function() {
                        Some(f) => match f.previous_overload {
                            Some(next) => id = next,
                            None => break,
                        },
                        None => break,
                    }
                }
                if !out.is_empty() {
                    break;
                }
            }
            current = self.scope(s).parent;
        }
        out
    }

    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(id) = self.scope(s).lookup_local(name) {
                return Some(id);
            }
            current = self.scope(s).parent;
        }
        None
    }

    /// Co-mutates the bidirectional `sibling` link between a forward
    /// declaration and its implementation (spec.md §9's invariant that
    /// this pairing must go through one helper).
    pub fn pair_forward_declaration(&mut self, declaration: SymbolId, definition: SymbolId) {
        self.get_mut(declaration).as_function_mut().unwrap().sibling = Some(definition);
        self.get_mut(definition).as_function_mut().unwrap().sibling = Some(declaration);
    }

    pub fn mark_used(&mut self, id: SymbolId) {
        self.get_mut(id).use_count += 1;
    }

    /// Reverses [`Self::mark_used`] when the rewriter deletes the single
    /// reference node that caused it (e.g. constant-folding a `Name` into a
    /// literal), so `use_count` keeps reflecting the live tree rather than
    /// the resolve-time high-water mark.
    pub fn unmark_used(&mut self, id: SymbolId) {
        let sym = self.get_mut(id);
        sym.use_count = sym.use_count.saturating_sub(1);
    }

    pub fn symbols_iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn remove(&mut self, id: SymbolId) {
        if let Some(sym) = self.symbols.remove(&id) {
            self.scope_mut(sym.scope).unbind(&sym.name, id);
        }
    }
}
