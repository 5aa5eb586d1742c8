use std::collections::HashMap;

use crate::ids::{ScopeId, SymbolId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeKind {
    Global,
    Struct,
    Function,
    Local,
}

/// A lexical scope: a parent pointer plus a name-keyed map (spec.md §3).
/// Functions share a single overload set keyed by name — `bind` simply
/// overwrites the previous entry, and `SymbolTable::declare` is
/// responsible for threading the displaced symbol onto the new one's
/// `previous_overload` chain before calling `bind`.
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    names: HashMap<String, SymbolId>,
}

impl Scope {
    pub fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope { id, kind, parent, names: HashMap::new() }
    }

    pub fn lookup_local(&self, name: &str) -> Option<SymbolId> {
        self.names.get(name).copied()
    }

    pub fn bind(&mut self, name: String, id: SymbolId) {
        self.names.insert(name, id);
    }

    pub fn unbind(&mut self, name: &str, id: SymbolId) {
        if self.names.get(name) == Some(&id) {
            self.names.remove(name);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.names.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
