use std::collections::HashMap;

use crate::ids::SymbolId;

/// Per-`#extension` state (spec.md GLOSSARY, "Extension behavior").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExtensionBehavior {
    Default,
    Disable,
    Enable,
    Require,
    Warn,
}

/// Process-wide mutable state shared by the parser and resolver across
/// every source and every per-entry-point re-parse of one compile
/// (spec.md §5): the symbol id generator, and the extension behavior map.
/// Single-threaded and non-reentrant by construction — there is no
/// interior mutability here beyond what `&mut CompilerData` already grants
/// its sole owner.
pub struct CompilerData {
    next_symbol_id: u32,
    pub extension_behavior: HashMap<String, ExtensionBehavior>,
}

impl Default for CompilerData {
    fn default() -> Self {
        CompilerData::new()
    }
}

impl CompilerData {
    pub fn new() -> Self {
        CompilerData { next_symbol_id: 0, extension_behavior: HashMap::new() }
    }

    /// Mints a fresh, globally-unique (within this `CompilerData`)
    /// `SymbolId`. Monotonic, but not stable across runs (spec.md §5).
    pub fn fresh_symbol_id(&mut self) -> SymbolId {
        let id = SymbolId::from_usize(self.next_symbol_id as usize);
        self.next_symbol_id += 1;
        id
    }

    pub fn behavior_of(&self, extension: &str) -> ExtensionBehavior {
        self.extension_behavior.get(extension).copied().unwrap_or(ExtensionBehavior::Default)
    }

    pub fn set_behavior(&mut self, extension: String, behavior: ExtensionBehavior) {
        self.extension_behavior.insert(extension, behavior);
    }
}
