/// Defines a `Copy` newtype handle backed by a `u32` index, in the shape
/// of `rustc_index`'s `newtype_index!` macro (see DESIGN.md, glslx_ast
/// entry) — an arena index rather than a pointer, so the tree and symbol
/// table can be plain `Vec`/`HashMap`-backed arenas with no cycles and no
/// lifetime parameter.
macro_rules! newtype_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub fn from_usize(i: usize) -> Self {
                $name(i as u32)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

newtype_id! {
    /// A handle into a [`crate::tree::Tree`]'s node arena.
    NodeId
}
newtype_id! {
    /// A handle into a [`crate::symbol::SymbolTable`]'s symbol arena,
    /// globally unique within one [`crate::compiler_data::CompilerData`]
    /// (spec.md §5's "symbol ids are globally monotonic").
    SymbolId
}
newtype_id! {
    /// A handle into a [`crate::scope::SymbolTable`]'s scope arena.
    ScopeId
}
