pub mod compiler_data;
pub mod ids;
pub mod scope;
pub mod symbol;
pub mod tree;
pub mod types;

pub use compiler_data::{CompilerData, ExtensionBehavior};
pub use ids::{NodeId, ScopeId, SymbolId};
pub use scope::{Scope, ScopeKind};
pub use symbol::{
    FunctionSymbol, Symbol, SymbolFlags, SymbolKind, SymbolTable, VariableKind, VariableSymbol,
};
pub use tree::{ChildIter, NodeData, NodeKind, Tree};
pub use types::{BaseType, Type};
