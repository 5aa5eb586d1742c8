//! Editor-facing queries over an already-parsed-and-resolved tree: hover,
//! go-to-definition, document symbols, rename, completion, and signature
//! help. Every query is read-only — none of them mutate the `Tree` or
//! `SymbolTable` they're handed.

mod completion_query;
mod locate;
mod position;
mod rename_query;
mod signature_query;
mod symbol_query;
mod symbols_query;
mod type_text;

pub use completion_query::{CompletionItem, CompletionKind, CompletionQuery};
pub use position::{JsonPosition, JsonRange};
pub use rename_query::RenameQuery;
pub use signature_query::{SignatureInfo, SignatureQuery};
pub use symbol_query::{SwizzleInfo, SymbolInfo, SymbolQuery};
pub use symbols_query::{DocumentSymbol, SymbolDisplayKind, SymbolsQuery};
