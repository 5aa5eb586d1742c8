//! Dataflow orchestration (spec.md §2): the built-in API source, entry
//! point discovery, per-entry-point re-parsing, and the programmatic
//! `compile`/`compile_ide` facade other crates and the CLI call.

mod builtins;
mod compile;
mod error;
mod fs_access;
mod ide;
mod options;
mod result;

pub use builtins::{API_SOURCE, API_SOURCE_NAME};
pub use compile::compile;
pub use error::CompileIoError;
pub use fs_access::{fs_file_access, read_source_file, FsFileAccess};
pub use ide::{compile_ide, IdeSession};
pub use options::{CompileOptions, RenamingMode, SourceUnit};
pub use result::{CompiledShader, CompileResult};
