/// I/O failures reading top-level source files (distinct from the
/// `#include` resolution failures `glslx_parse` already turns into log
/// diagnostics - this is only for the initial file list, e.g. the CLI's
/// own argument list).
#[derive(Debug, thiserror::Error)]
pub enum CompileIoError {
    #[error("could not read '{path}': {source}")]
    Read { path: String, source: std::io::Error },
}
