use glslx_compile::CompileIoError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] CompileIoError),

    #[error("could not write '{path}': {source}")]
    Write { path: String, source: std::io::Error },
}
