use std::path::{Path, PathBuf};

use glslx_parse::FileAccess;

use crate::error::CompileIoError;

/// Real-filesystem [`FileAccess`] (spec.md §6, "File-access hook"):
/// resolves `file_path` relative to the directory containing
/// `relative_to`. `glslx_parse::Parser::parse_include` passes the
/// including source's own stored name as `relative_to`, so this only
/// behaves sensibly when sources are named by their real path on disk -
/// which is exactly what [`read_source_file`] does for the CLI's
/// top-level source list.
#[derive(Default)]
pub struct FsFileAccess;

impl FileAccess for FsFileAccess {
    fn resolve(&mut self, file_path: &str, relative_to: &str) -> Option<String> {
        let base = Path::new(relative_to).parent().unwrap_or_else(|| Path::new(""));
        let full: PathBuf = base.join(file_path);
        std::fs::read_to_string(&full).ok()
    }
}

/// Constructs the real-filesystem file-access hook (`SPEC_FULL.md` §5.2,
/// "glslx_compile::fs_file_access as the production FileAccess impl").
pub fn fs_file_access() -> FsFileAccess {
    FsFileAccess
}

/// Reads one top-level source file from disk, to build the initial
/// `SourceUnit` list a CLI passes to [`crate::compile`].
pub fn read_source_file(path: &str) -> Result<String, CompileIoError> {
    std::fs::read_to_string(path).map_err(|source| CompileIoError::Read { path: path.to_string(), source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn resolves_an_include_relative_to_its_including_file() {
        let dir = std::env::temp_dir().join(format!("glslx_fs_access_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let included = dir.join("common.glsl");
        std::fs::File::create(&included).unwrap().write_all(b"float one = 1.0;").unwrap();

        let main_path = dir.join("main.glsl").to_string_lossy().into_owned();
        let mut access = FsFileAccess;
        let contents = access.resolve("common.glsl", &main_path);
        assert_eq!(contents.as_deref(), Some("float one = 1.0;"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_include_resolves_to_none() {
        let mut access = FsFileAccess;
        assert_eq!(access.resolve("does/not/exist.glsl", "main.glsl"), None);
    }
}
