use std::path::PathBuf;

use serde::Deserialize;

use crate::cli::{OutputFormat, RenamingArg};

/// A project's `glslx.toml` defaults (`SPEC_FULL.md` §5.1): purely
/// additive over spec.md's own flag defaults, never a hard requirement.
#[derive(Deserialize, Default, Debug)]
pub struct ConfigFile {
    pub format: Option<OutputFormat>,
    pub renaming: Option<RenamingArg>,
    #[serde(rename = "disable-rewriting")]
    pub disable_rewriting: Option<bool>,
    #[serde(rename = "pretty-print")]
    pub pretty_print: Option<bool>,
    #[serde(rename = "keep-symbols")]
    pub keep_symbols: Option<bool>,
}

/// Loads `glslx.toml` from the current directory, falling back to
/// `$XDG_CONFIG_HOME/glslx/config.toml` via `dirs`. Returns all-`None`
/// defaults when neither exists, or when the file that does exist fails
/// to parse (logged as a warning, not a hard error - a broken config
/// file should not block an otherwise-valid compile).
pub fn load() -> ConfigFile {
    let candidates = [Some(PathBuf::from("glslx.toml")), dirs::config_dir().map(|dir| dir.join("glslx").join("config.toml"))];

    for candidate in candidates.into_iter().flatten() {
        let Ok(text) = std::fs::read_to_string(&candidate) else { continue };
        match toml::from_str(&text) {
            Ok(config) => return config,
            Err(err) => tracing::warn!(path = %candidate.display(), %err, "ignoring malformed glslx.toml"),
        }
    }
    ConfigFile::default()
}
