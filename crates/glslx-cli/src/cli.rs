use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glslx_compile::RenamingMode;
use serde::Deserialize;

/// `F` in spec.md §6 (`--format=F`); `glslx-cli` is the only place that
/// knows how to render each of these, via `crate::output`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    Js,
    #[value(name = "c++")]
    #[serde(rename = "c++")]
    Cpp,
    Skew,
    Rust,
}

/// `M` in spec.md §6 (`--renaming=M`); converts 1:1 to
/// `glslx_compile::RenamingMode`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenamingArg {
    All,
    InternalOnly,
    None,
}

impl From<RenamingArg> for RenamingMode {
    fn from(value: RenamingArg) -> Self {
        match value {
            RenamingArg::All => RenamingMode::All,
            RenamingArg::InternalOnly => RenamingMode::InternalOnly,
            RenamingArg::None => RenamingMode::None,
        }
    }
}

/// Compiles and minifies GLSL ES 1.0 shaders (spec.md §6). Flags left
/// unset here fall back to `glslx.toml`, then to the defaults spec.md
/// itself documents (see `crate::config`).
#[derive(Parser, Debug)]
#[command(name = "glslx", version, about, disable_help_subcommand = true)]
pub struct Cli {
    /// Shader source files to compile.
    pub sources: Vec<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, value_enum)]
    pub renaming: Option<RenamingArg>,

    #[arg(long)]
    pub disable_rewriting: bool,

    #[arg(long)]
    pub pretty_print: bool,

    #[arg(long)]
    pub keep_symbols: bool,
}
