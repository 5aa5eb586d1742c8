//! `glslx` binary: the CLI entry point over `glslx_compile` (spec.md §6).

mod cli;
mod config;
mod error;
mod output;

use std::io::Write;

use clap::{CommandFactory, Parser};
use glslx_compile::{compile, fs_file_access, read_source_file, CompileOptions, RenamingMode, SourceUnit};

use cli::{Cli, OutputFormat, RenamingArg};
use error::CliError;

fn install_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> Result<i32, CliError> {
    if cli.sources.is_empty() {
        Cli::command().print_help().ok();
        println!();
        return Ok(0);
    }

    let config = config::load();
    let format = cli.format.unwrap_or(config.format.unwrap_or(OutputFormat::Json));
    let renaming_arg = cli.renaming.unwrap_or(config.renaming.unwrap_or(RenamingArg::All));
    let disable_rewriting = cli.disable_rewriting || config.disable_rewriting.unwrap_or(false);
    let pretty_print = cli.pretty_print || config.pretty_print.unwrap_or(false);
    let keep_symbols = cli.keep_symbols || config.keep_symbols.unwrap_or(false);

    let mut units = Vec::with_capacity(cli.sources.len());
    for path in &cli.sources {
        let name = path.to_string_lossy().into_owned();
        let contents = read_source_file(&name)?;
        units.push(SourceUnit::new(name, contents));
    }

    let options = CompileOptions {
        renaming: RenamingMode::from(renaming_arg),
        disable_rewriting,
        keep_whitespace: pretty_print,
        trim_symbols: !keep_symbols,
    };

    let mut access = fs_file_access();
    let result = compile(&units, &options, &mut access);

    if !result.log.is_empty() {
        eprint!("{}", result.log);
    }

    if result.shaders.is_empty() {
        return Ok(1);
    }

    let rendered = output::render(&result, format);
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| CliError::Write { path: path.display().to_string(), source })?;
        }
        None => {
            print!("{rendered}");
            std::io::stdout().flush().ok();
        }
    }

    Ok(0)
}

fn main() -> anyhow::Result<()> {
    install_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if matches!(err.kind(), clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion) { 0 } else { 1 };
            std::process::exit(code);
        }
    };

    let code = run(cli)?;
    std::process::exit(code);
}
