//! CLI argument definitions for the Bainian application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use bainian_core::types::Style;

/// Answers New Year greetings in a desktop chat client with templated replies.
#[derive(Parser, Debug)]
#[command(name = "bainian", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Reply style (formal, humor). Skips the interactive prompt.
    #[arg(short = 's', long = "style")]
    pub style: Option<Style>,

    /// List the available reply styles and exit.
    #[arg(long = "list-styles")]
    pub list_styles: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > BAINIAN_CONFIG env var > ./bainian.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("BAINIAN_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("bainian.toml")
    }
}
