//! Command-line arguments for the `edict` binary.
//!
//! Uses `clap` derive for a declarative, type-safe argument surface.

use clap::{Parser, Subcommand};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "edict",
    version,
    about = "Parse, execute, and complete commands against the demo grammar."
)]
pub struct EdictArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// All available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive command shell.
    Repl,
    /// Parse and execute a single command line.
    Run {
        /// The command input, e.g. "add 1 2".
        input: String,
    },
    /// Show completion suggestions for a partial command line.
    Suggest {
        /// The partial command input.
        input: String,
        /// Cursor position; defaults to the end of the input.
        #[arg(long)]
        cursor: Option<usize>,
    },
    /// Render the usage of the demo grammar.
    Usage {
        /// List every executable path instead of the compact form.
        #[arg(long)]
        all: bool,
    },
}
