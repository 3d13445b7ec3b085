//! The Edict command-line interface.
//!
//! Entry point for the binary: dispatches the clap subcommands against the
//! built-in demo grammar.

use clap::Parser;

use crate::cli::args::{Command, EdictArgs};
use crate::cli::demo::{build_demo_dispatcher, Session};
use crate::reader::StringReader;
use crate::repl;

pub mod args;
pub mod demo;
pub mod output;

/// The main entry point for the CLI. Returns the process exit code.
pub fn run() -> i32 {
    let args = EdictArgs::parse();
    let dispatcher = build_demo_dispatcher();
    let session = Session::default();

    match args.command {
        Command::Repl => {
            repl::run_repl(&dispatcher, session);
            0
        }
        Command::Run { input } => match dispatcher.parse_execute(session, &input) {
            Ok(()) => 0,
            Err(err) => {
                output::print_report(err);
                1
            }
        },
        Command::Suggest { input, cursor } => {
            let cursor = cursor.unwrap_or(input.len()).min(input.len());
            let parse = dispatcher.parse_reader(session, StringReader::new(input));
            match dispatcher.completion_suggestions_cursor(&parse, cursor) {
                Ok(suggestions) => {
                    output::print_suggestions(&suggestions);
                    0
                }
                Err(err) => {
                    output::print_report(err);
                    1
                }
            }
        }
        Command::Usage { all } => {
            let root = dispatcher.root();
            if all {
                let lines = dispatcher.all_usage(&session, root, true);
                output::print_usage_lines(&lines);
            } else {
                let lines: Vec<String> = dispatcher
                    .smart_usage(&session, root)
                    .into_iter()
                    .map(|(_, usage)| usage)
                    .collect();
                output::print_usage_lines(&lines);
            }
            0
        }
    }
}
