//! Interactive command shell.
//!
//! Reads one command per line, executes it against the grammar, and renders
//! failures as miette reports. Lines starting with `:` are shell
//! meta-commands rather than grammar input.

use std::io::{self, Write};

use crate::cli::demo::Session;
use crate::cli::output;
use crate::dispatcher::Dispatcher;

/// Runs the shell until EOF or `:quit`.
pub fn run_repl(dispatcher: &Dispatcher<Session>, session: Session) {
    println!("edict shell — type :help for help, :quit to exit");
    println!();

    loop {
        print!("edict> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some(meta) = line.strip_prefix(':') {
                    match handle_meta(meta, dispatcher, &session) {
                        ReplFlow::Continue => continue,
                        ReplFlow::Quit => break,
                    }
                }
                if let Err(err) = dispatcher.parse_execute(session.clone(), line) {
                    output::print_report(err);
                }
            }
            Err(err) => {
                eprintln!("error reading input: {err}");
                break;
            }
        }
    }
}

enum ReplFlow {
    Continue,
    Quit,
}

fn handle_meta(meta: &str, dispatcher: &Dispatcher<Session>, session: &Session) -> ReplFlow {
    let (name, rest) = match meta.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (meta, ""),
    };
    match name {
        "help" | "h" => {
            println!("  :help             show this help");
            println!("  :quit             exit the shell");
            println!("  :usage            show the command grammar");
            println!("  :suggest <text>   show completions for a partial line");
            ReplFlow::Continue
        }
        "quit" | "q" => ReplFlow::Quit,
        "usage" | "u" => {
            let lines: Vec<String> = dispatcher
                .smart_usage(session, dispatcher.root())
                .into_iter()
                .map(|(_, usage)| usage)
                .collect();
            output::print_usage_lines(&lines);
            ReplFlow::Continue
        }
        "suggest" | "s" => {
            let parse = dispatcher.parse(session.clone(), rest);
            match dispatcher.completion_suggestions(&parse) {
                Ok(suggestions) => output::print_suggestions(&suggestions),
                Err(err) => output::print_report(err),
            }
            ReplFlow::Continue
        }
        other => {
            println!("unknown meta-command :{other}; type :help");
            ReplFlow::Continue
        }
    }
}
