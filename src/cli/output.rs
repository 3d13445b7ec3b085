//! User-facing output for the CLI.
//!
//! Centralizes colorized printing so every subcommand reports the same way:
//! headers colorized through `termcolor`, errors as full miette reports on
//! stderr.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::EdictError;
use crate::suggest::Suggestions;

/// Prints an error as a miette report with the input span highlighted.
pub fn print_report(error: EdictError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

/// Prints a suggestion set with its replacement range.
pub fn print_suggestions(suggestions: &Suggestions) {
    if suggestions.is_empty() {
        println!("(no suggestions)");
        return;
    }
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    print!(
        "replace [{}..{})",
        suggestions.range.start, suggestions.range.end
    );
    let _ = stdout.reset();
    println!(":");
    for suggestion in &suggestions.suggestions {
        println!("  {}", suggestion.text);
    }
}

/// Prints usage lines, one per row.
pub fn print_usage_lines(lines: &[String]) {
    if lines.is_empty() {
        println!("(no commands registered)");
        return;
    }
    for line in lines {
        println!("  {line}");
    }
}
