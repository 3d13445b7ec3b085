//! Edict — a tree-grammar command parser and dispatcher.
//!
//! Build a grammar out of literal and argument nodes, parse chat-style input
//! against it, execute the matched command, ask for cursor-aware completion
//! suggestions, or render human-readable usage.
//!
//! ```rust
//! use edict::{argument, integer, literal, Dispatcher};
//!
//! let mut dispatcher: Dispatcher<()> = Dispatcher::new();
//! dispatcher.register(literal("double").then(
//!     argument("value", integer()).executes(|ctx| {
//!         println!("{}", ctx.int32("value") * 2);
//!         Ok(())
//!     }),
//! ));
//! dispatcher.parse_execute((), "double 21").unwrap();
//! ```

pub use crate::args::{
    boolean, double, double_in, float, float_in, greedy, integer, integer_in, long, long_in,
    phrase, word, ArgValue, ArgumentType, BoolArgument, Float32Argument, Float64Argument,
    Int32Argument, Int64Argument, StringArgument, StringKind,
};
pub use crate::builder::{argument, literal, ArgumentBuilder, LiteralBuilder, NodeStub};
pub use crate::context::{CommandContext, ParsedArgument, ParsedCommandNode};
pub use crate::dispatcher::Dispatcher;
pub use crate::errors::{print_error, EdictError, ErrorKind};
pub use crate::parse::ParseResults;
pub use crate::reader::{StringRange, StringReader, ARGUMENT_SEPARATOR};
pub use crate::suggest::{
    create_suggestions, merge_suggestions, Suggestion, SuggestionContext, SuggestionProvider,
    Suggestions, SuggestionsBuilder,
};
pub use crate::tree::{Command, CommandNode, NodeId, NodeKind, RedirectModifier, Requirement};

pub mod args;
pub mod builder;
pub mod cli;
pub mod context;
pub mod dispatcher;
pub mod errors;
pub mod parse;
pub mod reader;
pub mod repl;
pub mod suggest;
pub mod tree;
pub mod usage;
