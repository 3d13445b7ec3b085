//! The dispatcher: grammar registration and command execution.
//!
//! Registration folds builder subtrees into the arena, merging same-named
//! nodes. Execution walks a finished parse generation by generation: each
//! redirect boundary hands the child context to the next generation (running
//! its modifier first, if any), and plain contexts run their command. Once a
//! fork is crossed, per-branch failures stop aborting the walk.

use crate::builder::{LiteralBuilder, NodeStub};
use crate::context::CommandContext;
use crate::errors::{EdictError, ErrorKind};
use crate::parse::ParseResults;
use crate::tree::{CommandNode, NodeId};

/// A tree-structured command grammar plus the engines that run it.
///
/// `C` is the caller's host context — whatever identifies who or what is
/// invoking a command. It is threaded through requirements, redirect
/// modifiers, and command bodies.
pub struct Dispatcher<C> {
    pub(crate) nodes: Vec<CommandNode<C>>,
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Dispatcher<C> {
    /// An empty dispatcher holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![CommandNode::root()],
        }
    }

    /// Registers a top-level literal, merging into an existing subtree of
    /// the same name. Returns the id of the literal node, which may be used
    /// as a redirect target.
    pub fn register(&mut self, command: LiteralBuilder<C>) -> NodeId {
        self.add_stub(NodeId::ROOT, NodeStub::Literal(command))
    }

    /// Adds a built subtree under `parent`.
    ///
    /// Merge rules for an existing child of the same name: the incoming
    /// command (when present) replaces the existing one, grandchildren merge
    /// recursively, and the existing node keeps its requirement, redirect,
    /// modifier, and fork flag.
    fn add_stub(&mut self, parent: NodeId, stub: NodeStub<C>) -> NodeId {
        if let Some(&existing) = self.nodes[parent.0].lookup.get(stub.name()) {
            let (command, children) = stub.into_merge_parts();
            if command.is_some() {
                self.nodes[existing.0].command = command;
            }
            for child in children {
                self.add_stub(existing, child);
            }
            return existing;
        }

        let (node, children) = stub.into_node();
        let id = self.attach_child(parent, node);
        for child in children {
            self.add_stub(id, child);
        }
        id
    }
}

impl<C: Clone> Dispatcher<C> {
    /// Parses and executes in one step.
    pub fn parse_execute(&self, source: C, input: &str) -> Result<(), EdictError> {
        self.execute(&self.parse(source, input))
    }

    /// Executes a finished parse.
    ///
    /// Unconsumed input is reported before anything runs: the single
    /// collected branch error if there is exactly one, otherwise
    /// `UnknownCommand` when nothing was parsed at all and `UnknownArgument`
    /// when a prefix matched.
    pub fn execute(&self, parse: &ParseResults<C>) -> Result<(), EdictError> {
        if parse.reader.can_read() {
            return Err(if parse.errors.len() == 1 {
                parse.errors[0].1.clone()
            } else if parse.context.range().is_empty() {
                EdictError::new(
                    ErrorKind::UnknownCommand,
                    parse.reader.string().to_string(),
                    parse.reader.cursor(),
                )
            } else {
                EdictError::new(
                    ErrorKind::UnknownArgument,
                    parse.reader.string().to_string(),
                    parse.reader.cursor(),
                )
            });
        }

        let mut forked = false;
        let mut found_command = false;
        let original = parse.context.build(parse.reader.string());
        let mut contexts = vec![original];

        while !contexts.is_empty() {
            let mut next: Vec<CommandContext<C>> = Vec::new();
            for ctx in &contexts {
                if let Some(child) = ctx.child() {
                    forked |= ctx.is_forked();
                    if !child.has_nodes() {
                        continue;
                    }
                    found_command = true;
                    match ctx.modifier.as_ref() {
                        None => next.push(child.rebase(ctx.source().clone())),
                        Some(modifier) => match modifier(ctx) {
                            Ok(source) => next.push(child.rebase(source)),
                            Err(err) => {
                                if !forked {
                                    return Err(err);
                                }
                                // Forked: this branch is dropped silently.
                            }
                        },
                    }
                } else if let Some(command) = ctx.command.as_ref() {
                    found_command = true;
                    if let Err(err) = command(ctx) {
                        if !forked {
                            return Err(err);
                        }
                    }
                }
            }
            contexts = next;
        }

        if !found_command {
            return Err(EdictError::new(
                ErrorKind::UnknownCommand,
                parse.reader.string().to_string(),
                parse.reader.cursor(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::args::integer;
    use crate::builder::{argument, literal};

    #[test]
    fn test_register_merges_same_literal() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        let first = d.register(literal("base").then(literal("foo")));
        let second = d.register(literal("base").then(literal("bar")));
        assert_eq!(first, second);

        let base = d.find_node(&["base"]).unwrap();
        let names: Vec<_> = d
            .node(base)
            .children()
            .iter()
            .map(|&id| d.node(id).name().to_string())
            .collect();
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("base").then(literal("foo").then(literal("deep"))));
        let before = d.nodes.len();
        d.register(literal("base").then(literal("foo").then(literal("deep"))));
        assert_eq!(d.nodes.len(), before);
    }

    #[test]
    fn test_merge_replaces_command_only_when_present() {
        let hits = Rc::new(Cell::new(0));
        let mut d: Dispatcher<()> = Dispatcher::new();

        let first = hits.clone();
        d.register(literal("base").executes(move |_| {
            first.set(first.get() + 1);
            Ok(())
        }));
        // No command on the incoming node: the original one survives.
        d.register(literal("base").then(literal("sub")));
        d.parse_execute((), "base").unwrap();
        assert_eq!(hits.get(), 1);

        // An incoming command replaces the original.
        let second = hits.clone();
        d.register(literal("base").executes(move |_| {
            second.set(second.get() + 100);
            Ok(())
        }));
        d.parse_execute((), "base").unwrap();
        assert_eq!(hits.get(), 101);
    }

    #[test]
    fn test_merge_preserves_existing_requirement() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("guarded").requires(|_| false).executes(|_| Ok(())));
        // The merge must not lift the existing requirement.
        d.register(literal("guarded").executes(|_| Ok(())));

        let err = d.parse_execute((), "guarded").unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::UnknownCommand);
    }

    #[test]
    fn test_execute_command_failure_propagates() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("fail").executes(|_| Err(EdictError::failure("nope"))));

        let err = d.parse_execute((), "fail").unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::Failure("nope".into()));
    }

    #[test]
    fn test_execute_orphaned_argument_is_unknown_command() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(
            literal("foo")
                .then(argument("bar", integer()))
                .executes(|_| Ok(())),
        );

        // "foo 5" parses fully but the argument node has no command.
        let err = d.parse_execute((), "foo 5").unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::UnknownCommand);
        assert_eq!(err.cursor(), 5);
    }
}
