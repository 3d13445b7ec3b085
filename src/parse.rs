//! The recursive parse engine.
//!
//! Parsing never fails as a whole: every rejected alternative files its error
//! into the result, and the caller decides what to do with a partial parse.
//! At each node the engine clones the context and reader per candidate child,
//! lets the child consume input, then either recurses (plain child), restarts
//! at the redirect target, or records a leaf. Competing complete branches are
//! ranked by a total order: a branch that consumed all input beats one that
//! did not, and among those a branch with no collected errors wins.

use std::cmp::Ordering;

use crate::context::{CommandContext, ParsedArgument, ParsedCommandNode};
use crate::dispatcher::Dispatcher;
use crate::errors::{EdictError, ErrorKind};
use crate::reader::{StringRange, StringReader, ARGUMENT_SEPARATOR};
use crate::tree::{NodeId, NodeKind};

/// The outcome of a parse: the deepest context chain reached, the reader at
/// its stopping point, and one error per alternative rejected there.
pub struct ParseResults<C> {
    pub context: CommandContext<C>,
    pub reader: StringReader,
    pub errors: Vec<(NodeId, EdictError)>,
}

impl<C> ParseResults<C> {
    /// Whether the whole input was consumed and at least one node matched.
    pub fn is_complete(&self) -> bool {
        !self.reader.can_read() && self.context.has_nodes()
    }
}

impl<C: Clone> Dispatcher<C> {
    /// Parses `input` against the grammar under the given host context.
    ///
    /// The result can be cached and fed to [`Dispatcher::execute`] or the
    /// suggestion queries; parsing is the expensive step.
    pub fn parse(&self, source: C, input: &str) -> ParseResults<C> {
        self.parse_reader(source, StringReader::new(input))
    }

    /// Parses from a pre-positioned reader, so the command may begin at a
    /// non-zero offset within a larger input.
    pub fn parse_reader(&self, source: C, reader: StringReader) -> ParseResults<C> {
        let ctx = CommandContext::starting_at(source, NodeId::ROOT, reader.cursor());
        self.parse_nodes(&reader, NodeId::ROOT, ctx)
    }

    fn parse_nodes(
        &self,
        original: &StringReader,
        node: NodeId,
        ctx_so_far: CommandContext<C>,
    ) -> ParseResults<C> {
        let mut errors: Vec<(NodeId, EdictError)> = Vec::new();
        let mut potentials: Vec<ParseResults<C>> = Vec::new();

        for child_id in self.relevant_nodes(node, original) {
            if !self.node(child_id).can_use(ctx_so_far.source()) {
                continue;
            }
            let mut ctx = ctx_so_far.clone();
            let mut reader = original.clone();

            let mut outcome = self.parse_child(child_id, &mut ctx, &mut reader);
            if outcome.is_ok() && reader.can_read() && reader.peek() != ARGUMENT_SEPARATOR {
                outcome = Err(EdictError::new(
                    ErrorKind::ExpectedArgumentSeparator,
                    reader.string().to_string(),
                    reader.cursor(),
                ));
            }
            if let Err(err) = outcome {
                errors.push((child_id, err));
                continue;
            }

            let child = self.node(child_id);
            ctx.command = child.command().cloned();
            let redirect = child.redirect();

            // With a redirect one more byte (the separator) suffices to
            // continue; otherwise the separator must be followed by input.
            let required = if redirect.is_some() { 1 } else { 2 };
            if reader.can_read_len(required) {
                reader.skip();
                if let Some(target) = redirect {
                    let child_ctx = CommandContext::starting_at(
                        ctx.source().clone(),
                        target,
                        reader.cursor(),
                    );
                    let parse = self.parse_nodes(&reader, target, child_ctx);
                    ctx.child = Some(Box::new(parse.context));
                    return ParseResults {
                        context: ctx,
                        reader: parse.reader,
                        errors: parse.errors,
                    };
                }
                potentials.push(self.parse_nodes(&reader, child_id, ctx));
            } else {
                potentials.push(ParseResults {
                    context: ctx,
                    reader,
                    errors: Vec::new(),
                });
            }
        }

        if !potentials.is_empty() {
            if potentials.len() > 1 {
                potentials.sort_by(rank_potentials);
            }
            return potentials.remove(0);
        }

        ParseResults {
            context: ctx_so_far,
            reader: original.clone(),
            errors,
        }
    }

    fn parse_child(
        &self,
        id: NodeId,
        ctx: &mut CommandContext<C>,
        reader: &mut StringReader,
    ) -> Result<(), EdictError> {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Root => Ok(()),

            NodeKind::Literal { literal } => {
                let start = reader.cursor();
                if reader.can_read_len(literal.len()) {
                    let end = start + literal.len();
                    if &reader.string()[start..end] == literal {
                        reader.set_cursor(end);
                        if !reader.can_read() || reader.peek() == ARGUMENT_SEPARATOR {
                            ctx.with_node(
                                ParsedCommandNode {
                                    node: id,
                                    range: StringRange::between(start, end),
                                },
                                node.modifier().cloned(),
                                node.is_fork(),
                            );
                            return Ok(());
                        }
                        reader.set_cursor(start);
                    }
                }
                Err(EdictError::new(
                    ErrorKind::IncorrectLiteral(literal.clone()),
                    reader.string().to_string(),
                    reader.cursor(),
                ))
            }

            NodeKind::Argument { name, ty, .. } => {
                let start = reader.cursor();
                let value = ty.parse(reader)?;
                let range = StringRange::between(start, reader.cursor());
                ctx.with_argument(name.clone(), ParsedArgument { range, value });
                ctx.with_node(
                    ParsedCommandNode { node: id, range },
                    node.modifier().cloned(),
                    node.is_fork(),
                );
                Ok(())
            }
        }
    }
}

/// Total order over competing parse branches; stable sort preserves
/// encounter order among equals.
fn rank_potentials<C>(a: &ParseResults<C>, b: &ParseResults<C>) -> Ordering {
    match (a.reader.can_read(), b.reader.can_read()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => match (a.errors.is_empty(), b.errors.is_empty()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::integer;
    use crate::builder::{argument, literal};

    #[test]
    fn test_parse_incomplete_literal() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(literal("bar")));

        let parse = d.parse((), "foo ");
        assert_eq!(parse.reader.remaining(), " ");
        assert_eq!(parse.context.nodes().len(), 1);
        assert!(!parse.is_complete());
    }

    #[test]
    fn test_parse_incomplete_argument() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(argument("bar", integer())));

        let parse = d.parse((), "foo ");
        assert_eq!(parse.reader.remaining(), " ");
        assert_eq!(parse.context.nodes().len(), 1);
    }

    #[test]
    fn test_parse_rewinds_failed_branch() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(argument("bar", integer())));

        let parse = d.parse((), "foo abc");
        assert_eq!(parse.reader.cursor(), 4);
        assert_eq!(parse.errors.len(), 1);
        let (_, err) = &parse.errors[0];
        assert_eq!(*err.kind(), ErrorKind::ExpectedInt);
        assert_eq!(err.cursor(), 4);
    }

    #[test]
    fn test_parse_records_argument_span() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(argument("bar", integer())));

        let parse = d.parse((), "foo 123");
        assert!(parse.is_complete());
        let arg = parse.context.argument("bar").unwrap();
        assert_eq!(arg.range, StringRange::between(4, 7));
        assert_eq!(parse.context.int32("bar"), 123);
        assert_eq!(parse.context.range(), StringRange::between(0, 7));
    }

    #[test]
    fn test_equal_branches_preserve_registration_order() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(
            literal("go")
                .then(argument("a", integer()))
                .then(argument("b", integer())),
        );

        // Both argument branches consume "1" completely with no errors, so
        // the tie resolves to the first registered child.
        let parse = d.parse((), "go 1");
        assert!(parse.is_complete());
        assert!(parse.context.argument("a").is_some());
        assert!(parse.context.argument("b").is_none());
    }

    #[test]
    fn test_ambiguous_branch_with_subargument_wins() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(
            literal("test")
                .then(argument("incorrect", integer()))
                .then(argument("right", integer()).then(argument("sub", integer()))),
        );

        let parse = d.parse((), "test 1 2");
        assert!(parse.is_complete());
        assert_eq!(parse.context.int32("right"), 1);
        assert_eq!(parse.context.int32("sub"), 2);
        assert!(parse.context.argument("incorrect").is_none());
    }
}
