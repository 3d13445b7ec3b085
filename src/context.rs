//! Command contexts.
//!
//! A successful parse yields a chain of [`CommandContext`] values, one link
//! per redirect boundary crossed. During parsing each speculative branch
//! clones its parent context; the argument map is a persistent `im` map, so
//! clones share structure and a losing branch's insertions never leak into
//! the winner.

use im::HashMap;

use crate::args::ArgValue;
use crate::reader::StringRange;
use crate::tree::{Command, NodeId, RedirectModifier};

/// A value decoded for one argument node, with its span in the input.
#[derive(Clone)]
pub struct ParsedArgument {
    pub range: StringRange,
    pub value: ArgValue,
}

/// One node traversed during a parse, with the span it consumed.
#[derive(Debug, Clone, Copy)]
pub struct ParsedCommandNode {
    pub node: NodeId,
    pub range: StringRange,
}

/// The context a command executes in: the host context, every parsed
/// argument, and the chain of redirect continuations.
#[derive(Clone)]
pub struct CommandContext<C> {
    pub(crate) source: C,
    pub(crate) arguments: HashMap<String, ParsedArgument>,
    pub(crate) root: NodeId,
    pub(crate) nodes: Vec<ParsedCommandNode>,
    pub(crate) command: Option<Command<C>>,
    pub(crate) modifier: Option<RedirectModifier<C>>,
    pub(crate) forks: bool,
    pub(crate) input: String,
    pub(crate) range: StringRange,
    pub(crate) child: Option<Box<CommandContext<C>>>,
}

impl<C> CommandContext<C> {
    pub(crate) fn starting_at(source: C, root: NodeId, cursor: usize) -> Self {
        Self {
            source,
            arguments: HashMap::new(),
            root,
            nodes: Vec::new(),
            command: None,
            modifier: None,
            forks: false,
            input: String::new(),
            range: StringRange::at(cursor),
            child: None,
        }
    }

    /// The host context this invocation runs under.
    pub fn source(&self) -> &C {
        &self.source
    }

    /// The full command input. Empty until the context is built for
    /// execution or suggestion queries.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The grammar node this context's parse started from.
    pub fn root_node(&self) -> NodeId {
        self.root
    }

    /// The span covering every node parsed into this context.
    pub fn range(&self) -> StringRange {
        self.range
    }

    /// The nodes traversed, in parse order.
    pub fn nodes(&self) -> &[ParsedCommandNode] {
        &self.nodes
    }

    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// The redirect continuation, if the parse crossed a redirect.
    pub fn child(&self) -> Option<&CommandContext<C>> {
        self.child.as_deref()
    }

    pub fn is_forked(&self) -> bool {
        self.forks
    }

    /// The raw parsed argument, for user-defined value types.
    pub fn argument(&self, name: &str) -> Option<&ParsedArgument> {
        self.arguments.get(name)
    }

    /// The parsed i32 argument, or 0 when absent or of another type.
    pub fn int32(&self, name: &str) -> i32 {
        match self.arguments.get(name).map(|a| &a.value) {
            Some(ArgValue::Int32(v)) => *v,
            _ => 0,
        }
    }

    /// The parsed i64 argument, or 0 when absent or of another type.
    pub fn int64(&self, name: &str) -> i64 {
        match self.arguments.get(name).map(|a| &a.value) {
            Some(ArgValue::Int64(v)) => *v,
            _ => 0,
        }
    }

    /// The parsed bool argument, or false when absent or of another type.
    pub fn boolean(&self, name: &str) -> bool {
        match self.arguments.get(name).map(|a| &a.value) {
            Some(ArgValue::Bool(v)) => *v,
            _ => false,
        }
    }

    /// The parsed f32 argument, or 0.0 when absent or of another type.
    pub fn float32(&self, name: &str) -> f32 {
        match self.arguments.get(name).map(|a| &a.value) {
            Some(ArgValue::Float32(v)) => *v,
            _ => 0.0,
        }
    }

    /// The parsed f64 argument, or 0.0 when absent or of another type.
    pub fn float64(&self, name: &str) -> f64 {
        match self.arguments.get(name).map(|a| &a.value) {
            Some(ArgValue::Float64(v)) => *v,
            _ => 0.0,
        }
    }

    /// The parsed string argument, or empty when absent or of another type.
    pub fn string(&self, name: &str) -> String {
        match self.arguments.get(name).map(|a| &a.value) {
            Some(ArgValue::String(v)) => v.clone(),
            _ => String::new(),
        }
    }

    pub(crate) fn with_argument(&mut self, name: String, parsed: ParsedArgument) {
        self.arguments.insert(name, parsed);
    }

    /// Records a traversed node; the context range widens to encompass it
    /// and the redirect metadata tracks the most recent node.
    pub(crate) fn with_node(
        &mut self,
        parsed: ParsedCommandNode,
        modifier: Option<RedirectModifier<C>>,
        forks: bool,
    ) {
        self.range = StringRange::encompassing(self.range, parsed.range);
        self.nodes.push(parsed);
        self.modifier = modifier;
        self.forks = forks;
    }
}

impl<C: Clone> CommandContext<C> {
    /// Rebuilds the whole chain with the input string filled in, so commands
    /// and suggestion providers see the verbatim input.
    pub(crate) fn build(&self, input: &str) -> Self {
        let mut built = self.clone();
        built.input = input.to_string();
        built.child = self.child.as_ref().map(|c| Box::new(c.build(input)));
        built
    }

    /// A copy of this context re-homed onto another host context, used when
    /// execution steps across a redirect boundary.
    pub(crate) fn rebase(&self, source: C) -> Self {
        let mut rebased = self.clone();
        rebased.source = source;
        rebased
    }
}
