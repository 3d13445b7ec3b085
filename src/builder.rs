//! Fluent node builders.
//!
//! [`literal`] and [`argument`] start a subtree; `then` nests children in
//! call order, and the remaining methods attach the payload, requirement, and
//! redirect configuration. Builders are plain value descriptions — the
//! dispatcher turns them into arena nodes (merging by name) at registration.

use std::rc::Rc;

use crate::args::ArgumentType;
use crate::context::CommandContext;
use crate::errors::EdictError;
use crate::suggest::{SuggestionProvider, SuggestionsBuilder};
use crate::tree::{Command, CommandNode, NodeId, NodeKind, RedirectModifier, Requirement};

/// Starts a literal node builder.
pub fn literal<C>(name: impl Into<String>) -> LiteralBuilder<C> {
    LiteralBuilder {
        literal: name.into(),
        common: BuilderCommon::new(),
    }
}

/// Starts an argument node builder.
pub fn argument<C>(name: impl Into<String>, ty: Rc<dyn ArgumentType>) -> ArgumentBuilder<C> {
    ArgumentBuilder {
        name: name.into(),
        ty,
        suggests: None,
        common: BuilderCommon::new(),
    }
}

struct BuilderCommon<C> {
    children: Vec<NodeStub<C>>,
    command: Option<Command<C>>,
    requirement: Option<Requirement<C>>,
    redirect: Option<NodeId>,
    modifier: Option<RedirectModifier<C>>,
    forks: bool,
}

impl<C> BuilderCommon<C> {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            command: None,
            requirement: None,
            redirect: None,
            modifier: None,
            forks: false,
        }
    }

    fn forward(
        &mut self,
        target: NodeId,
        modifier: Option<RedirectModifier<C>>,
        forks: bool,
    ) {
        // A builder that already has children cannot forward.
        if !self.children.is_empty() {
            return;
        }
        self.redirect = Some(target);
        self.modifier = modifier;
        self.forks = forks;
    }
}

/// Builds a literal node.
pub struct LiteralBuilder<C> {
    literal: String,
    common: BuilderCommon<C>,
}

/// Builds an argument node.
pub struct ArgumentBuilder<C> {
    name: String,
    ty: Rc<dyn ArgumentType>,
    suggests: Option<SuggestionProvider<C>>,
    common: BuilderCommon<C>,
}

macro_rules! builder_methods {
    ($builder:ident) => {
        impl<C> $builder<C> {
            /// Appends a child subtree. Children keep call order.
            pub fn then(mut self, child: impl Into<NodeStub<C>>) -> Self {
                self.common.children.push(child.into());
                self
            }

            /// Sets the command run when the parse stops at this node.
            pub fn executes(
                mut self,
                command: impl Fn(&CommandContext<C>) -> Result<(), EdictError> + 'static,
            ) -> Self {
                self.common.command = Some(Rc::new(command));
                self
            }

            /// Guards the node behind a host-context predicate.
            pub fn requires(mut self, requirement: impl Fn(&C) -> bool + 'static) -> Self {
                self.common.requirement = Some(Rc::new(requirement));
                self
            }

            /// Redirects parsing to `target` after this node.
            pub fn redirect(mut self, target: NodeId) -> Self {
                self.common.forward(target, None, false);
                self
            }

            /// Redirects to `target`, transforming the host context first.
            pub fn redirect_with_modifier(
                mut self,
                target: NodeId,
                modifier: impl Fn(&CommandContext<C>) -> Result<C, EdictError> + 'static,
            ) -> Self {
                self.common.forward(target, Some(Rc::new(modifier)), false);
                self
            }

            /// Forks to `target`: per-branch errors no longer abort execution.
            pub fn fork(
                mut self,
                target: NodeId,
                modifier: impl Fn(&CommandContext<C>) -> Result<C, EdictError> + 'static,
            ) -> Self {
                self.common.forward(target, Some(Rc::new(modifier)), true);
                self
            }

            /// Raw redirect configuration. Ignored if children were added.
            pub fn forward(
                mut self,
                target: NodeId,
                modifier: Option<RedirectModifier<C>>,
                forks: bool,
            ) -> Self {
                self.common.forward(target, modifier, forks);
                self
            }
        }
    };
}

builder_methods!(LiteralBuilder);
builder_methods!(ArgumentBuilder);

impl<C> ArgumentBuilder<C> {
    /// Overrides the argument type's completion with a custom provider.
    pub fn suggests(
        mut self,
        provider: impl Fn(&CommandContext<C>, &mut SuggestionsBuilder) + 'static,
    ) -> Self {
        self.suggests = Some(Rc::new(provider));
        self
    }
}

/// A built but not yet registered subtree; produced by the builders and
/// consumed by [`crate::Dispatcher::register`].
pub enum NodeStub<C> {
    Literal(LiteralBuilder<C>),
    Argument(ArgumentBuilder<C>),
}

impl<C> From<LiteralBuilder<C>> for NodeStub<C> {
    fn from(builder: LiteralBuilder<C>) -> Self {
        NodeStub::Literal(builder)
    }
}

impl<C> From<ArgumentBuilder<C>> for NodeStub<C> {
    fn from(builder: ArgumentBuilder<C>) -> Self {
        NodeStub::Argument(builder)
    }
}

impl<C> NodeStub<C> {
    pub(crate) fn name(&self) -> &str {
        match self {
            NodeStub::Literal(b) => &b.literal,
            NodeStub::Argument(b) => &b.name,
        }
    }

    /// Splits the stub into a childless arena node and its pending children.
    pub(crate) fn into_node(self) -> (CommandNode<C>, Vec<NodeStub<C>>) {
        let (kind, common) = match self {
            NodeStub::Literal(b) => (NodeKind::Literal { literal: b.literal }, b.common),
            NodeStub::Argument(b) => (
                NodeKind::Argument {
                    name: b.name,
                    ty: b.ty,
                    suggests: b.suggests,
                },
                b.common,
            ),
        };
        let node = CommandNode {
            kind,
            children: Vec::new(),
            lookup: std::collections::HashMap::new(),
            literals: std::collections::HashMap::new(),
            arguments: Vec::new(),
            command: common.command,
            requirement: common.requirement,
            redirect: common.redirect,
            modifier: common.modifier,
            forks: common.forks,
        };
        (node, common.children)
    }

    /// The parts that survive a merge onto an existing node of the same
    /// name: the incoming command (if any) and the grandchildren.
    pub(crate) fn into_merge_parts(self) -> (Option<Command<C>>, Vec<NodeStub<C>>) {
        let common = match self {
            NodeStub::Literal(b) => b.common,
            NodeStub::Argument(b) => b.common,
        };
        (common.command, common.children)
    }
}
