//! The grammar tree.
//!
//! Nodes live in an arena owned by the dispatcher; every edge — child or
//! redirect — is a [`NodeId`]. Redirect cycles (a node pointing back at the
//! root is the canonical case) are therefore plain index references, and
//! traversal is bounded by cursor progress over the input, never by tree
//! shape. Each node keeps its children both in insertion order and behind a
//! name lookup, with literals indexed separately for one-probe dispatch.

use std::collections::HashMap;
use std::rc::Rc;

use crate::args::ArgumentType;
use crate::context::CommandContext;
use crate::dispatcher::Dispatcher;
use crate::errors::EdictError;
use crate::reader::{StringReader, ARGUMENT_SEPARATOR};
use crate::suggest::SuggestionProvider;

/// The executable payload of a node.
pub type Command<C> = Rc<dyn Fn(&CommandContext<C>) -> Result<(), EdictError>>;

/// A predicate deciding whether the invoking host context may use a node.
pub type Requirement<C> = Rc<dyn Fn(&C) -> bool>;

/// Transforms the host context at a redirect boundary.
pub type RedirectModifier<C> = Rc<dyn Fn(&CommandContext<C>) -> Result<C, EdictError>>;

/// Stable handle to a node in the dispatcher's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The dispatcher root. Exactly one exists per dispatcher and it can
    /// never be a child of another node.
    pub const ROOT: NodeId = NodeId(0);
}

/// What a node matches: nothing (root), a fixed word, or a typed argument.
pub enum NodeKind<C> {
    Root,
    Literal {
        literal: String,
    },
    Argument {
        name: String,
        ty: Rc<dyn ArgumentType>,
        suggests: Option<SuggestionProvider<C>>,
    },
}

/// A node of the grammar tree.
pub struct CommandNode<C> {
    pub(crate) kind: NodeKind<C>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) lookup: HashMap<String, NodeId>,
    pub(crate) literals: HashMap<String, NodeId>,
    pub(crate) arguments: Vec<NodeId>,
    pub(crate) command: Option<Command<C>>,
    pub(crate) requirement: Option<Requirement<C>>,
    pub(crate) redirect: Option<NodeId>,
    pub(crate) modifier: Option<RedirectModifier<C>>,
    pub(crate) forks: bool,
}

impl<C> CommandNode<C> {
    pub(crate) fn root() -> Self {
        Self {
            kind: NodeKind::Root,
            children: Vec::new(),
            lookup: HashMap::new(),
            literals: HashMap::new(),
            arguments: Vec::new(),
            command: None,
            requirement: None,
            redirect: None,
            modifier: None,
            forks: false,
        }
    }

    /// The node's name: the literal itself, the argument name, or empty for
    /// the root.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Root => "",
            NodeKind::Literal { literal } => literal,
            NodeKind::Argument { name, .. } => name,
        }
    }

    /// Usage rendering of just this node: the literal, or `[name]`.
    pub fn usage_text(&self) -> String {
        match &self.kind {
            NodeKind::Root => String::new(),
            NodeKind::Literal { literal } => literal.clone(),
            NodeKind::Argument { name, .. } => format!("[{name}]"),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }

    pub fn is_argument(&self) -> bool {
        matches!(self.kind, NodeKind::Argument { .. })
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn command(&self) -> Option<&Command<C>> {
        self.command.as_ref()
    }

    pub fn redirect(&self) -> Option<NodeId> {
        self.redirect
    }

    pub fn modifier(&self) -> Option<&RedirectModifier<C>> {
        self.modifier.as_ref()
    }

    pub fn is_fork(&self) -> bool {
        self.forks
    }

    /// Whether the given host context passes this node's requirement.
    pub fn can_use(&self, source: &C) -> bool {
        match &self.requirement {
            Some(requirement) => requirement(source),
            None => true,
        }
    }
}

impl<C> Dispatcher<C> {
    /// The root node handle.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Borrows a node from the arena.
    pub fn node(&self, id: NodeId) -> &CommandNode<C> {
        &self.nodes[id.0]
    }

    /// Inserts `node` as a fresh child of `parent`, keeping the ordered list
    /// and the name/literal indexes in sync.
    pub(crate) fn attach_child(&mut self, parent: NodeId, node: CommandNode<C>) -> NodeId {
        let name = node.name().to_string();
        let is_literal = node.is_literal();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);

        let parent = &mut self.nodes[parent.0];
        parent.children.push(id);
        parent.lookup.insert(name.clone(), id);
        if is_literal {
            parent.literals.insert(name, id);
        } else {
            parent.arguments.push(id);
        }
        id
    }

    /// The children worth trying at the reader's position.
    ///
    /// If any literal child matches the next whitespace-delimited word
    /// exactly, only that literal is tried; otherwise all argument children
    /// are tried in insertion order.
    pub(crate) fn relevant_nodes(&self, node: NodeId, reader: &StringReader) -> Vec<NodeId> {
        let n = &self.nodes[node.0];
        if !n.literals.is_empty() {
            let input = reader.string();
            let start = reader.cursor();
            let end = input[start..]
                .find(ARGUMENT_SEPARATOR)
                .map(|i| start + i)
                .unwrap_or(input.len());
            if let Some(&literal) = n.literals.get(&input[start..end]) {
                return vec![literal];
            }
        }
        n.arguments.clone()
    }

    /// The chain of node names leading from the root to `target`.
    ///
    /// Inverse of [`Self::find_node`]: for any node reachable through child
    /// edges, `find_node(&path(n)) == Some(n)`. Redirect edges are not
    /// followed. Returns an empty path if `target` is the root or detached.
    pub fn path(&self, target: NodeId) -> Vec<String> {
        let mut trail = Vec::new();
        self.find_path(NodeId::ROOT, target, &mut trail);
        trail
    }

    fn find_path(&self, current: NodeId, target: NodeId, trail: &mut Vec<String>) -> bool {
        if current == target {
            return true;
        }
        for &child in &self.nodes[current.0].children {
            trail.push(self.nodes[child.0].name().to_string());
            if self.find_path(child, target, trail) {
                return true;
            }
            trail.pop();
        }
        false
    }

    /// Resolves a name path from the root to a node, if it exists.
    pub fn find_node<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for name in path {
            current = *self.nodes[current.0].lookup.get(name.as_ref())?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::integer;
    use crate::builder::{argument, literal};

    #[test]
    fn test_relevant_nodes_literal_short_circuit() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(argument("bar", integer())));
        d.register(literal("fop"));

        let reader = StringReader::new("foo 5");
        let relevant = d.relevant_nodes(NodeId::ROOT, &reader);
        assert_eq!(relevant.len(), 1);
        assert_eq!(d.node(relevant[0]).name(), "foo");
    }

    #[test]
    fn test_relevant_nodes_fall_back_to_arguments() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(argument("a", integer())).then(argument("b", integer())));
        let foo = d.find_node(&["foo"]).unwrap();

        let reader = StringReader::at("foo 5", 4);
        let relevant = d.relevant_nodes(foo, &reader);
        assert_eq!(relevant.len(), 2);
        assert_eq!(d.node(relevant[0]).name(), "a");
        assert_eq!(d.node(relevant[1]).name(), "b");
    }

    #[test]
    fn test_path_round_trip() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(literal("bar")));

        let bar = d.find_node(&["foo", "bar"]).unwrap();
        assert_eq!(d.path(bar), vec!["foo".to_string(), "bar".to_string()]);
        assert_eq!(d.find_node(&d.path(bar)), Some(bar));
    }

    #[test]
    fn test_find_node_missing() {
        let d: Dispatcher<()> = Dispatcher::new();
        assert_eq!(d.find_node(&["foo", "bar"]), None);
    }

    #[test]
    fn test_usage_text_by_kind() {
        let mut d: Dispatcher<()> = Dispatcher::new();
        d.register(literal("foo").then(argument("bar", integer())));

        let foo = d.find_node(&["foo"]).unwrap();
        let bar = d.find_node(&["foo", "bar"]).unwrap();
        assert_eq!(d.node(foo).usage_text(), "foo");
        assert_eq!(d.node(bar).usage_text(), "[bar]");
        assert_eq!(d.node(NodeId::ROOT).usage_text(), "");
    }
}
