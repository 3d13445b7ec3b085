//! Usage rendering.
//!
//! Two renderings of the executable surface under a node, both in child
//! insertion order. The flat form lists one line per executable path; the
//! smart form compacts each top-level child into a single string using
//! `[optional]`, `(either|or)`, `...` for a root loop, and `-> target` for
//! other redirects.

use crate::dispatcher::Dispatcher;
use crate::tree::NodeId;

const USAGE_OPTIONAL_OPEN: char = '[';
const USAGE_OPTIONAL_CLOSE: char = ']';
const USAGE_REQUIRED_OPEN: char = '(';
const USAGE_REQUIRED_CLOSE: char = ')';
const USAGE_OR: char = '|';

impl<C> Dispatcher<C> {
    /// All executable command lines reachable under `node`, one string per
    /// path, relative to the node. With `restricted`, subtrees the host
    /// context cannot use are skipped.
    pub fn all_usage(&self, source: &C, node: NodeId, restricted: bool) -> Vec<String> {
        let mut result = Vec::new();
        self.all_usage_walk(source, node, &mut result, "", restricted);
        result
    }

    fn all_usage_walk(
        &self,
        source: &C,
        node: NodeId,
        result: &mut Vec<String>,
        prefix: &str,
        restricted: bool,
    ) {
        let n = self.node(node);
        if restricted && !n.can_use(source) {
            return;
        }
        if n.command().is_some() {
            result.push(prefix.to_string());
        }
        if let Some(target) = n.redirect() {
            let redirect = if target == NodeId::ROOT {
                "...".to_string()
            } else {
                format!("-> {}", self.node(target).usage_text())
            };
            let line = if prefix.is_empty() {
                format!("{} {redirect}", n.usage_text())
            } else {
                format!("{prefix} {redirect}")
            };
            result.push(line);
        } else {
            for &child in n.children() {
                let text = self.node(child).usage_text();
                let child_prefix = if prefix.is_empty() {
                    text
                } else {
                    format!("{prefix} {text}")
                };
                self.all_usage_walk(source, child, result, &child_prefix, restricted);
            }
        }
    }

    /// A compacted usage string per usable child of `node`, in insertion
    /// order.
    pub fn smart_usage(&self, source: &C, node: NodeId) -> Vec<(NodeId, String)> {
        let optional = self.node(node).command().is_some();
        let mut result = Vec::new();
        for &child in self.node(node).children() {
            if let Some(usage) = self.smart_usage_walk(source, child, optional, false) {
                result.push((child, usage));
            }
        }
        result
    }

    fn smart_usage_walk(
        &self,
        source: &C,
        node: NodeId,
        optional: bool,
        deep: bool,
    ) -> Option<String> {
        let n = self.node(node);
        if !n.can_use(source) {
            return None;
        }

        let self_text = if optional {
            format!(
                "{USAGE_OPTIONAL_OPEN}{}{USAGE_OPTIONAL_CLOSE}",
                n.usage_text()
            )
        } else {
            n.usage_text()
        };
        if deep {
            return Some(self_text);
        }

        let child_optional = n.command().is_some();
        let (open, close) = if child_optional {
            (USAGE_OPTIONAL_OPEN, USAGE_OPTIONAL_CLOSE)
        } else {
            (USAGE_REQUIRED_OPEN, USAGE_REQUIRED_CLOSE)
        };

        if let Some(target) = n.redirect() {
            let redirect = if target == NodeId::ROOT {
                "...".to_string()
            } else {
                format!("-> {}", self.node(target).usage_text())
            };
            return Some(format!("{self_text} {redirect}"));
        }

        let children: Vec<NodeId> = n
            .children()
            .iter()
            .copied()
            .filter(|&child| self.node(child).can_use(source))
            .collect();

        if children.len() == 1 {
            if let Some(usage) =
                self.smart_usage_walk(source, children[0], child_optional, child_optional)
            {
                return Some(format!("{self_text} {usage}"));
            }
        } else if children.len() > 1 {
            let mut child_usage: Vec<String> = Vec::new();
            for &child in &children {
                if let Some(usage) = self.smart_usage_walk(source, child, optional, true) {
                    if !child_usage.contains(&usage) {
                        child_usage.push(usage);
                    }
                }
            }
            if child_usage.len() == 1 {
                let only = child_usage.into_iter().next().expect("len checked");
                let wrapped = if child_optional {
                    format!("{USAGE_OPTIONAL_OPEN}{only}{USAGE_OPTIONAL_CLOSE}")
                } else {
                    only
                };
                return Some(format!("{self_text} {wrapped}"));
            }
            let mut alternatives = String::new();
            alternatives.push(open);
            for (i, &child) in children.iter().enumerate() {
                if i != 0 {
                    alternatives.push(USAGE_OR);
                }
                alternatives.push_str(&self.node(child).usage_text());
            }
            alternatives.push(close);
            return Some(format!("{self_text} {alternatives}"));
        }

        Some(self_text)
    }
}
