//! Cursor-sensitive completion.
//!
//! Given a finished parse and a cursor, the engine first locates the
//! *suggestion context* — under which parent node the partial word sits and
//! where it begins — then asks each of that parent's children for proposals
//! and merges the per-node results into one deduplicated, range-consistent,
//! case-insensitively sorted set.

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::context::CommandContext;
use crate::dispatcher::Dispatcher;
use crate::errors::{EdictError, ErrorKind};
use crate::parse::ParseResults;
use crate::reader::StringRange;
use crate::tree::{NodeId, NodeKind};

/// Custom per-node completion, attached via the argument builder's
/// `suggests` hook.
pub type SuggestionProvider<C> = Rc<dyn Fn(&CommandContext<C>, &mut SuggestionsBuilder)>;

/// One completion proposal: replacement text for a range of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub range: StringRange,
    pub text: String,
}

impl Suggestion {
    /// Widens this suggestion to `range`, splicing in the literal input
    /// around the replaced span so text and range stay consistent.
    fn expand(&self, command: &str, range: StringRange) -> Suggestion {
        if range == self.range {
            return self.clone();
        }
        let mut text = String::new();
        if range.start < self.range.start {
            text.push_str(&command[range.start..self.range.start]);
        }
        text.push_str(&self.text);
        if range.end > self.range.end {
            text.push_str(&command[self.range.end..range.end]);
        }
        Suggestion { range, text }
    }
}

/// A merged set of suggestions sharing one replacement range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Suggestions {
    pub range: StringRange,
    pub suggestions: Vec<Suggestion>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Where completion operates: the parent node to take children from, and the
/// offset at which the partial word begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionContext {
    pub parent: NodeId,
    pub start: usize,
}

/// Accumulates proposals for one node against the truncated input.
pub struct SuggestionsBuilder {
    input: String,
    input_lowercase: String,
    start: usize,
    result: Vec<Suggestion>,
}

impl SuggestionsBuilder {
    /// A builder over `input` (already truncated at the cursor), completing
    /// the word that starts at `start`.
    pub fn new(input: &str, start: usize) -> Self {
        Self {
            input: input.to_string(),
            input_lowercase: input.to_ascii_lowercase(),
            start,
            result: Vec::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// The partial word being completed.
    pub fn remaining(&self) -> &str {
        &self.input[self.start..]
    }

    /// The partial word, ASCII-lowercased for prefix tests.
    pub fn remaining_lowercase(&self) -> &str {
        &self.input_lowercase[self.start..]
    }

    /// Proposes `text` as a replacement for the partial word. Proposing
    /// exactly the remaining text is a no-op.
    pub fn suggest(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text != self.remaining() {
            self.result.push(Suggestion {
                range: StringRange::between(self.start, self.input.len()),
                text,
            });
        }
        self
    }

    /// Finishes the builder into a merged set.
    pub fn build(self) -> Suggestions {
        create_suggestions(&self.input, self.result)
    }
}

/// Merges per-node suggestion sets over the same command input.
pub fn merge_suggestions(command: &str, input: Vec<Suggestions>) -> Suggestions {
    if input.is_empty() {
        return Suggestions::default();
    }
    if input.len() == 1 {
        return input.into_iter().next().expect("len checked");
    }
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    for suggestions in input {
        for suggestion in suggestions.suggestions {
            if seen.insert(suggestion.text.clone()) {
                merged.push(suggestion);
            }
        }
    }
    create_suggestions(command, merged)
}

/// Builds a [`Suggestions`] from raw proposals: ranges widen to the common
/// span, texts are spliced to match, duplicates drop, and the result sorts
/// case-insensitively.
pub fn create_suggestions(command: &str, suggestions: Vec<Suggestion>) -> Suggestions {
    if suggestions.is_empty() {
        return Suggestions::default();
    }
    let mut start = usize::MAX;
    let mut end = usize::MIN;
    for suggestion in &suggestions {
        start = start.min(suggestion.range.start);
        end = end.max(suggestion.range.end);
    }
    let range = StringRange::between(start, end);

    let mut seen: HashSet<String> = HashSet::new();
    let mut expanded: Vec<Suggestion> = Vec::new();
    for suggestion in &suggestions {
        if seen.insert(suggestion.text.clone()) {
            expanded.push(suggestion.expand(command, range));
        }
    }
    expanded.sort_by(|a, b| {
        a.text
            .to_ascii_lowercase()
            .cmp(&b.text.to_ascii_lowercase())
    });
    Suggestions {
        range,
        suggestions: expanded,
    }
}

/// Locates the suggestion context for `cursor` within a parse chain.
///
/// Fails with `NoNodeBeforeCursor` when the cursor sits before anything that
/// was parsed.
fn find_suggestion_context<C>(
    ctx: &CommandContext<C>,
    cursor: usize,
) -> Result<SuggestionContext, EdictError> {
    if ctx.range.start > cursor {
        return Err(EdictError::new(
            ErrorKind::NoNodeBeforeCursor,
            ctx.input.clone(),
            cursor,
        ));
    }

    if ctx.range.end < cursor {
        if let Some(child) = ctx.child() {
            return find_suggestion_context(child, cursor);
        }
        if let Some(last) = ctx.nodes.last() {
            return Ok(SuggestionContext {
                parent: last.node,
                start: last.range.end + 1,
            });
        }
        return Ok(SuggestionContext {
            parent: ctx.root,
            start: ctx.range.start,
        });
    }

    let mut prev = ctx.root;
    for node in &ctx.nodes {
        if node.range.start <= cursor && cursor <= node.range.end {
            return Ok(SuggestionContext {
                parent: prev,
                start: node.range.start,
            });
        }
        prev = node.node;
    }
    Ok(SuggestionContext {
        parent: prev,
        start: ctx.range.start,
    })
}

impl<C: Clone> Dispatcher<C> {
    /// Completion suggestions at the end of the parsed input.
    pub fn completion_suggestions(
        &self,
        parse: &ParseResults<C>,
    ) -> Result<Suggestions, EdictError> {
        self.completion_suggestions_cursor(parse, parse.reader.total_len())
    }

    /// Completion suggestions at an arbitrary cursor.
    ///
    /// Suggestions speak about the partial word under the cursor, but may
    /// propose replacements reaching back to the word's start.
    pub fn completion_suggestions_cursor(
        &self,
        parse: &ParseResults<C>,
        cursor: usize,
    ) -> Result<Suggestions, EdictError> {
        let context = find_suggestion_context(&parse.context, cursor)?;
        let start = context.start.min(cursor);

        let full_input = parse.reader.string();
        let truncated = &full_input[..cursor];
        let built = parse.context.build(truncated);

        let children: Vec<NodeId> = self.node(context.parent).children().to_vec();
        let mut all = Vec::with_capacity(children.len());
        for child_id in children {
            let mut builder = SuggestionsBuilder::new(truncated, start);
            match &self.node(child_id).kind {
                NodeKind::Root => continue,
                NodeKind::Literal { literal } => {
                    if literal
                        .to_ascii_lowercase()
                        .starts_with(builder.remaining_lowercase())
                    {
                        builder.suggest(literal.clone());
                    }
                }
                NodeKind::Argument { ty, suggests, .. } => match suggests {
                    Some(provider) => provider(&built, &mut builder),
                    None => ty.suggest(&mut builder),
                },
            }
            all.push(builder.build());
        }

        Ok(merge_suggestions(full_input, all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_exact_remaining() {
        let mut builder = SuggestionsBuilder::new("foo b", 4);
        builder.suggest("b");
        builder.suggest("bar");
        let suggestions = builder.build();
        assert_eq!(suggestions.suggestions.len(), 1);
        assert_eq!(suggestions.suggestions[0].text, "bar");
        assert_eq!(suggestions.range, StringRange::between(4, 5));
    }

    #[test]
    fn test_create_sorts_case_insensitively() {
        let raw = vec![
            Suggestion {
                range: StringRange::at(0),
                text: "Zebra".into(),
            },
            Suggestion {
                range: StringRange::at(0),
                text: "apple".into(),
            },
            Suggestion {
                range: StringRange::at(0),
                text: "Mango".into(),
            },
        ];
        let merged = create_suggestions("", raw);
        let texts: Vec<_> = merged.suggestions.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["apple", "Mango", "Zebra"]);
    }

    #[test]
    fn test_create_dedupes_by_text() {
        let raw = vec![
            Suggestion {
                range: StringRange::at(3),
                text: "x".into(),
            },
            Suggestion {
                range: StringRange::at(3),
                text: "x".into(),
            },
        ];
        let merged = create_suggestions("abc", raw);
        assert_eq!(merged.suggestions.len(), 1);
    }

    #[test]
    fn test_expand_splices_input() {
        let suggestion = Suggestion {
            range: StringRange::between(6, 9),
            text: "replacement".into(),
        };
        let widened = suggestion.expand("prefix mid suffix", StringRange::between(0, 11));
        assert_eq!(widened.range, StringRange::between(0, 11));
        assert_eq!(widened.text, "prefixreplacementd ".to_string());
    }

    #[test]
    fn test_merge_ranges_union_covers_all() {
        let a = Suggestions {
            range: StringRange::between(2, 5),
            suggestions: vec![Suggestion {
                range: StringRange::between(2, 5),
                text: "aaa".into(),
            }],
        };
        let b = Suggestions {
            range: StringRange::between(4, 9),
            suggestions: vec![Suggestion {
                range: StringRange::between(4, 9),
                text: "bbbbb".into(),
            }],
        };
        let merged = merge_suggestions("0123456789", vec![a, b]);
        assert_eq!(merged.range, StringRange::between(2, 9));
        for suggestion in &merged.suggestions {
            assert_eq!(suggestion.range, merged.range);
        }
    }
}
