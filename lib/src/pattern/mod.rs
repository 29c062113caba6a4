/*! The pattern AST.

A pattern is a tree of [`Node`]s. Leaves require a single token, either a
concrete value or the wildcard; interior nodes are [`Group`]s combining their
elements by concatenation or alternation. Every node, regardless of its kind,
carries a [`Repetition`] mode and a greediness flag.

Patterns are built from their textual form with [`Pattern::parse`] or
programmatically with the [`Node`] constructors, and are immutable during
compilation and matching. [`Pattern::to_text`] renders the structural inverse
of [`Pattern::parse`].
*/

use itertools::Itertools;

use crate::errors::ParseError;
use crate::tokens::TokenCodec;

pub(crate) mod parser;

#[cfg(test)]
mod tests;

/// How many times a node may match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repetition {
    /// Exactly one matching occurrence required.
    #[default]
    Once,
    /// One or more matching occurrences required (`+`).
    OneOrMore,
    /// Zero or more matching occurrences allowed (`*`).
    ZeroOrMore,
    /// Zero or one matching occurrence allowed (`?`).
    ZeroOrOne,
}

impl Repetition {
    /// The textual suffix for this repetition mode.
    fn suffix(&self) -> &'static str {
        match self {
            Repetition::Once => "",
            Repetition::OneOrMore => "+",
            Repetition::ZeroOrMore => "*",
            Repetition::ZeroOrOne => "?",
        }
    }
}

/// How the elements of a [`Group`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// All elements must match, in order.
    #[default]
    Concatenation,
    /// Exactly one of the elements must match.
    Alternation,
}

/// A single element of a pattern.
///
/// Repetition and greediness are properties of the node itself, independent
/// of whether it is a token or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T> {
    /// How many times this node may match.
    pub repetition: Repetition,
    /// Whether this node prefers to consume as many tokens as possible.
    pub greedy: bool,
    /// What this node actually is.
    pub kind: NodeKind<T>,
}

/// The kind of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind<T> {
    /// A leaf requiring a single token.
    Token(TokenNode<T>),
    /// A composite of further nodes.
    Group(Group<T>),
}

/// A leaf node requiring one token from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenNode<T> {
    /// Requires a token equal to the given value.
    Value(T),
    /// Accepts any single token (`.`).
    Any,
}

/// An ordered collection of nodes, combined by concatenation or alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    /// The elements of the group. Order is significant.
    pub elements: Vec<Node<T>>,
    /// How the elements are combined.
    pub mode: GroupMode,
}

/// The root of one pattern: a [`Group`] plus the two anchors.
///
/// Only the outermost pattern receives anchor compilation; converting a
/// `Pattern` into a [`Node`] for embedding in another group drops the
/// anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern<T> {
    /// The pattern body.
    pub root: Group<T>,
    /// When true, a match must start with the first token of the stream
    /// (`^`).
    pub match_from_start: bool,
    /// When true, a match must end with the last token of the stream (`$`).
    pub match_till_end: bool,
}

impl<T> Node<T> {
    /// Creates a leaf node requiring a token equal to `value`.
    pub fn token(value: T) -> Self {
        Self {
            repetition: Repetition::Once,
            greedy: true,
            kind: NodeKind::Token(TokenNode::Value(value)),
        }
    }

    /// Creates a leaf node accepting any single token.
    pub fn any() -> Self {
        Self {
            repetition: Repetition::Once,
            greedy: true,
            kind: NodeKind::Token(TokenNode::Any),
        }
    }

    /// Creates a group node combining `elements` with the given `mode`.
    pub fn group(mode: GroupMode, elements: Vec<Node<T>>) -> Self {
        Self {
            repetition: Repetition::Once,
            greedy: true,
            kind: NodeKind::Group(Group { elements, mode }),
        }
    }

    /// Sets the repetition mode of this node.
    pub fn repeat(mut self, repetition: Repetition) -> Self {
        self.repetition = repetition;
        self
    }

    /// Marks this node as lazy: when both consuming and not consuming are
    /// viable, the shorter interpretation is preferred.
    pub fn lazy(mut self) -> Self {
        self.greedy = false;
        self
    }

    fn to_text<C>(&self, codec: &C) -> String
    where
        C: TokenCodec<Token = T>,
    {
        let mut text = match &self.kind {
            NodeKind::Token(TokenNode::Any) => ".".to_owned(),
            NodeKind::Token(TokenNode::Value(value)) => codec.render(value),
            NodeKind::Group(group) => group.to_text(codec),
        };
        text.push_str(self.repetition.suffix());
        if !self.greedy && self.repetition != Repetition::Once {
            text.push('?');
        }
        text
    }
}

impl<T> Group<T> {
    fn separator(&self) -> &'static str {
        match self.mode {
            GroupMode::Concatenation => " ",
            GroupMode::Alternation => "|",
        }
    }

    fn to_text<C>(&self, codec: &C) -> String
    where
        C: TokenCodec<Token = T>,
    {
        let body = self
            .elements
            .iter()
            .map(|element| element.to_text(codec))
            .join(self.separator());
        format!("({body})")
    }
}

impl<T> Pattern<T> {
    /// Creates an unanchored pattern from a root group.
    pub fn new(root: Group<T>) -> Self {
        Self { root, match_from_start: false, match_till_end: false }
    }

    /// Parses a pattern from its textual form.
    ///
    /// See the crate-level documentation for the grammar. Parsing fails with
    /// a descriptive [`ParseError`] on unbalanced parentheses, on a body
    /// that is neither a concatenation nor an alternation, and on token text
    /// rejected by the codec; it never silently falls back.
    pub fn parse<C>(text: &str, codec: &C) -> Result<Self, ParseError>
    where
        C: TokenCodec<Token = T>,
    {
        parser::parse_pattern(text, codec)
    }

    /// Renders this pattern to its textual form, the structural inverse of
    /// [`Pattern::parse`].
    pub fn to_text<C>(&self, codec: &C) -> String
    where
        C: TokenCodec<Token = T>,
    {
        let wrapped = self.root.to_text(codec);
        // The root group is always rendered wrapped in parentheses; the
        // pattern form drops them, except when the remaining body would
        // itself read as a single group and re-parsing would collapse one
        // nesting level.
        let stripped = &wrapped[1..wrapped.len() - 1];
        let body = if parser::is_single_group(stripped) {
            wrapped.as_str()
        } else {
            stripped
        };
        let mut text = String::new();
        if self.match_from_start {
            text.push('^');
        }
        text.push_str(body);
        if self.match_till_end {
            text.push('$');
        }
        text
    }
}

impl<T> From<Pattern<T>> for Node<T> {
    /// Embeds a pattern as a plain group node, dropping its anchors.
    fn from(pattern: Pattern<T>) -> Self {
        Node::group(pattern.root.mode, pattern.root.elements)
    }
}
