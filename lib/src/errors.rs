use thiserror::Error;

/// Errors returned while parsing the textual form of a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The pattern contains an opening parenthesis without a matching
    /// closing one, or vice versa.
    #[error("unbalanced parentheses in `{0}`")]
    UnbalancedParens(String),

    /// The group body matches neither the concatenation nor the alternation
    /// structure, for example because it mixes ` ` and `|` separators at the
    /// same nesting level.
    #[error("neither a concatenation nor an alternation: `{0}`")]
    MalformedGroup(String),

    /// A group contains an empty element, typically caused by two adjacent
    /// separators or a separator at the start or end of the group.
    #[error("empty element in `{0}`")]
    EmptyElement(String),

    /// The token codec rejected the textual form of a token.
    #[error("cannot parse token `{0}`")]
    InvalidToken(String),
}

/// Errors returned while compiling a [`Pattern`](crate::Pattern) into a
/// [`Program`](crate::Program).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The pattern contains an alternation group. The compiler has no
    /// lowering for alternation and fails instead of producing a program
    /// with the wrong semantics.
    #[error("alternation groups are not supported by the compiler")]
    AlternationNotSupported,
}
