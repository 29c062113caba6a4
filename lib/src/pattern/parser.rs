/*! Surface-syntax parsing.

The textual notation is split into elements by [`split_top_level`], a pure
function that scans for separators at parenthesis depth zero; everything else
is plain recursive descent. Deciding between concatenation and alternation is
unambiguous: a group whose top level is separated by spaces must not contain
top-level `|` inside any element, and vice versa. A body matching neither
structure is a parse error, never a silent default.
*/

use crate::errors::ParseError;
use crate::pattern::{Group, GroupMode, Node, NodeKind, Pattern, Repetition, TokenNode};
use crate::tokens::TokenCodec;

/// Parses the full pattern form: optional `^`, body, optional `$`.
pub(crate) fn parse_pattern<C>(
    text: &str,
    codec: &C,
) -> Result<Pattern<C::Token>, ParseError>
where
    C: TokenCodec,
{
    let mut body = text;

    let match_from_start = body.starts_with('^');
    if match_from_start {
        body = &body[1..];
    }

    let match_till_end = body.ends_with('$');
    if match_till_end {
        body = &body[..body.len() - 1];
    }

    check_balanced(body)?;

    let root = if is_single_group(body) {
        parse_group(body, codec)?
    } else {
        parse_group(&format!("({body})"), codec)?
    };

    Ok(Pattern { root, match_from_start, match_till_end })
}

/// Parses a parenthesized group body. The caller guarantees that `text`
/// starts with `(` and ends with `)`.
fn parse_group<C>(text: &str, codec: &C) -> Result<Group<C::Token>, ParseError>
where
    C: TokenCodec,
{
    let inner = &text[1..text.len() - 1];

    let concat_parts = split_top_level(inner, ' ')?;
    let (mode, parts) = if concat_parts.len() > 1 {
        // A concatenation element may not contain a top-level alternation
        // separator; mixed separators at one level match neither structure.
        for part in &concat_parts {
            if split_top_level(part, '|')?.len() > 1 {
                return Err(ParseError::MalformedGroup(inner.to_owned()));
            }
        }
        (GroupMode::Concatenation, concat_parts)
    } else {
        let alt_parts = split_top_level(inner, '|')?;
        if alt_parts.len() > 1 {
            (GroupMode::Alternation, alt_parts)
        } else {
            (GroupMode::Concatenation, concat_parts)
        }
    };

    let mut elements = Vec::with_capacity(parts.len());
    for part in parts {
        if part.is_empty() {
            return Err(ParseError::EmptyElement(inner.to_owned()));
        }
        elements.push(parse_node(part, codec)?);
    }

    Ok(Group { elements, mode })
}

/// Parses one element: a token or a nested group, with its repetition and
/// laziness suffix.
fn parse_node<C>(text: &str, codec: &C) -> Result<Node<C::Token>, ParseError>
where
    C: TokenCodec,
{
    let (base, repetition, greedy) = split_suffix(text);

    if base.is_empty() {
        return Err(ParseError::EmptyElement(text.to_owned()));
    }

    let kind = if base.starts_with('(') {
        if !base.ends_with(')') {
            return Err(ParseError::UnbalancedParens(base.to_owned()));
        }
        NodeKind::Group(parse_group(base, codec)?)
    } else if base == "." {
        NodeKind::Token(TokenNode::Any)
    } else {
        let value = codec
            .parse(base)
            .ok_or_else(|| ParseError::InvalidToken(base.to_owned()))?;
        NodeKind::Token(TokenNode::Value(value))
    };

    Ok(Node { repetition, greedy, kind })
}

/// Splits the trailing repetition operator (`+`, `*`, `?`) and the optional
/// lazy marker (a second `?`) off an element.
fn split_suffix(text: &str) -> (&str, Repetition, bool) {
    // Two-character lazy forms first, otherwise `+?` would be read as a
    // greedy `+` with a stray `?`.
    if let Some(base) = text.strip_suffix("+?") {
        (base, Repetition::OneOrMore, false)
    } else if let Some(base) = text.strip_suffix("*?") {
        (base, Repetition::ZeroOrMore, false)
    } else if let Some(base) = text.strip_suffix("??") {
        (base, Repetition::ZeroOrOne, false)
    } else if let Some(base) = text.strip_suffix('+') {
        (base, Repetition::OneOrMore, true)
    } else if let Some(base) = text.strip_suffix('*') {
        (base, Repetition::ZeroOrMore, true)
    } else if let Some(base) = text.strip_suffix('?') {
        (base, Repetition::ZeroOrOne, true)
    } else {
        (text, Repetition::Once, true)
    }
}

/// Splits `text` at every occurrence of `separator` that sits at parenthesis
/// depth zero. Returns an error if the parentheses are unbalanced. The
/// returned parts may be empty; callers decide whether that is acceptable.
pub(crate) fn split_top_level(
    text: &str,
    separator: char,
) -> Result<Vec<&str>, ParseError> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ParseError::UnbalancedParens(text.to_owned()));
                }
            }
            _ if ch == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + ch.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::UnbalancedParens(text.to_owned()));
    }

    parts.push(&text[start..]);
    Ok(parts)
}

/// Returns an error if the parentheses in `text` are unbalanced.
fn check_balanced(text: &str) -> Result<(), ParseError> {
    let mut depth = 0_i32;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err(ParseError::UnbalancedParens(text.to_owned()));
        }
    }
    if depth != 0 {
        return Err(ParseError::UnbalancedParens(text.to_owned()));
    }
    Ok(())
}

/// True if `text` is one balanced `( ... )` group: the opening parenthesis
/// at position 0 closes exactly at the last character. A body like
/// `(a) (b)` or `(a b)+` is not a single group and gets auto-wrapped by the
/// caller.
pub(crate) fn is_single_group(text: &str) -> bool {
    if !text.starts_with('(') || !text.ends_with(')') {
        return false;
    }
    let mut depth = 0_i32;
    for (index, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return index == text.len() - 1;
                }
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    false
}
