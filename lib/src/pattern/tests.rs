use pretty_assertions::assert_eq;

use crate::errors::ParseError;
use crate::pattern::{Group, GroupMode, Node, Pattern, Repetition};
use crate::tokens::{CharTokens, StringTokens};

fn parse(text: &str) -> Pattern<char> {
    Pattern::parse(text, &CharTokens).unwrap()
}

fn parse_err(text: &str) -> ParseError {
    Pattern::parse(text, &CharTokens).unwrap_err()
}

fn concat(elements: Vec<Node<char>>) -> Group<char> {
    Group { elements, mode: GroupMode::Concatenation }
}

#[test]
fn concatenation() {
    assert_eq!(
        parse("a+ b+"),
        Pattern {
            root: concat(vec![
                Node::token('a').repeat(Repetition::OneOrMore),
                Node::token('b').repeat(Repetition::OneOrMore),
            ]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn anchors() {
    let pattern = parse("^a b$");
    assert!(pattern.match_from_start);
    assert!(pattern.match_till_end);
    assert_eq!(
        pattern.root,
        concat(vec![Node::token('a'), Node::token('b')])
    );

    let pattern = parse("a b");
    assert!(!pattern.match_from_start);
    assert!(!pattern.match_till_end);
}

#[test]
fn repetition_suffixes() {
    assert_eq!(
        parse("a+ b* c? d"),
        Pattern {
            root: concat(vec![
                Node::token('a').repeat(Repetition::OneOrMore),
                Node::token('b').repeat(Repetition::ZeroOrMore),
                Node::token('c').repeat(Repetition::ZeroOrOne),
                Node::token('d'),
            ]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn lazy_suffixes() {
    assert_eq!(
        parse("a+? b*? c??"),
        Pattern {
            root: concat(vec![
                Node::token('a').repeat(Repetition::OneOrMore).lazy(),
                Node::token('b').repeat(Repetition::ZeroOrMore).lazy(),
                Node::token('c').repeat(Repetition::ZeroOrOne).lazy(),
            ]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn wildcard() {
    assert_eq!(
        parse(". a .*"),
        Pattern {
            root: concat(vec![
                Node::any(),
                Node::token('a'),
                Node::any().repeat(Repetition::ZeroOrMore),
            ]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn nested_groups() {
    assert_eq!(
        parse("a* (b c)+ d"),
        Pattern {
            root: concat(vec![
                Node::token('a').repeat(Repetition::ZeroOrMore),
                Node::group(
                    GroupMode::Concatenation,
                    vec![Node::token('b'), Node::token('c')],
                )
                .repeat(Repetition::OneOrMore),
                Node::token('d'),
            ]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn alternation() {
    assert_eq!(
        parse("a|b|c"),
        Pattern {
            root: Group {
                elements: vec![
                    Node::token('a'),
                    Node::token('b'),
                    Node::token('c'),
                ],
                mode: GroupMode::Alternation,
            },
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn single_group_body_is_not_wrapped() {
    // `(a b)` is already a single group; it becomes the root as-is instead
    // of being wrapped into a one-element concatenation.
    assert_eq!(
        parse("(a b)"),
        Pattern {
            root: concat(vec![Node::token('a'), Node::token('b')]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn adjacent_groups_are_wrapped() {
    // `(a) (b)` starts with `(` and ends with `)` but is two groups, not
    // one.
    assert_eq!(
        parse("(a) (b)"),
        Pattern {
            root: concat(vec![
                Node::group(GroupMode::Concatenation, vec![Node::token('a')]),
                Node::group(GroupMode::Concatenation, vec![Node::token('b')]),
            ]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn repeated_group_body_is_wrapped() {
    // `(a b)+` carries a suffix, so the repetition belongs to a nested
    // group node, not to the root.
    assert_eq!(
        parse("(a b)+"),
        Pattern {
            root: concat(vec![Node::group(
                GroupMode::Concatenation,
                vec![Node::token('a'), Node::token('b')],
            )
            .repeat(Repetition::OneOrMore)]),
            match_from_start: false,
            match_till_end: false,
        }
    );
}

#[test]
fn unbalanced_parens() {
    assert_eq!(parse_err("(a"), ParseError::UnbalancedParens("(a".to_owned()));
    assert_eq!(parse_err("a)"), ParseError::UnbalancedParens("a)".to_owned()));
    assert_eq!(
        parse_err("((a) b"),
        ParseError::UnbalancedParens("((a) b".to_owned())
    );
}

#[test]
fn mixed_separators() {
    assert_eq!(
        parse_err("a b|c"),
        ParseError::MalformedGroup("a b|c".to_owned())
    );
    assert_eq!(
        parse_err("a|b c"),
        ParseError::MalformedGroup("a|b c".to_owned())
    );
}

#[test]
fn empty_elements() {
    assert_eq!(parse_err(""), ParseError::EmptyElement("".to_owned()));
    assert_eq!(
        parse_err("a  b"),
        ParseError::EmptyElement("a  b".to_owned())
    );
    assert_eq!(parse_err("a|"), ParseError::EmptyElement("a|".to_owned()));
    assert_eq!(parse_err("+"), ParseError::EmptyElement("+".to_owned()));
}

#[test]
fn invalid_token() {
    // CharTokens only accepts single characters.
    assert_eq!(parse_err("ab c"), ParseError::InvalidToken("ab".to_owned()));
}

#[test]
fn render_is_parse_inverse() {
    // These are in canonical form already: rendering reproduces the text
    // exactly.
    for text in [
        "a",
        "a+ b+",
        "^a b$",
        "a* (b c)+ d",
        "a|b|c",
        "(a b)|c",
        ".",
        "a+? b*? c??",
        "a? b",
        "^(a .)+ b*?$",
    ] {
        assert_eq!(parse(text).to_text(&CharTokens), text);
    }
}

#[test]
fn round_trip_is_structural() {
    // Non-canonical spellings may re-render differently, but parsing the
    // rendered form reproduces the same AST.
    for text in ["(a b)", "(a) (b)", "(a b)+", "((a))", "^(a b)$"] {
        let pattern = parse(text);
        assert_eq!(parse(&pattern.to_text(&CharTokens)), pattern);
    }
}

#[test]
fn string_tokens() {
    let pattern = Pattern::parse("say hello+ .", &StringTokens).unwrap();
    assert_eq!(
        pattern,
        Pattern {
            root: Group {
                elements: vec![
                    Node::token("say".to_owned()),
                    Node::token("hello".to_owned())
                        .repeat(Repetition::OneOrMore),
                    Node::any(),
                ],
                mode: GroupMode::Concatenation,
            },
            match_from_start: false,
            match_till_end: false,
        }
    );
    assert_eq!(pattern.to_text(&StringTokens), "say hello+ .");
}

#[test]
fn pattern_embeds_as_plain_group() {
    let pattern = parse("^a b$");
    let node: Node<char> = pattern.into();
    assert_eq!(
        node,
        Node::group(
            GroupMode::Concatenation,
            vec![Node::token('a'), Node::token('b')],
        )
    );
}
