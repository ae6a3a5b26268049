//! Test helpers for building and parsing pattern trees.
use super::ast::{Node, Sequence};
use super::parser::parse_pattern;

pub(crate) fn parse_ok(pattern: &str) -> Sequence {
    match parse_pattern(pattern) {
        Ok(ast) => ast,
        Err(err) => panic!("pattern `{pattern}` should parse: {err}"),
    }
}

pub(crate) fn lit(text: &str) -> Node {
    Node::Literal(text.to_owned())
}

pub(crate) fn tag(name: &str) -> Node {
    Node::TagRef(name.to_owned())
}

pub(crate) fn cond(name: &str, then: Vec<Node>, otherwise: Option<Vec<Node>>) -> Node {
    Node::Conditional {
        tag: name.to_owned(),
        then: Sequence::new(then),
        otherwise: otherwise.map(Sequence::new),
    }
}
