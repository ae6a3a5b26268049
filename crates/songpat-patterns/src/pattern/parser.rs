//! Recursive-descent parser turning tokens into a [`Sequence`].
//!
//! ```text
//! Pattern := (Literal | TagExpr)*
//! TagExpr := "<" TagName ( "|" Pattern ( "|" Pattern )? )? ">"
//! ```
//!
//! The parser never fails on token structure. A tag expression without a
//! name or without its closing `>` is discarded and tokens are skipped up to
//! the next `<`; stray `>` and `|` at the top level are dropped. Tag
//! expressions nested deeper than [`MAX_DEPTH`] are discarded the same way.

use std::iter::Peekable;
use std::vec::IntoIter;

use songpat_record::tags::TIED_SIGIL;

use crate::errors::PatternError;

use super::ast::{Node, Sequence};
use super::lexer::{Token, TokenKind, tokenize};

/// Parse pattern text into its syntax tree.
///
/// # Errors
/// Returns [`PatternError::Lexer`] when the text cannot be tokenised.
///
/// # Examples
/// ```
/// use songpat_patterns::{Node, parse_pattern};
/// let ast = parse_pattern("<artist> - <title").unwrap();
/// assert_eq!(
///     ast.children,
///     vec![Node::TagRef("artist".into()), Node::Literal(" - ".into())]
/// );
/// ```
pub fn parse_pattern(text: &str) -> Result<Sequence, PatternError> {
    let tokens = tokenize(text)?;
    Ok(Parser::new(tokens).parse())
}

/// Deepest conditional nesting the parser accepts.
pub(crate) const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            depth: 0,
        }
    }

    fn peek(&mut self) -> TokenKind {
        self.tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        self.tokens.next_if(|token| token.kind == kind)
    }

    fn parse(mut self) -> Sequence {
        let mut root = self.sequence();
        while self.peek() != TokenKind::Eof {
            if let Some(stray) = self.tokens.next() {
                log::debug!("dropping stray '{}' in pattern", stray.literal);
            }
            root.children.extend(self.sequence().children);
        }
        root
    }

    fn sequence(&mut self) -> Sequence {
        let mut sequence = Sequence::default();
        loop {
            if let Some(text) = self.eat(TokenKind::Text) {
                sequence.push(Node::Literal(text.literal));
            } else if self.eat(TokenKind::Open).is_some() {
                if let Some(node) = self.tag_expr() {
                    sequence.push(node);
                }
            } else {
                return sequence;
            }
        }
    }

    fn tag_expr(&mut self) -> Option<Node> {
        if self.depth >= MAX_DEPTH {
            log::debug!("dropping tag expression nested deeper than {MAX_DEPTH}");
            self.resync();
            return None;
        }
        let Some(name) = self.eat(TokenKind::Text) else {
            log::debug!("dropping tag expression without a name");
            self.resync();
            return None;
        };
        let tag = repair_tied(name.literal);

        let node = if self.eat(TokenKind::Cond).is_some() {
            self.depth += 1;
            let then = self.sequence();
            let otherwise = self
                .eat(TokenKind::Cond)
                .map(|_| self.sequence());
            self.depth -= 1;
            Node::Conditional {
                tag,
                then,
                otherwise,
            }
        } else {
            Node::TagRef(tag)
        };

        if self.eat(TokenKind::Close).is_none() {
            log::debug!("dropping unterminated tag expression {node:?}");
            self.resync();
            return None;
        }
        if is_empty_conditional(&node) {
            return None;
        }
        Some(node)
    }

    fn resync(&mut self) {
        while !matches!(self.peek(), TokenKind::Open | TokenKind::Eof) {
            self.tokens.next();
        }
    }
}

fn is_empty_conditional(node: &Node) -> bool {
    match node {
        Node::Conditional {
            then, otherwise, ..
        } => then.is_empty() && otherwise.as_ref().is_none_or(Sequence::is_empty),
        Node::Literal(_) | Node::TagRef(_) => false,
    }
}

/// `artist~title` is accepted as a spelling of `~artist~title`.
fn repair_tied(tag: String) -> String {
    if !tag.starts_with(TIED_SIGIL) && tag.contains(TIED_SIGIL) {
        format!("{TIED_SIGIL}{tag}")
    } else {
        tag
    }
}
