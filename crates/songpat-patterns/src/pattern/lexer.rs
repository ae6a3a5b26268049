//! Pattern lexer converting pattern strings into tokens.

use crate::errors::PatternError;

/// Kind of a lexed pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text with escapes already resolved.
    Text,
    /// `<`
    Open,
    /// `>`
    Close,
    /// `|`
    Cond,
    /// End of input.
    Eof,
}

/// A lexed pattern token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// The text it stands for; empty for [`TokenKind::Eof`].
    pub literal: String,
}

impl Token {
    fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }
}

/// Split a pattern into tokens, ending with [`TokenKind::Eof`].
///
/// Surrounding whitespace is ignored. A backslash makes the next character
/// literal, whatever it is.
///
/// # Errors
/// Returns [`PatternError::Lexer`] when the pattern ends in a lone backslash.
///
/// # Examples
/// ```
/// use songpat_patterns::{TokenKind, tokenize};
/// let kinds: Vec<_> = tokenize("a\\<b <c>")
///     .unwrap()
///     .into_iter()
///     .map(|token| token.kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Text, TokenKind::Open, TokenKind::Text, TokenKind::Close, TokenKind::Eof]
/// );
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, PatternError> {
    let offset = source.len() - source.trim_start().len();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = source.trim().char_indices();

    while let Some((index, ch)) = chars.next() {
        let kind = match ch {
            '<' => TokenKind::Open,
            '>' => TokenKind::Close,
            '|' => TokenKind::Cond,
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(PatternError::Lexer {
                        position: offset + index,
                    });
                };
                literal.push(escaped);
                continue;
            }
            _ => {
                literal.push(ch);
                continue;
            }
        };
        flush_literal(&mut literal, &mut tokens);
        tokens.push(Token::new(kind, ch));
    }

    flush_literal(&mut literal, &mut tokens);
    tokens.push(Token::new(TokenKind::Eof, ""));
    Ok(tokens)
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::new(TokenKind::Text, std::mem::take(literal)));
    }
}
