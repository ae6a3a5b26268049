//! Pattern scanning, parsing and compilation.

mod ast;
pub(crate) mod compiler;
mod lexer;
mod parser;
#[cfg(test)]
pub(crate) mod test_support;

pub use ast::{Node, Sequence};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse_pattern;
