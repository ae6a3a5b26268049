//! Error types shared by the pattern modules.

use thiserror::Error;

/// Errors surfaced while compiling or applying a pattern.
///
/// Malformed tag expressions are not errors: the parser drops them and keeps
/// the surrounding text. Only input the scanner cannot consume at all, and
/// path output that fails validation, are reported.
///
/// # Examples
/// ```
/// use songpat_patterns::PatternError;
/// let err = PatternError::Lexer { position: 3 };
/// assert_eq!(
///     err.to_string(),
///     "dangling escape character at byte 3 (zero-based)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A backslash ends the pattern, leaving nothing to escape.
    #[error("dangling escape character at byte {position} (zero-based)")]
    Lexer {
        /// Offset of the backslash in the pattern text.
        position: usize,
    },
    /// Path output is relative where an absolute path was required.
    #[error("pattern output `{output}` is not rooted")]
    NotRooted {
        /// The offending output.
        output: String,
    },
    /// Path output starts at `~` but no home directory is known.
    #[error("pattern output `{output}` starts at `~` but HOME is not set")]
    HomeUnavailable {
        /// The unexpanded output.
        output: String,
    },
    /// The dialect name is not recognised.
    #[error("unknown pattern dialect `{0}`")]
    UnknownDialect(String),
}
