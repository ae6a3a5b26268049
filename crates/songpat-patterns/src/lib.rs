//! Display-pattern compiler for song records.
//!
//! A pattern such as `<artist|<artist> - ><title>` mixes literal text with
//! tag references and conditionals. [`Formatter::new`] scans and parses the
//! text once and compiles it into closures; formatting a record afterwards
//! only runs those closures. [`compile_pattern`] memoises formatters in a
//! process-wide [`FormatterCache`].
//!
//! ```
//! use songpat_patterns::{Dialect, compile_pattern};
//! use songpat_record::Song;
//!
//! let pattern = compile_pattern("<artist> - <title>", Dialect::Plain).unwrap();
//! let song = Song::new()
//!     .with_values("artist", ["Ann", "Bob"])
//!     .with("title", "Duet");
//! assert_eq!(pattern.format(&song), "Ann, Bob - Duet");
//! assert_eq!(pattern.format_all_combinations(&song).len(), 2);
//! ```

mod cache;
pub mod config;
mod dialect;
mod errors;
mod formatter;
mod path;
mod pattern;

pub use cache::{FormatterCache, compile_pattern, global_cache};
pub use dialect::Dialect;
pub use errors::PatternError;
pub use formatter::Formatter;
pub use pattern::{Node, Sequence, Token, TokenKind, parse_pattern, tokenize};
