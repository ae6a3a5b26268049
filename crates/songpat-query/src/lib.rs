//! Query matching engine for song records.
//!
//! A query is a tree of [`Predicate`]s: unions, intersections, negations,
//! textual tag matches and unit-aware numeric comparisons. Every predicate
//! answers a single question, [`Predicate::search`], and all parsing happens
//! when the predicate is built so evaluation cannot fail.
//!
//! [`Query::parse`] builds a predicate tree from the textual query syntax:
//!
//! ```
//! use songpat_query::Query;
//! use songpat_record::Song;
//!
//! let song = Song::new()
//!     .with("artist", "The Beatles")
//!     .with_numeric("length", 150.0);
//! let query = Query::parse("&(artist=beatles, #(length < 3 minutes))")
//!     .expect("query should parse");
//! assert!(query.search(&song));
//! ```

mod errors;
mod numcmp;
mod parser;
mod predicate;
mod tag;
mod units;

pub use errors::QueryError;
pub use numcmp::{CompareOp, Numcmp, TIME_TAGS};
pub use parser::{DEFAULT_TAGS, Query, compile_predicate};
pub use predicate::Predicate;
pub use tag::{ABBREVIATIONS, TagMatch};
