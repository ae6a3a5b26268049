//! The predicate algebra.
//!
//! The set of predicate kinds is closed, so a plain enum carries them and
//! [`Predicate::search`] dispatches with a `match`. Union and intersection
//! short-circuit on the first deciding child.

use regex::Regex;
use songpat_record::Record;

use crate::errors::QueryError;
use crate::numcmp::Numcmp;
use crate::tag::TagMatch;

/// A boolean test over a record.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Matches when any child matches.
    Union(Vec<Predicate>),
    /// Matches when every child matches; an empty intersection matches all.
    Inter(Vec<Predicate>),
    /// Matches when the child does not.
    Neg(Box<Predicate>),
    /// Textual tag match.
    Tag(TagMatch),
    /// Numeric comparison.
    Numcmp(Numcmp),
}

impl Predicate {
    /// Logical OR of `predicates`.
    #[must_use]
    pub fn union(predicates: Vec<Self>) -> Self {
        Self::Union(predicates)
    }

    /// Logical AND of `predicates`.
    #[must_use]
    pub fn inter(predicates: Vec<Self>) -> Self {
        Self::Inter(predicates)
    }

    /// Logical NOT of `predicate`.
    #[must_use]
    pub fn neg(predicate: Self) -> Self {
        Self::Neg(Box::new(predicate))
    }

    /// Textual match of `patterns` against `names`.
    #[must_use]
    pub fn tag<I, S>(names: I, patterns: Vec<Regex>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Tag(TagMatch::new(names, patterns))
    }

    /// Numeric comparison of `tag` against `raw`.
    ///
    /// # Errors
    /// Returns [`QueryError`] when the comparison cannot be built; see
    /// [`Numcmp::new`].
    pub fn numcmp(tag: &str, op: &str, raw: &str) -> Result<Self, QueryError> {
        Numcmp::new(tag, op, raw).map(Self::Numcmp)
    }

    /// Evaluate the predicate against `record`.
    ///
    /// # Examples
    /// ```
    /// use regex::Regex;
    /// use songpat_query::Predicate;
    /// use songpat_record::Song;
    ///
    /// let rock = Predicate::tag(["genre"], vec![Regex::new("Rock").unwrap()]);
    /// let query = Predicate::neg(rock);
    /// assert!(query.search(&Song::new().with("genre", "Jazz")));
    /// ```
    pub fn search<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::Union(children) => children.iter().any(|child| child.search(record)),
            Self::Inter(children) => children.iter().all(|child| child.search(record)),
            Self::Neg(child) => !child.search(record),
            Self::Tag(matcher) => matcher.search(record),
            Self::Numcmp(cmp) => cmp.search(record),
        }
    }
}

impl From<TagMatch> for Predicate {
    fn from(matcher: TagMatch) -> Self {
        Self::Tag(matcher)
    }
}

impl From<Numcmp> for Predicate {
    fn from(cmp: Numcmp) -> Self {
        Self::Numcmp(cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songpat_record::Song;

    fn tag(name: &str, source: &str) -> Predicate {
        let pattern = Regex::new(source).unwrap_or_else(|err| panic!("regex `{source}`: {err}"));
        Predicate::tag([name], vec![pattern])
    }

    fn songs() -> Vec<Song> {
        vec![
            Song::new(),
            Song::new().with("artist", "Ann"),
            Song::new().with("title", "Tune"),
            Song::new().with("artist", "Ann").with("title", "Tune"),
        ]
    }

    #[test]
    fn union_is_logical_or() {
        let (a, b) = (tag("artist", "Ann"), tag("title", "Tune"));
        let either = Predicate::union(vec![a.clone(), b.clone()]);
        for song in songs() {
            assert_eq!(either.search(&song), a.search(&song) || b.search(&song));
        }
    }

    #[test]
    fn inter_is_logical_and() {
        let (a, b) = (tag("artist", "Ann"), tag("title", "Tune"));
        let both = Predicate::inter(vec![a.clone(), b.clone()]);
        for song in songs() {
            assert_eq!(both.search(&song), a.search(&song) && b.search(&song));
        }
    }

    #[test]
    fn neg_is_logical_not() {
        let a = tag("artist", "Ann");
        let not_a = Predicate::neg(a.clone());
        for song in songs() {
            assert_eq!(not_a.search(&song), !a.search(&song));
        }
    }

    #[test]
    fn empty_combinators_follow_identity_elements() {
        let song = Song::new();
        assert!(Predicate::inter(Vec::new()).search(&song));
        assert!(!Predicate::union(Vec::new()).search(&song));
    }

    #[test]
    fn searches_through_trait_objects() {
        let song = Song::new().with("artist", "Ann");
        let record: &dyn Record = &song;
        assert!(tag("artist", "Ann").search(record));
    }

    #[test]
    fn converts_numeric_comparisons() {
        let cmp = Numcmp::with_now("rating", ">", "0.5", 0.0)
            .unwrap_or_else(|err| panic!("comparison should build: {err}"));
        let predicate = Predicate::from(cmp);
        assert!(predicate.search(&Song::new().with_numeric("rating", 0.8)));
    }
}
