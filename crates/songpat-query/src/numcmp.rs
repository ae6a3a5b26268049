//! Unit-aware numeric comparison against a record tag.
//!
//! Time-valued tags hold absolute timestamps, but users phrase questions about
//! them as "how long ago": `lastplayed < 2 days` means "played within the last
//! two days". A duration compared against such a tag is therefore turned into
//! the instant `now - duration` and the operator is inverted, so the test
//! still runs in the timestamp's ascending direction.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use songpat_record::Record;
use songpat_record::tags::NUMERIC_PREFIX;

use crate::errors::QueryError;
use crate::units::{Quantity, parse_quantity};

/// Tags whose values are Unix timestamps.
pub const TIME_TAGS: [&str; 4] = ["added", "mtime", "lastplayed", "laststarted"];

/// Comparison operator of a [`Numcmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `=`
    Equal,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `!=`
    NotEqual,
}

impl CompareOp {
    /// The operator as written in queries.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Less => "<",
            Self::Equal => "=",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::NotEqual => "!=",
        }
    }

    /// Swap the direction of ordering operators.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Greater => Self::Less,
            Self::Less => Self::Greater,
            Self::GreaterEqual => Self::LessEqual,
            Self::LessEqual => Self::GreaterEqual,
            Self::Equal | Self::NotEqual => self,
        }
    }

    /// Apply the operator to `lhs` and `rhs`.
    #[must_use]
    #[expect(clippy::float_cmp, reason = "both sides are rounded beforehand")]
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Greater => lhs > rhs,
            Self::Less => lhs < rhs,
            Self::Equal => lhs == rhs,
            Self::GreaterEqual => lhs >= rhs,
            Self::LessEqual => lhs <= rhs,
            Self::NotEqual => lhs != rhs,
        }
    }
}

impl FromStr for CompareOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Self::Greater),
            "<" => Ok(Self::Less),
            "=" => Ok(Self::Equal),
            ">=" => Ok(Self::GreaterEqual),
            "<=" => Ok(Self::LessEqual),
            "!=" => Ok(Self::NotEqual),
            other => Err(QueryError::UnknownOperator(other.to_owned())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Numeric comparison of a tag against a fixed value.
///
/// # Examples
/// ```
/// use songpat_query::Numcmp;
/// use songpat_record::Song;
///
/// let now = 1_000_000.0;
/// let recent = Numcmp::with_now("lastplayed", "<", "10 seconds", now)
///     .expect("valid comparison");
/// assert!(recent.search(&Song::new().with_numeric("lastplayed", now - 5.0)));
/// assert!(!recent.search(&Song::new().with_numeric("lastplayed", now - 15.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Numcmp {
    tag: String,
    op: CompareOp,
    value: f64,
}

impl Numcmp {
    /// Build a comparison, resolving `now` and `today` against the wall clock.
    ///
    /// # Errors
    /// Returns [`QueryError`] when the operator, unit or number is invalid, or
    /// when a time-valued tag is compared against a bare number.
    pub fn new(tag: &str, op: &str, raw: &str) -> Result<Self, QueryError> {
        Self::with_now(tag, op, raw, unix_now())
    }

    /// Build a comparison using `now` (Unix seconds) as the current time.
    ///
    /// # Errors
    /// See [`Numcmp::new`].
    pub fn with_now(tag: &str, op: &str, raw: &str, now: f64) -> Result<Self, QueryError> {
        let op: CompareOp = op.trim().parse()?;
        let tag = normalise_tag(tag);
        let quantity = parse_quantity(raw, now)?;
        let (op, value) = if is_time_tag(&tag) {
            match quantity {
                Quantity::Duration(ago) => (op.inverted(), now - ago),
                Quantity::Instant(at) => (op, at),
                Quantity::Number(_) | Quantity::Size(_) => {
                    return Err(QueryError::TimeValueRequired {
                        tag,
                        value: raw.trim().to_owned(),
                    });
                }
            }
        } else {
            (op, quantity.value())
        };
        log::debug!("numeric comparison: {tag} {op} {value}");
        Ok(Self {
            tag,
            op,
            value: round2(value),
        })
    }

    /// Compare the record's numeric value of the tag; absent values never
    /// match.
    pub fn search<R: Record + ?Sized>(&self, record: &R) -> bool {
        record
            .numeric(&self.tag)
            .is_some_and(|actual| self.op.compare(round2(actual), self.value))
    }

    /// The compared tag, without any `~#` prefix.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The effective operator, already inverted for time-valued tags.
    #[must_use]
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The normalised right-hand side.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

fn normalise_tag(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    tag.strip_prefix(NUMERIC_PREFIX)
        .or_else(|| tag.strip_prefix('#'))
        .map_or_else(|| tag.clone(), str::to_owned)
}

fn is_time_tag(tag: &str) -> bool {
    TIME_TAGS.contains(&tag)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use songpat_record::Song;

    const NOW: f64 = 1_700_000_000.0;

    fn numcmp(tag: &str, op: &str, raw: &str) -> Numcmp {
        Numcmp::with_now(tag, op, raw, NOW)
            .unwrap_or_else(|err| panic!("`{tag} {op} {raw}` should build: {err}"))
    }

    #[rstest]
    #[case("<", 5.0, true)]
    #[case("<", 15.0, false)]
    #[case(">", 15.0, true)]
    #[case(">", 5.0, false)]
    #[case("<=", 10.0, true)]
    #[case(">=", 10.0, true)]
    fn inverts_operators_for_time_tags(#[case] op: &str, #[case] ago: f64, #[case] hit: bool) {
        let cmp = numcmp("lastplayed", op, "10 seconds");
        let song = Song::new().with_numeric("lastplayed", NOW - ago);
        assert_eq!(cmp.search(&song), hit);
    }

    #[test]
    fn compares_instants_in_natural_direction() {
        let cmp = numcmp("added", ">", "today");
        assert_eq!(cmp.op(), CompareOp::Greater);
        assert!(cmp.search(&Song::new().with_numeric("added", NOW)));
        assert!(!cmp.search(&Song::new().with_numeric("added", NOW - 2.0 * 86_400.0)));
    }

    #[rstest]
    #[case("length", ">", "3 minutes", 200.0, true)]
    #[case("length", ">", "3:00", 170.0, false)]
    #[case("~#length", "=", "180", 180.0, true)]
    #[case("#rating", "!=", "0.5", 0.5, false)]
    #[case("filesize", ">=", "1 kb", 1_024.0, true)]
    fn compares_plain_numbers(
        #[case] tag: &str,
        #[case] op: &str,
        #[case] raw: &str,
        #[case] actual: f64,
        #[case] hit: bool,
    ) {
        let name = tag.trim_start_matches(['~', '#']);
        let song = Song::new().with_numeric(name, actual);
        assert_eq!(numcmp(tag, op, raw).search(&song), hit);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let cmp = numcmp("rating", "=", "0.3");
        assert!(cmp.search(&Song::new().with_numeric("rating", 0.1 + 0.2)));
        assert!(cmp.search(&Song::new().with_numeric("rating", 0.301)));
    }

    #[test]
    fn missing_values_never_match() {
        assert!(!numcmp("rating", "!=", "1").search(&Song::new()));
    }

    #[test]
    fn rejects_bare_numbers_for_time_tags() {
        let err = Numcmp::with_now("added", "<", "30", NOW).unwrap_err();
        assert!(matches!(err, QueryError::TimeValueRequired { .. }));
    }

    #[rstest]
    #[case("=>")]
    #[case("==")]
    #[case("~")]
    fn rejects_unknown_operators(#[case] op: &str) {
        let err = Numcmp::with_now("length", op, "3", NOW).unwrap_err();
        assert!(matches!(err, QueryError::UnknownOperator(_)));
    }

    #[test]
    fn displays_operator_symbols() {
        assert_eq!(CompareOp::GreaterEqual.to_string(), ">=");
        assert_eq!(CompareOp::Less.inverted(), CompareOp::Greater);
        assert_eq!(CompareOp::NotEqual.inverted(), CompareOp::NotEqual);
    }
}
