//! Errors raised while building predicates.

use thiserror::Error;

/// Failures detected while constructing a predicate or parsing a query.
///
/// Every variant is raised at construction time; searching never fails.
///
/// # Examples
/// ```
/// use songpat_query::{Numcmp, QueryError};
/// let err = Numcmp::new("length", "=>", "3").unwrap_err();
/// assert!(matches!(err, QueryError::UnknownOperator(_)));
/// assert_eq!(err.to_string(), "unknown comparison operator `=>`");
/// ```
#[derive(Debug, Error)]
pub enum QueryError {
    /// The comparison operator is not one of `> < = >= <= !=`.
    #[error("unknown comparison operator `{0}`")]
    UnknownOperator(String),
    /// The value carries a unit suffix that is not recognised.
    #[error("unknown unit `{unit}` in `{value}`")]
    UnknownUnit {
        /// The unrecognised suffix.
        unit: String,
        /// The full value text.
        value: String,
    },
    /// A time-valued tag was compared against something that is not a
    /// duration or a point in time.
    #[error("`{tag}` holds a timestamp; `{value}` needs a duration unit")]
    TimeValueRequired {
        /// The time-valued tag.
        tag: String,
        /// The value text.
        value: String,
    },
    /// The numeric or date part of a value cannot be read.
    #[error("invalid numeric value `{0}`")]
    InvalidNumber(String),
    /// A regular expression in the query does not compile.
    #[error(transparent)]
    InvalidRegex(#[from] regex::Error),
    /// The query text is malformed.
    #[error("invalid query at byte {offset}: {reason}")]
    Syntax {
        /// Zero-based byte offset of the problem.
        offset: usize,
        /// Human readable description.
        reason: String,
    },
}

impl QueryError {
    pub(crate) fn syntax(offset: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_syntax_errors_with_offset() {
        let err = QueryError::syntax(4, "missing ')'");
        assert_eq!(err.to_string(), "invalid query at byte 4: missing ')'");
    }

    #[test]
    fn formats_unit_errors() {
        let err = QueryError::UnknownUnit {
            unit: "parsecs".into(),
            value: "3 parsecs".into(),
        };
        assert_eq!(err.to_string(), "unknown unit `parsecs` in `3 parsecs`");
    }

    #[test]
    fn forwards_regex_error_display() {
        let err = QueryError::from(regex::Error::Syntax("bad".into()));
        assert_eq!(
            err.to_string(),
            regex::Error::Syntax("bad".into()).to_string()
        );
    }
}
