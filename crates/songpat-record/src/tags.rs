//! Helpers for interpreting tag names.
//!
//! A leading `~` marks a synthetic tag computed by the record rather than
//! stored in it, and `~#` marks a numeric synthetic tag. A `~` anywhere after
//! the first character ties several tags together: `~artist~title` asks for
//! the artist and the title joined by [`TIED_JOIN`].

/// Sigil introducing synthetic tags and separating tied tags.
pub const TIED_SIGIL: char = '~';

/// Prefix of numeric synthetic tags such as `~#rating`.
pub const NUMERIC_PREFIX: &str = "~#";

/// Separator placed between the parts of a tied tag.
pub const TIED_JOIN: &str = " - ";

/// Report whether `tag` ties several tags together.
///
/// # Examples
/// ```
/// use songpat_record::tags::is_tied;
/// assert!(is_tied("~artist~title"));
/// assert!(!is_tied("~#rating"));
/// assert!(!is_tied("artist"));
/// ```
#[must_use]
pub fn is_tied(tag: &str) -> bool {
    tag.chars().skip(1).any(|c| c == TIED_SIGIL)
}

/// Report whether `tag` names a synthetic tag.
#[must_use]
pub fn is_synthetic(tag: &str) -> bool {
    tag.starts_with(TIED_SIGIL)
}

/// Split a tied tag into its component tag names.
///
/// Numeric parts keep their `~#` prefix. Tags that are not tied are returned
/// unchanged as a single-element list.
///
/// # Examples
/// ```
/// use songpat_record::tags::tagsplit;
/// assert_eq!(tagsplit("~artist~title"), vec!["artist", "title"]);
/// assert_eq!(tagsplit("~title~#rating"), vec!["title", "~#rating"]);
/// assert_eq!(tagsplit("~#playcount"), vec!["~#playcount"]);
/// ```
#[must_use]
pub fn tagsplit(tag: &str) -> Vec<String> {
    if !is_tied(tag) {
        return vec![tag.to_owned()];
    }
    tag.strip_prefix(TIED_SIGIL)
        .unwrap_or(tag)
        .split(TIED_SIGIL)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.starts_with('#') {
                format!("{TIED_SIGIL}{part}")
            } else {
                part.to_owned()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("artist", false)]
    #[case("~artist", false)]
    #[case("~#rating", false)]
    #[case("~artist~title", true)]
    #[case("artist~title", true)]
    fn detects_tied_tags(#[case] tag: &str, #[case] expected: bool) {
        assert_eq!(is_tied(tag), expected);
    }

    #[test]
    fn splits_unrepaired_tied_tag() {
        assert_eq!(tagsplit("artist~album"), vec!["artist", "album"]);
    }

    #[test]
    fn ignores_empty_parts() {
        assert_eq!(tagsplit("~artist~~title"), vec!["artist", "title"]);
    }

    #[test]
    fn synthetic_tags_start_with_sigil() {
        assert!(is_synthetic("~basename"));
        assert!(!is_synthetic("title"));
    }
}
