//! Textual tag matching.

use regex::Regex;
use songpat_record::Record;
use songpat_record::tags::is_synthetic;

/// Short tag names accepted in queries and the tags they stand for.
pub const ABBREVIATIONS: [(&str, &str); 6] = [
    ("a", "artist"),
    ("b", "album"),
    ("v", "version"),
    ("t", "title"),
    ("n", "tracknumber"),
    ("d", "date"),
];

/// Match one or more tags against one or more regular expressions.
///
/// Stored tags are read with [`Record::get`]; synthetic `~` tags are computed
/// with [`Record::comma`]. Names are lower-cased and abbreviations expanded
/// when the matcher is built.
///
/// # Examples
/// ```
/// use regex::Regex;
/// use songpat_query::TagMatch;
/// use songpat_record::Song;
///
/// let matcher = TagMatch::new(["a", "t"], vec![Regex::new("(?i)help").unwrap()]);
/// assert!(matcher.search(&Song::new().with("title", "Help!")));
/// assert!(!matcher.search(&Song::new().with("album", "Help!")));
/// ```
#[derive(Debug, Clone)]
pub struct TagMatch {
    stored: Vec<String>,
    computed: Vec<String>,
    patterns: Vec<Regex>,
}

impl TagMatch {
    /// Build a matcher over `names` that succeeds when any pattern finds a
    /// match in any of the named tags.
    pub fn new<I, S>(names: I, patterns: Vec<Regex>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stored = Vec::new();
        let mut computed = Vec::new();
        for name in names {
            let name = resolve_abbreviation(&name.as_ref().trim().to_lowercase());
            if is_synthetic(&name) {
                computed.push(name);
            } else {
                stored.push(name);
            }
        }
        Self {
            stored,
            computed,
            patterns,
        }
    }

    /// Report whether any `(tag, pattern)` pair matches the record.
    pub fn search<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.stored
            .iter()
            .any(|name| self.matches(&record.get(name).unwrap_or_default()))
            || self
                .computed
                .iter()
                .any(|name| self.matches(&record.comma(name)))
    }

    /// Every tag name the matcher reads, after abbreviation expansion.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stored
            .iter()
            .chain(self.computed.iter())
            .map(String::as_str)
    }

    fn matches(&self, value: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(value))
    }
}

fn resolve_abbreviation(name: &str) -> String {
    ABBREVIATIONS
        .iter()
        .find(|(short, _)| *short == name)
        .map_or_else(|| name.to_owned(), |(_, long)| (*long).to_owned())
}
