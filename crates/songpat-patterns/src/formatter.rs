//! Compiled patterns.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use songpat_record::{DummyRecord, Record};

use crate::dialect::Dialect;
use crate::errors::PatternError;
use crate::path::{self, PathSettings};
use crate::pattern::compiler::{
    Comma, ListSeparate, Program, Queries, compile, expand, referenced_tags,
};
use crate::pattern::parse_pattern;

/// A pattern compiled for one [`Dialect`].
///
/// Holds two programs built from the same tree: one producing a single
/// string from display values, one expanding multi-valued tags into every
/// combination. Formatters are immutable and can be shared across threads.
///
/// # Examples
/// ```
/// use songpat_patterns::{Dialect, Formatter};
/// use songpat_record::Song;
///
/// let formatter = Formatter::new("<artist|<artist> - ><title>", Dialect::Plain)
///     .expect("pattern compiles");
/// let song = Song::new().with("artist", "Ann").with("title", "Tune");
/// assert_eq!(formatter.format(&song), "Ann - Tune");
/// assert_eq!(formatter.format(&Song::new().with("title", "Solo")), "Solo");
/// ```
pub struct Formatter {
    source: String,
    dialect: Dialect,
    scalar: Program<Comma>,
    list: Program<ListSeparate>,
    tags: Vec<String>,
    path: PathSettings,
}

impl Formatter {
    /// Compile `text` for `dialect`.
    ///
    /// The new formatter is tried once against [`DummyRecord`], so path
    /// patterns that cannot produce a rooted path are rejected here. The path
    /// segment limit ([`crate::config::path_segment_limit`]) and `HOME` are
    /// read now and kept for the life of the formatter.
    ///
    /// # Errors
    /// Returns [`PatternError::Lexer`] when the text cannot be scanned,
    /// [`PatternError::HomeUnavailable`] when a path pattern starts at `~`
    /// without `HOME`, and [`PatternError::NotRooted`] when a path pattern is
    /// not rooted.
    pub fn new(text: &str, dialect: Dialect) -> Result<Self, PatternError> {
        Self::build(text, dialect, PathSettings::current())
    }

    fn build(text: &str, dialect: Dialect, path: PathSettings) -> Result<Self, PatternError> {
        let source = dialect.preprocess(text);
        let ast = parse_pattern(&source)?;
        let queries = Queries::collect(&ast);
        let formatter = Self {
            source: text.to_owned(),
            dialect,
            scalar: compile(&ast, dialect, &queries),
            list: compile(&ast, dialect, &queries),
            tags: referenced_tags(&ast, &queries),
            path,
        };
        formatter.try_format(&DummyRecord)?;
        log::debug!("compiled {dialect} pattern `{text}`");
        Ok(formatter)
    }

    /// Format `record` into a single string.
    #[must_use]
    pub fn format(&self, record: &dyn Record) -> String {
        self.finish(self.scalar.run(record), record)
    }

    /// Format `record`, rejecting path output that is not rooted.
    ///
    /// # Errors
    /// Returns [`PatternError::HomeUnavailable`] for path-dialect output
    /// left at `~` because `HOME` was not set, and
    /// [`PatternError::NotRooted`] for output that is relative although it
    /// contains a directory or the pattern starts at `/` or `~`.
    pub fn try_format(&self, record: &dyn Record) -> Result<String, PatternError> {
        let output = self.format(record);
        if self.dialect != Dialect::Path {
            return Ok(output);
        }
        if path::is_unexpanded_home(&output) {
            return Err(PatternError::HomeUnavailable { output });
        }
        if path::is_unrooted(&output, &self.source) {
            return Err(PatternError::NotRooted { output });
        }
        Ok(output)
    }

    /// Format `record` into a file system path.
    ///
    /// # Errors
    /// See [`Formatter::try_format`].
    pub fn format_path(&self, record: &dyn Record) -> Result<PathBuf, PatternError> {
        self.try_format(record).map(PathBuf::from)
    }

    /// Every distinct output obtained by choosing one value of each
    /// multi-valued tag. Never empty.
    #[must_use]
    pub fn format_all_combinations(&self, record: &dyn Record) -> BTreeSet<String> {
        expand(self.list.run(record))
            .into_iter()
            .map(|combination| self.finish(combination, record))
            .collect()
    }

    /// Tags the pattern reads, in first-seen order with tied tags split.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The pattern text as given.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The dialect the pattern was compiled for.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn finish(&self, output: String, record: &dyn Record) -> String {
        match self.dialect {
            Dialect::Path => path::finish(output, record, &self.path),
            Dialect::Plain | Dialect::Markup | Dialect::BracketMarkup => output,
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("source", &self.source)
            .field("dialect", &self.dialect)
            .field("tags", &self.tags)
            .field("path", &self.path)
            .field("scalar", &self.scalar)
            .field("list", &self.list)
            .finish()
    }
}
