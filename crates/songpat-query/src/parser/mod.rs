//! Textual query syntax.
//!
//! ```text
//! query := expr*                                 implicit AND
//! expr  := "&(" expr ("," expr)* ")"             all of
//!        | "|(" expr ("," expr)* ")"             any of
//!        | "!" expr                              not
//!        | "#(" cmp ("," cmp)* ")"               numeric comparisons
//!        | name ("," name)* "=" value            tag match
//!        | matcher                               match the default tags
//! value := "!" value | "&(" value, … ")" | "|(" value, … ")" | matcher
//! matcher := "/" regex "/" flags | '"' text '"' flags | word
//! cmp   := tag op value
//! ```
//!
//! Words match as case-insensitive substrings and quoted text as a
//! case-insensitive exact match. Regexes are case-insensitive unless the `c`
//! flag follows the closing slash. The parser follows the shape of a
//! recursive-descent expression parser: each rule consumes what it recognises
//! and reports the byte offset of the first thing it cannot.

mod cursor;

use regex::{Regex, RegexBuilder};
use songpat_record::Record;

use crate::errors::QueryError;
use crate::numcmp::{Numcmp, unix_now};
use crate::predicate::Predicate;
use crate::tag::TagMatch;
use cursor::Cursor;

/// Tags searched by values that do not name a tag.
pub const DEFAULT_TAGS: [&str; 8] = [
    "artist",
    "album",
    "title",
    "version",
    "albumartist",
    "performer",
    "composer",
    "genre",
];

/// A parsed query together with its source text.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    root: Predicate,
}

impl Query {
    /// Parse `text`, resolving relative times against the wall clock.
    ///
    /// # Errors
    /// Returns [`QueryError`] when the text is malformed or a comparison
    /// cannot be built.
    pub fn parse(text: &str) -> Result<Self, QueryError> {
        Self::parse_at(text, unix_now())
    }

    /// Parse `text` using `now` (Unix seconds) as the current time.
    ///
    /// # Errors
    /// See [`Query::parse`].
    pub fn parse_at(text: &str, now: f64) -> Result<Self, QueryError> {
        let root = Parser::new(text, now).parse_query()?;
        log::debug!("parsed query `{text}`");
        Ok(Self {
            text: text.to_owned(),
            root,
        })
    }

    /// Report whether `text` parses as a query.
    #[must_use]
    pub fn is_parsable(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    /// Evaluate the query against `record`.
    pub fn search<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.root.search(record)
    }

    /// The query text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The predicate tree.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.root
    }

    /// Consume the query, returning its predicate tree.
    #[must_use]
    pub fn into_predicate(self) -> Predicate {
        self.root
    }
}

/// Parse `text` into a predicate.
///
/// # Errors
/// See [`Query::parse`].
pub fn compile_predicate(text: &str) -> Result<Predicate, QueryError> {
    Query::parse(text).map(Query::into_predicate)
}

/// Deepest nesting of groups and negations a query may use.
const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    cursor: Cursor<'a>,
    now: f64,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, now: f64) -> Self {
        Self {
            cursor: Cursor::new(input),
            now,
            depth: 0,
        }
    }

    fn nested<T, F>(&mut self, parse: F) -> Result<T, QueryError>
    where
        F: FnOnce(&mut Self) -> Result<T, QueryError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(self.cursor.error("query nested too deeply"));
        }
        self.depth += 1;
        let parsed = parse(self);
        self.depth -= 1;
        parsed
    }

    fn parse_query(&mut self) -> Result<Predicate, QueryError> {
        let mut items = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.at_end() {
                break;
            }
            items.push(self.parse_expr()?);
        }
        Ok(collapse(items, Predicate::Inter))
    }

    fn parse_expr(&mut self) -> Result<Predicate, QueryError> {
        self.nested(Self::parse_expr_here)
    }

    fn parse_expr_here(&mut self) -> Result<Predicate, QueryError> {
        self.cursor.skip_whitespace();
        if self.cursor.eat_str("&(") {
            let items = self.parse_list(Self::parse_expr)?;
            return Ok(collapse(items, Predicate::Inter));
        }
        if self.cursor.eat_str("|(") {
            let items = self.parse_list(Self::parse_expr)?;
            return Ok(collapse(items, Predicate::Union));
        }
        if self.cursor.eat_str("#(") {
            let items = self.parse_list(Self::parse_numcmp)?;
            return Ok(collapse(items, Predicate::Inter));
        }
        if self.cursor.eat('!') {
            return Ok(Predicate::neg(self.parse_expr()?));
        }
        if let Some(names) = self.try_parse_names() {
            return self.parse_value(&names);
        }
        let matcher = self.parse_matcher()?;
        Ok(Predicate::Tag(TagMatch::new(DEFAULT_TAGS, vec![matcher])))
    }

    /// Parse comma-separated items up to the closing `)`; the opening
    /// delimiter has already been consumed.
    fn parse_list<F>(&mut self, mut item: F) -> Result<Vec<Predicate>, QueryError>
    where
        F: FnMut(&mut Self) -> Result<Predicate, QueryError>,
    {
        let open = self.cursor.pos().saturating_sub(1);
        let mut items = vec![item(self)?];
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.eat(',') {
                items.push(item(self)?);
            } else if self.cursor.eat(')') {
                return Ok(items);
            } else if self.cursor.at_end() {
                return Err(QueryError::syntax(open, "missing ')'"));
            } else {
                return Err(self.cursor.error("expected ',' or ')'"));
            }
        }
    }

    /// Read `name ("," name)* "="`, rewinding when the input is not a tag
    /// list.
    fn try_parse_names(&mut self) -> Option<Vec<String>> {
        let start = self.cursor.pos();
        let mut names = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            let name = self.cursor.take_while(is_tag_char);
            if name.is_empty() {
                break;
            }
            names.push(name.to_owned());
            self.cursor.skip_whitespace();
            if self.cursor.eat('=') {
                return Some(names);
            }
            if !self.cursor.eat(',') {
                break;
            }
        }
        self.cursor.reset(start);
        None
    }

    fn parse_value(&mut self, names: &[String]) -> Result<Predicate, QueryError> {
        self.nested(|parser| parser.parse_value_here(names))
    }

    fn parse_value_here(&mut self, names: &[String]) -> Result<Predicate, QueryError> {
        self.cursor.skip_whitespace();
        if self.cursor.eat('!') {
            return Ok(Predicate::neg(self.parse_value(names)?));
        }
        if self.cursor.eat_str("&(") {
            let items = self.parse_list(|parser| parser.parse_value(names))?;
            return Ok(collapse(items, Predicate::Inter));
        }
        if self.cursor.eat_str("|(") {
            let items = self.parse_list(|parser| parser.parse_value(names))?;
            return Ok(collapse(items, Predicate::Union));
        }
        let matcher = self.parse_matcher()?;
        Ok(Predicate::Tag(TagMatch::new(names, vec![matcher])))
    }

    fn parse_matcher(&mut self) -> Result<Regex, QueryError> {
        self.cursor.skip_whitespace();
        let start = self.cursor.pos();
        if self.cursor.eat('/') {
            let source = self.cursor.read_delimited('/', start)?;
            return self.build_regex(&source);
        }
        if self.cursor.eat('"') {
            let text = self.cursor.read_delimited('"', start)?;
            return self.build_regex(&format!("^{}$", regex::escape(&text)));
        }
        let word = self
            .cursor
            .take_while(|c| !c.is_whitespace() && !matches!(c, ',' | '(' | ')'));
        if word.is_empty() {
            return Err(self.cursor.error(match self.cursor.peek_char() {
                Some(ch) => format!("expected a value but found '{ch}'"),
                None => "expected a value".to_owned(),
            }));
        }
        self.build_regex(&regex::escape(word))
    }

    fn build_regex(&mut self, source: &str) -> Result<Regex, QueryError> {
        let flags_at = self.cursor.pos();
        let flags = self.cursor.take_while(|c| c.is_ascii_alphabetic());
        let mut case_insensitive = true;
        for flag in flags.chars() {
            match flag {
                'c' => case_insensitive = false,
                'i' => case_insensitive = true,
                other => {
                    return Err(QueryError::syntax(
                        flags_at,
                        format!("unknown match flag '{other}'"),
                    ));
                }
            }
        }
        Ok(RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()?)
    }

    fn parse_numcmp(&mut self) -> Result<Predicate, QueryError> {
        self.cursor.skip_whitespace();
        let tag = self.cursor.take_while(is_tag_char);
        if tag.is_empty() {
            return Err(self.cursor.error("expected a tag name"));
        }
        self.cursor.skip_whitespace();
        let op = self.cursor.take_while(|c| matches!(c, '<' | '>' | '=' | '!'));
        if op.is_empty() {
            return Err(self.cursor.error("expected a comparison operator"));
        }
        let raw = self.cursor.take_while(|c| !matches!(c, ',' | ')'));
        Numcmp::with_now(tag, op, raw, self.now).map(Predicate::Numcmp)
    }
}

fn collapse(mut items: Vec<Predicate>, build: fn(Vec<Predicate>) -> Predicate) -> Predicate {
    if items.len() == 1 {
        if let Some(only) = items.pop() {
            return only;
        }
    }
    build(items)
}

fn is_tag_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '~' | '#' | ':')
}
