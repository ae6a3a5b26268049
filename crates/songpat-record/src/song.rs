//! In-memory song record.
//!
//! `Song` keeps every tag as an ordered list of text values. Numeric tags are
//! stored under their `~#` name and parsed on demand, so a song built from a
//! JSON document or by hand answers the same way.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::record::Record;
use crate::tags::{NUMERIC_PREFIX, TIED_JOIN, is_tied, tagsplit};

const DEFAULT_JOIN: &str = ", ";

/// A song held entirely in memory.
///
/// # Examples
/// ```
/// use songpat_record::{Record, Song};
///
/// let song = Song::new()
///     .with_values("artist", ["Ann", "Bob"])
///     .with("title", "Song")
///     .with_numeric("length", 185.0);
/// assert_eq!(song.comma("artist"), "Ann, Bob");
/// assert_eq!(song.comma("~artist~title"), "Ann, Bob - Song");
/// assert_eq!(song.comma("~length"), "3:05");
/// assert_eq!(song.numeric("length"), Some(185.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    fields: BTreeMap<String, Vec<String>>,
    join: String,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
            join: DEFAULT_JOIN.to_owned(),
        }
    }
}

impl Song {
    /// Create an empty song.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `tag` to a single value.
    #[must_use]
    pub fn with(mut self, tag: &str, value: impl Into<String>) -> Self {
        self.set(tag, value);
        self
    }

    /// Set `tag` to several values, replacing any existing ones.
    #[must_use]
    pub fn with_values<I, S>(mut self, tag: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(tag.to_owned(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Store a numeric tag under its `~#` name.
    #[must_use]
    pub fn with_numeric(mut self, tag: &str, value: f64) -> Self {
        self.set_numeric(tag, value);
        self
    }

    /// Use `join` between values on the comma path.
    #[must_use]
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = join.into();
        self
    }

    /// Replace the values of `tag` with `value`.
    pub fn set(&mut self, tag: &str, value: impl Into<String>) {
        self.fields.insert(tag.to_owned(), vec![value.into()]);
    }

    /// Append `value` to the values of `tag`.
    pub fn add(&mut self, tag: &str, value: impl Into<String>) {
        self.fields
            .entry(tag.to_owned())
            .or_default()
            .push(value.into());
    }

    /// Store a numeric tag under its `~#` name.
    pub fn set_numeric(&mut self, tag: &str, value: f64) {
        let name = tag.strip_prefix(NUMERIC_PREFIX).unwrap_or(tag);
        self.set(&format!("{NUMERIC_PREFIX}{name}"), format_number(value));
    }

    /// Return the stored values of `tag`.
    #[must_use]
    pub fn values(&self, tag: &str) -> &[String] {
        self.fields.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterate over stored tag names in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn first(&self, tag: &str) -> Option<&str> {
        self.values(tag).first().map(String::as_str)
    }

    fn computed(&self, tag: &str) -> Option<String> {
        match tag {
            "~basename" => self
                .first("~filename")
                .map(|path| path.rsplit('/').next().unwrap_or(path).to_owned()),
            "~dirname" => self.first("~filename").map(|path| {
                path.rsplit_once('/')
                    .map_or_else(String::new, |(dir, _)| dir.to_owned())
            }),
            "~length" => self.numeric("length").map(format_duration),
            _ => None,
        }
    }
}

impl Record for Song {
    fn get(&self, tag: &str) -> Option<Cow<'_, str>> {
        match self.values(tag) {
            [] => None,
            [single] => Some(Cow::Borrowed(single.as_str())),
            many => Some(Cow::Owned(many.join("\n"))),
        }
    }

    fn comma(&self, tag: &str) -> String {
        if is_tied(tag) {
            return tagsplit(tag)
                .iter()
                .map(|part| self.comma(part))
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(TIED_JOIN);
        }
        if let Some(name) = tag.strip_prefix(NUMERIC_PREFIX) {
            return self.numeric(name).map(format_number).unwrap_or_default();
        }
        if let Some(value) = self.computed(tag) {
            return value;
        }
        self.values(tag).join(&self.join)
    }

    fn list_separate(&self, tag: &str) -> Vec<String> {
        if is_tied(tag) {
            let parts: Vec<Vec<String>> = tagsplit(tag)
                .iter()
                .map(|part| self.list_separate(part))
                .filter(|values| !values.is_empty())
                .collect();
            if parts.is_empty() {
                return Vec::new();
            }
            return parts.iter().fold(vec![String::new()], |acc, values| {
                acc.iter()
                    .flat_map(|prefix| {
                        values.iter().map(move |value| {
                            if prefix.is_empty() {
                                value.clone()
                            } else {
                                format!("{prefix}{TIED_JOIN}{value}")
                            }
                        })
                    })
                    .collect()
            });
        }
        if tag.starts_with(NUMERIC_PREFIX) || self.computed(tag).is_some() {
            let value = self.comma(tag);
            return if value.is_empty() {
                Vec::new()
            } else {
                vec![value]
            };
        }
        self.values(tag).to_vec()
    }

    fn numeric(&self, tag: &str) -> Option<f64> {
        let name = tag.strip_prefix(NUMERIC_PREFIX).unwrap_or(tag);
        if let Some(raw) = self.first(&format!("{NUMERIC_PREFIX}{name}")) {
            return raw.trim().parse().ok();
        }
        // Stored text such as a `3/12` track number counts by its first part.
        self.first(name)
            .and_then(|raw| raw.split('/').next())
            .and_then(|head| head.trim().parse().ok())
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "song lengths are small non-negative second counts"
)]
fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, rest) = (total / 3600, total % 3600);
    let (minutes, secs) = (rest / 60, rest % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
