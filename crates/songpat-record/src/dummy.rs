//! A record that answers every tag, used to validate patterns.

use std::borrow::Cow;

use crate::record::Record;
use crate::tags::NUMERIC_PREFIX;

/// File name reported by [`DummyRecord`] for `~filename`.
pub const DUMMY_FILENAME: &str = "/dummy/dummy.mp3";

const DUMMY_DIRNAME: &str = "/dummy";
const DUMMY_BASENAME: &str = "dummy.mp3";

/// Record whose every tag is non-empty.
///
/// Text tags answer with their own name and numeric tags with `1`, so every
/// conditional takes its first branch. `~filename` is an absolute path with an
/// extension, and `~dirname`/`~basename` are its parts, so path patterns can
/// be checked for rooting.
///
/// # Examples
/// ```
/// use songpat_record::{DummyRecord, Record};
/// assert_eq!(DummyRecord.comma("artist"), "artist");
/// assert_eq!(DummyRecord.numeric("~#rating"), Some(1.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DummyRecord;

impl Record for DummyRecord {
    fn get(&self, tag: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.comma(tag)))
    }

    fn comma(&self, tag: &str) -> String {
        match tag {
            "~filename" => DUMMY_FILENAME.to_owned(),
            "~dirname" => DUMMY_DIRNAME.to_owned(),
            "~basename" => DUMMY_BASENAME.to_owned(),
            _ if tag.starts_with(NUMERIC_PREFIX) => "1".to_owned(),
            _ => tag.to_owned(),
        }
    }

    fn list_separate(&self, tag: &str) -> Vec<String> {
        vec![self.comma(tag)]
    }

    fn numeric(&self, _tag: &str) -> Option<f64> {
        Some(1.0)
    }
}
