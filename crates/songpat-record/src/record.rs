//! The capability set a record exposes to patterns and queries.

use std::borrow::Cow;

/// Read access to the tags of a single song.
///
/// Implementors decide how values are stored. Multi-valued tags are
/// newline-joined on the [`get`](Record::get) path, joined with an
/// application-defined separator on the [`comma`](Record::comma) path and
/// kept as a genuine list on the [`list_separate`](Record::list_separate)
/// path.
pub trait Record {
    /// Return the stored value of `tag`, or `None` when the field is absent.
    ///
    /// Synthetic (`~`-prefixed) tags are not required to be answered here.
    fn get(&self, tag: &str) -> Option<Cow<'_, str>>;

    /// Return the display value of `tag`, computing synthetic tags.
    ///
    /// Absent tags yield an empty string.
    fn comma(&self, tag: &str) -> String;

    /// Return every value of `tag` as an ordered list.
    fn list_separate(&self, tag: &str) -> Vec<String>;

    /// Return the numeric value of `tag`, accepting names with or without the
    /// `~#` prefix.
    fn numeric(&self, tag: &str) -> Option<f64>;
}

impl<R: Record + ?Sized> Record for &R {
    fn get(&self, tag: &str) -> Option<Cow<'_, str>> {
        (**self).get(tag)
    }

    fn comma(&self, tag: &str) -> String {
        (**self).comma(tag)
    }

    fn list_separate(&self, tag: &str) -> Vec<String> {
        (**self).list_separate(tag)
    }

    fn numeric(&self, tag: &str) -> Option<f64> {
        (**self).numeric(tag)
    }
}
