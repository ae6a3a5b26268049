//! Path dialect helpers: value sanitising and output completion.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path};

use songpat_record::Record;

use crate::config;

/// Characters that would split a value into several path segments.
const SEPARATOR_LOOKALIKES: [char; 3] = [MAIN_SEPARATOR, '\u{ff0f}', '\u{2215}'];

const ELLIPSIS: &str = "..";

/// Tags whose values are paths themselves and keep their separators.
const PATH_TAGS: [&str; 2] = ["~filename", "~dirname"];

/// Sanitise a single tag value for use inside a file name.
pub(crate) fn format_value(tag: &str, value: &str) -> String {
    if PATH_TAGS.contains(&tag) {
        return value.trim().to_owned();
    }
    let padded = pad_number(tag, value);
    padded
        .as_deref()
        .unwrap_or(value)
        .replace(SEPARATOR_LOOKALIKES, "_")
        .trim()
        .to_owned()
}

/// Zero-pad `tracknumber` to the width of its total (at least two digits)
/// and `discnumber` to two digits. Values that are not numbers are kept.
fn pad_number(tag: &str, value: &str) -> Option<String> {
    let mut parts = value.split('/');
    let width = match tag {
        "tracknumber" => parts
            .clone()
            .nth(1)
            .and_then(|total| total.trim().parse::<i64>().ok())
            .map_or(1, |total| total.to_string().len())
            .max(2),
        "discnumber" => 2,
        _ => return None,
    };
    let number: i64 = parts.next()?.trim().parse().ok()?;
    Some(format!("{number:0width$}"))
}

/// Environment a path formatter completes its output with, captured when
/// the formatter is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathSettings {
    pub(crate) segment_limit: usize,
    pub(crate) home: Option<String>,
}

impl PathSettings {
    /// Read the segment limit from [`config`] and the home directory from
    /// `HOME`.
    pub(crate) fn current() -> Self {
        Self {
            segment_limit: config::path_segment_limit(),
            home: std::env::var("HOME").ok().filter(|home| !home.is_empty()),
        }
    }
}

/// Complete formatted output into a file path.
///
/// Appends the record's file extension when missing, expands a leading `~`
/// and limits every segment to the configured number of bytes.
pub(crate) fn finish(mut output: String, record: &dyn Record, settings: &PathSettings) -> String {
    if output.is_empty() {
        return output;
    }
    if let Some(extension) = extension_of(&record.comma("~filename")) {
        if !output.to_lowercase().ends_with(&extension) {
            output.push_str(&extension);
        }
    }
    limit_path(
        &expand_home(output, settings.home.as_deref()),
        settings.segment_limit,
    )
}

/// Report whether output must be rejected for not being an absolute path.
///
/// Relative output is allowed only for a bare file name from a pattern that
/// does not itself start at the root or the home directory.
pub(crate) fn is_unrooted(output: &str, source: &str) -> bool {
    if output.is_empty() || Path::new(output).is_absolute() {
        return false;
    }
    let source = source.trim_start();
    output.contains(MAIN_SEPARATOR) || source.starts_with(MAIN_SEPARATOR) || source.starts_with('~')
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .map(|extension| format!(".{}", extension.to_lowercase()))
}

/// The part after a leading `~` or `~/`, if `path` starts at home.
fn home_relative(path: &str) -> Option<&str> {
    path.strip_prefix('~')
        .filter(|rest| rest.is_empty() || rest.starts_with(MAIN_SEPARATOR))
}

fn expand_home(path: String, home: Option<&str>) -> String {
    match (home_relative(&path), home) {
        (Some(rest), Some(home)) => format!("{}{rest}", home.trim_end_matches(MAIN_SEPARATOR)),
        _ => path,
    }
}

/// Report whether `output` still starts at `~` because no home directory
/// was known.
pub(crate) fn is_unexpanded_home(output: &str) -> bool {
    home_relative(output).is_some()
}

/// Truncate each segment of `path` to `limit` bytes, keeping the extension
/// of the final segment intact.
fn limit_path(path: &str, limit: usize) -> String {
    let (main, extension) = split_extension(path);
    let parts: Vec<&str> = main.split(MAIN_SEPARATOR).collect();
    let last = parts.len().saturating_sub(1);
    let limited: Vec<Cow<'_, str>> = parts
        .iter()
        .enumerate()
        .map(|(index, part)| {
            let budget = if index == last {
                limit.saturating_sub(extension.len())
            } else {
                limit
            };
            truncate_segment(part, budget)
        })
        .collect();
    format!("{}{extension}", limited.join(MAIN_SEPARATOR_STR))
}

fn truncate_segment(segment: &str, budget: usize) -> Cow<'_, str> {
    if segment.len() <= budget {
        return Cow::Borrowed(segment);
    }
    let keep = floor_char_boundary(segment, budget.saturating_sub(ELLIPSIS.len()));
    Cow::Owned(format!(
        "{}{ELLIPSIS}",
        segment.get(..keep).unwrap_or_default()
    ))
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    (0..=index.min(text.len()))
        .rev()
        .find(|&candidate| text.is_char_boundary(candidate))
        .unwrap_or(0)
}

/// Split off the extension of the final segment; leading dots of a file
/// name do not start an extension.
fn split_extension(path: &str) -> (&str, &str) {
    let name_start = path.rfind(MAIN_SEPARATOR).map_or(0, |index| index + 1);
    let name = path.get(name_start..).unwrap_or_default();
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(dot) if dot >= leading_dots => path.split_at(name_start + dot),
        _ => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use songpat_record::Song;

    #[rstest]
    #[case("tracknumber", "3", "03")]
    #[case("tracknumber", "3/12", "03")]
    #[case("tracknumber", "7/120", "007")]
    #[case("tracknumber", "12/x", "12")]
    #[case("tracknumber", "A1", "A1")]
    #[case("discnumber", "3/12", "03")]
    #[case("discnumber", "1", "01")]
    #[case("title", "AC/DC", "AC_DC")]
    #[case("title", "a\u{ff0f}b\u{2215}c", "a_b_c")]
    #[case("title", "  padded  ", "padded")]
    #[case("date", "7", "7")]
    #[case("~dirname", "/music/in", "/music/in")]
    fn formats_path_values(#[case] tag: &str, #[case] value: &str, #[case] expected: &str) {
        assert_eq!(format_value(tag, value), expected);
    }

    #[rstest]
    #[case("/music/a.b/track", ("/music/a.b/track", ""))]
    #[case("/music/track.mp3", ("/music/track", ".mp3"))]
    #[case("/music/.hidden", ("/music/.hidden", ""))]
    #[case("..a.b", ("..a", ".b"))]
    fn splits_extensions(#[case] path: &str, #[case] expected: (&str, &str)) {
        assert_eq!(split_extension(path), expected);
    }

    fn settings(segment_limit: usize, home: Option<&str>) -> PathSettings {
        PathSettings {
            segment_limit,
            home: home.map(str::to_owned),
        }
    }

    #[rstest]
    #[case("~/music", Some("/home/ann"), "/home/ann/music")]
    #[case("~", Some("/home/ann/"), "/home/ann")]
    #[case("~ann/music", Some("/home/ann"), "~ann/music")]
    #[case("~/music", None, "~/music")]
    #[case("/music", None, "/music")]
    fn expands_the_home_directory(
        #[case] path: &str,
        #[case] home: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(expand_home(path.to_owned(), home), expected);
    }

    #[rstest]
    #[case("~/music", true)]
    #[case("~", true)]
    #[case("~ann/music", false)]
    #[case("/home/ann/music", false)]
    fn detects_unexpanded_home(#[case] output: &str, #[case] expected: bool) {
        assert_eq!(is_unexpanded_home(output), expected);
    }

    #[test]
    fn appends_missing_extension_from_filename() {
        let song = Song::new().with("~filename", "/in/song.FLAC");
        assert_eq!(finish("/out/song".into(), &song, &settings(255, None)), "/out/song.flac");
        assert_eq!(finish("/out/song.flac".into(), &song, &settings(255, None)), "/out/song.flac");
        assert_eq!(finish(String::new(), &song, &settings(255, None)), "");
    }

    #[test]
    fn limits_each_segment_keeping_the_extension() {
        let song = Song::new().with("~filename", "/in/x.ogg");
        let long = "a".repeat(20);
        let output = finish(format!("/{long}/{long}"), &song, &settings(10, None));
        assert_eq!(output, "/aaaaaaaa../aaaa...ogg");
    }

    #[test]
    fn truncates_on_character_boundaries() {
        assert_eq!(truncate_segment("ééééé", 7), "éé..");
        assert_eq!(truncate_segment("short", 7), "short");
    }

    #[rstest]
    #[case("title.mp3", "<title>", false)]
    #[case("artist/title.mp3", "<artist>/<title>", true)]
    #[case("/music/title.mp3", "/music/<title>", false)]
    #[case("title.mp3", "~<title>", true)]
    #[case("", "<artist>/<title>", false)]
    fn detects_unrooted_output(#[case] output: &str, #[case] source: &str, #[case] expected: bool) {
        assert_eq!(is_unrooted(output, source), expected);
    }
}
