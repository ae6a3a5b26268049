//! Loading songs from JSON documents.
//!
//! A songs file is an array of objects. Each key is a tag name and each value
//! is a string, a number or an array of strings:
//!
//! ```json
//! [{"artist": ["Ann", "Bob"], "title": "Duet", "length": 185}]
//! ```
//!
//! Numbers are stored as numeric tags, so `length` above becomes `~#length`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use songpat_record::Song;

use crate::error::CliError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

type RawSong = BTreeMap<String, FieldValue>;

fn into_song(raw: RawSong) -> Song {
    raw.into_iter()
        .fold(Song::new(), |song, (tag, value)| match value {
            FieldValue::Text(text) => song.with(&tag, text),
            FieldValue::Number(number) => song.with_numeric(&tag, number),
            FieldValue::List(values) => song.with_values(&tag, values),
        })
}

/// Decode songs from JSON text.
///
/// # Errors
///
/// Returns the decoder error when `text` is not an array of song objects.
pub fn parse_songs(text: &str) -> Result<Vec<Song>, serde_json::Error> {
    let raw: Vec<RawSong> = serde_json::from_str(text)?;
    Ok(raw.into_iter().map(into_song).collect())
}

/// Read and decode the songs stored at `path`.
///
/// # Errors
///
/// Returns [`CliError::ReadSongs`] when the file cannot be read and
/// [`CliError::MalformedSongs`] when its content is not a songs document.
pub fn load_songs(path: &Path) -> Result<Vec<Song>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadSongs {
        path: path.to_path_buf(),
        source,
    })?;
    let songs = parse_songs(&text).map_err(|source| CliError::MalformedSongs {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(count = songs.len(), path = %path.display(), "loaded songs");
    Ok(songs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use songpat_record::Record;

    fn parsed(text: &str) -> Vec<Song> {
        parse_songs(text).unwrap_or_else(|err| panic!("songs should parse: {err}"))
    }

    #[test]
    fn decodes_each_value_kind() {
        let songs = parsed(r#"[{"artist": ["Ann", "Bob"], "title": "Duet", "length": 185}]"#);
        let [song] = songs.as_slice() else {
            panic!("expected one song, got {}", songs.len());
        };
        assert_eq!(song.values("artist"), ["Ann", "Bob"]);
        assert_eq!(song.comma("title"), "Duet");
        assert_eq!(song.numeric("length"), Some(185.0));
        assert_eq!(song.values("~#length"), ["185"]);
    }

    #[test]
    fn empty_documents_hold_no_songs() {
        assert!(parsed("[]").is_empty());
    }

    #[rstest]
    #[case(r#"{"title": "not a list"}"#)]
    #[case(r#"[{"title": true}]"#)]
    #[case(r#"[{"artist": ["Ann", 3]}]"#)]
    #[case("[")]
    fn rejects_malformed_documents(#[case] text: &str) {
        assert!(parse_songs(text).is_err());
    }

    #[test]
    fn missing_files_report_their_path() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("absent.json");
        let Err(err) = load_songs(&path) else {
            panic!("missing file should fail");
        };
        assert!(matches!(err, CliError::ReadSongs { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn loads_songs_from_disk() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let path = dir.path().join("songs.json");
        std::fs::write(&path, r#"[{"title": "One"}, {"title": "Two"}]"#)
            .unwrap_or_else(|err| panic!("write songs: {err}"));
        let songs = load_songs(&path).unwrap_or_else(|err| panic!("load songs: {err}"));
        let titles: Vec<String> = songs.iter().map(|song| song.comma("title")).collect();
        assert_eq!(titles, ["One", "Two"]);
    }
}
