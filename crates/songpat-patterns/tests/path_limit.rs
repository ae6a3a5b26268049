//! Path segment limits taken from the runtime configuration.
//!
//! Kept in its own test binary so the process-wide override cannot leak into
//! other path tests.

use serial_test::serial;
use songpat_patterns::{Dialect, Formatter, config};
use songpat_record::Song;

fn song() -> Song {
    Song::new()
        .with("~filename", "/music/in/track.mp3")
        .with("album", "Back in Black")
        .with("title", "Hells Bells")
}

#[test]
#[serial]
fn segments_follow_the_configured_limit() {
    config::set_path_segment_limit(8);
    let formatter = Formatter::new("/<album>/<title>", Dialect::Path);
    let output = formatter.map(|pattern| pattern.format(&song()));
    config::clear_path_segment_limit_override();
    assert_eq!(output.as_deref(), Ok("/Back i../He...mp3"));
}

#[test]
#[serial]
fn default_limit_keeps_ordinary_names() {
    config::clear_path_segment_limit_override();
    let output = Formatter::new("/<album>/<title>", Dialect::Path)
        .map(|pattern| pattern.format(&song()));
    assert_eq!(output.as_deref(), Ok("/Back in Black/Hells Bells.mp3"));
}

#[test]
#[serial]
fn compiled_formatters_keep_their_limit() {
    config::clear_path_segment_limit_override();
    let song = Song::new()
        .with("~filename", "/music/in/track.mp3")
        .with("title", "abcdefghijkl");
    let formatter = Formatter::new("/<title>", Dialect::Path)
        .unwrap_or_else(|err| panic!("pattern should compile: {err}"));
    let before = formatter.format(&song);
    config::set_path_segment_limit(6);
    let after = formatter.format(&song);
    config::clear_path_segment_limit_override();
    assert_eq!(before, "/abcdefghijkl.mp3");
    assert_eq!(after, before);
}
