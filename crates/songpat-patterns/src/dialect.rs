//! Output dialects.
//!
//! A dialect decides how tag values are rendered before they are spliced into
//! the output, and how the finished output is post-processed. Literal pattern
//! text is never escaped.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::PatternError;
use crate::path;

static PRESENTATION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(/?(?:b|i|u|s|tt|sub|sup|small|big|span)(?:\s[^\]]*)?)\]")
        .unwrap_or_else(|_| unreachable!())
});

/// How a formatter renders values and finishes its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Values are used as they are.
    #[default]
    Plain,
    /// File names: numbers are padded, separators replaced and the output
    /// completed into a usable path.
    Path,
    /// Values are escaped for XML markup.
    Markup,
    /// Like [`Dialect::Markup`], with `[b]…[/b]` style presentation tags in
    /// the pattern text.
    BracketMarkup,
}

impl Dialect {
    /// Every dialect, in declaration order.
    pub const ALL: [Self; 4] = [Self::Plain, Self::Path, Self::Markup, Self::BracketMarkup];

    /// The dialect's name as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Path => "path",
            Self::Markup => "markup",
            Self::BracketMarkup => "bracket-markup",
        }
    }

    /// Rewrite pattern text before it is scanned.
    pub(crate) fn preprocess(self, source: &str) -> Cow<'_, str> {
        match self {
            Self::BracketMarkup => Cow::Owned(rewrite_brackets(source)),
            Self::Plain | Self::Path | Self::Markup => Cow::Borrowed(source),
        }
    }

    /// Render the value of `tag` for this dialect.
    pub(crate) fn format_value<'v>(self, tag: &str, value: &'v str) -> Cow<'v, str> {
        match self {
            Self::Plain => Cow::Borrowed(value),
            Self::Path => Cow::Owned(path::format_value(tag, value)),
            Self::Markup | Self::BracketMarkup => escape_markup(value),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.name() == wanted)
            .ok_or_else(|| PatternError::UnknownDialect(s.to_owned()))
    }
}

fn escape_markup(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Turn `[b]` style tags into escaped `\<b\>` pattern text.
///
/// `\[` yields a literal `[`; other escapes are left for the lexer.
fn rewrite_brackets(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    while let Some(rest) = source.get(pos..) {
        let mut chars = rest.chars();
        let Some(ch) = chars.next() else {
            break;
        };
        if ch == '\\' {
            match chars.next() {
                Some('[') => out.push('['),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
            pos += rest.len() - chars.as_str().len();
            continue;
        }
        if ch == '[' {
            if let Some(captures) = PRESENTATION_TAG.captures(rest) {
                if let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) {
                    out.push_str("\\<");
                    push_escaped(&mut out, inner.as_str());
                    out.push_str("\\>");
                    pos += whole.end();
                    continue;
                }
            }
        }
        out.push(ch);
        pos += ch.len_utf8();
    }
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(ch, '\\' | '<' | '>' | '|') {
            out.push('\\');
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", Dialect::Plain)]
    #[case("PATH", Dialect::Path)]
    #[case(" markup ", Dialect::Markup)]
    #[case("bracket-markup", Dialect::BracketMarkup)]
    fn parses_dialect_names(#[case] raw: &str, #[case] expected: Dialect) {
        assert_eq!(raw.parse::<Dialect>(), Ok(expected));
    }

    #[test]
    fn names_round_trip_through_display() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
    }

    #[test]
    fn rejects_unknown_dialects() {
        assert_eq!(
            "html".parse::<Dialect>(),
            Err(PatternError::UnknownDialect("html".into()))
        );
    }

    #[test]
    fn escapes_markup_values() {
        assert_eq!(
            Dialect::Markup.format_value("title", r#"Tom & "Jerry's" <b>"#),
            "Tom &amp; &quot;Jerry&#39;s&quot; &lt;b&gt;"
        );
        assert!(matches!(
            Dialect::Markup.format_value("title", "clean"),
            Cow::Borrowed("clean")
        ));
    }

    #[rstest]
    #[case("[b]<title>[/b]", r"\<b\><title>\</b\>")]
    #[case(r#"[span weight="bold"]x[/span]"#, r#"\<span weight="bold"\>x\</span\>"#)]
    #[case(r"\[b]", "[b]")]
    #[case("[bold] [x]", "[bold] [x]")]
    #[case(r"a\<b", r"a\<b")]
    #[case("[span a|b]", r"\<span a\|b\>")]
    fn rewrites_presentation_tags(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(Dialect::BracketMarkup.preprocess(source), expected);
    }

    #[test]
    fn other_dialects_keep_source_text() {
        assert!(matches!(
            Dialect::Markup.preprocess("[b]x[/b]"),
            Cow::Borrowed("[b]x[/b]")
        ));
    }
}
