//! Character cursor over query text.
//!
//! Query values are context dependent (a `/` opens a regex only where a value
//! is expected), so the parser reads characters on demand through this cursor
//! instead of consuming a pre-built token stream.

use crate::errors::QueryError;

pub(super) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn pos(&self) -> usize {
        self.pos
    }

    pub(super) fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(super) fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(super) fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().next())
    }

    pub(super) fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub(super) fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    pub(super) fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(super) fn eat_str(&mut self, expected: &str) -> bool {
        let found = self
            .input
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(expected));
        if found {
            self.pos += expected.len();
        }
        found
    }

    pub(super) fn take_while<P>(&mut self, mut predicate: P) -> &'a str
    where
        P: FnMut(char) -> bool,
    {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if predicate(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        self.input.get(start..self.pos).unwrap_or_default()
    }

    /// Read up to the next unescaped `delimiter`, consuming it.
    ///
    /// A backslash before the delimiter or before another backslash is
    /// dropped; any other escape is kept verbatim so regex escapes survive.
    pub(super) fn read_delimited(
        &mut self,
        delimiter: char,
        opened_at: usize,
    ) -> Result<String, QueryError> {
        let mut text = String::new();
        loop {
            match self.bump_char() {
                Some(ch) if ch == delimiter => return Ok(text),
                Some('\\') => match self.bump_char() {
                    Some(next) if next == delimiter || next == '\\' => text.push(next),
                    Some(next) => {
                        text.push('\\');
                        text.push(next);
                    }
                    None => break,
                },
                Some(ch) => text.push(ch),
                None => break,
            }
        }
        Err(QueryError::syntax(
            opened_at,
            format!("missing closing '{delimiter}'"),
        ))
    }

    pub(super) fn error(&self, reason: impl Into<String>) -> QueryError {
        QueryError::syntax(self.pos, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_delimited_text_with_escapes() {
        let mut cursor = Cursor::new(r#"a \"b\" \d"rest"#);
        let text = cursor
            .read_delimited('"', 0)
            .unwrap_or_else(|err| panic!("delimited text should read: {err}"));
        assert_eq!(text, r#"a "b" \d"#);
        assert_eq!(cursor.take_while(|_| true), "rest");
    }

    #[test]
    fn reports_unterminated_text() {
        let mut cursor = Cursor::new("abc");
        let Err(err) = cursor.read_delimited('/', 7) else {
            panic!("unterminated text should fail");
        };
        assert_eq!(err.to_string(), "invalid query at byte 7: missing closing '/'");
    }

    #[test]
    fn eats_multibyte_prefixes() {
        let mut cursor = Cursor::new("é&(x");
        assert!(cursor.eat('é'));
        assert!(cursor.eat_str("&("));
        assert_eq!(cursor.peek_char(), Some('x'));
    }
}
