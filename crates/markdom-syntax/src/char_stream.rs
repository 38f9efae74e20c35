//! # CharacterStream - Positional Cursor
//!
//! The leaf of the scanning pipeline: a cursor over the raw source that keeps
//! a byte offset for slicing and a `(row, column)` [`Position`] for every
//! character it consumes.
//!
//! Pattern lookups ([`test`](CharacterStream::test),
//! [`find`](CharacterStream::find), [`captures`](CharacterStream::captures))
//! are *floating*: they search forward from the cursor but run against the
//! whole source, so `^` in multi-line mode still knows whether the cursor
//! sits at the start of a row.

use regex::{Captures, Match, Regex};

use crate::error::ScanError;
use crate::position::Position;

/// How many characters of upcoming text a diagnostic snippet shows.
const CONTEXT_CHARS: usize = 24;

#[derive(Debug, Clone)]
pub struct CharacterStream<'a> {
    source: &'a str,
    offset: usize,
    row: usize,
    column: usize,
}

impl<'a> CharacterStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            row: 0,
            column: 0,
        }
    }

    /// Consumes one character. A newline moves to column 0 of the next row.
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Character offset from the cursor to the nearest match of `pattern`.
    pub fn test(&self, pattern: &Regex) -> Option<usize> {
        self.find(pattern)
            .map(|m| self.source[self.offset..m.start()].chars().count())
    }

    /// The nearest match of `pattern` at or after the cursor.
    pub fn find(&self, pattern: &Regex) -> Option<Match<'a>> {
        pattern.find_at(self.source, self.offset)
    }

    /// Like [`find`](Self::find), with capture groups.
    pub fn captures(&self, pattern: &Regex) -> Option<Captures<'a>> {
        pattern.captures_at(self.source, self.offset)
    }

    /// Consumes exactly `n` characters and returns them as one slice.
    pub fn skip(&mut self, n: usize) -> Result<&'a str, ScanError> {
        if self.remaining().chars().take(n).count() < n {
            return Err(ScanError::SkipPastEnd {
                requested: n,
                available: self.remaining().chars().count(),
                position: self.position(),
                context: self.context(),
            });
        }

        let start = self.offset;
        for _ in 0..n {
            self.read();
        }
        Ok(&self.source[start..self.offset])
    }

    /// Consumes the rest of the current row including its newline.
    pub fn skip_to_next_row(&mut self) -> &'a str {
        let start = self.offset;
        while let Some(c) = self.read() {
            if c == '\n' {
                break;
            }
        }
        &self.source[start..self.offset]
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }

    /// Byte offset of the cursor into the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// A short snippet of upcoming text for diagnostics.
    pub fn context(&self) -> String {
        self.remaining().chars().take(CONTEXT_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_tracks_rows_and_columns() {
        let mut chars = CharacterStream::new("ab\n c");
        for _ in 0..5 {
            assert!(chars.read().is_some());
        }
        assert!(chars.eof());
        assert_eq!(chars.position(), Position::new(1, 2));
        assert_eq!(chars.read(), None);
    }

    #[test]
    fn newline_resets_column() {
        let mut chars = CharacterStream::new("xyz\nq");
        chars.skip(4).unwrap();
        assert_eq!(chars.position(), Position::new(1, 0));
        assert_eq!(chars.peek(), Some('q'));
    }

    #[test]
    fn peek_does_not_consume() {
        let chars = CharacterStream::new("hi");
        assert_eq!(chars.peek(), Some('h'));
        assert_eq!(chars.peek(), Some('h'));
        assert_eq!(chars.position(), Position::new(0, 0));
    }

    #[test]
    fn empty_input_is_eof() {
        let mut chars = CharacterStream::new("");
        assert!(chars.eof());
        assert_eq!(chars.peek(), None);
        assert_eq!(chars.read(), None);
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let mut chars = CharacterStream::new("héllo");
        chars.skip(3).unwrap();
        assert_eq!(chars.position(), Position::new(0, 3));
        assert_eq!(chars.offset(), 4);
        assert_eq!(chars.remaining(), "lo");
    }

    #[test]
    fn test_returns_nearest_floating_match() {
        let chars = CharacterStream::new("abc**def");
        let bold = Regex::new(r"\*\*").unwrap();
        let missing = Regex::new("zzz").unwrap();
        assert_eq!(chars.test(&bold), Some(3));
        assert_eq!(chars.test(&missing), None);
    }

    #[test]
    fn row_anchors_see_text_before_the_cursor() {
        let header = Regex::new(r"(?m)^#").unwrap();
        let mut chars = CharacterStream::new("a# b\n# c");
        chars.skip(1).unwrap();
        // The `#` right at the cursor is mid-row, so the nearest header is on row 1.
        assert_eq!(chars.test(&header), Some(4));
    }

    #[test]
    fn captures_expose_groups() {
        let chars = CharacterStream::new("see [ref]: http://x");
        let reference = Regex::new(r"\[([^\]]+)\]:\s*(\S+)").unwrap();
        let caps = chars.captures(&reference).unwrap();
        assert_eq!(&caps[1], "ref");
        assert_eq!(&caps[2], "http://x");
    }

    #[test]
    fn skip_crosses_newlines() {
        let mut chars = CharacterStream::new("one\ntwo\nthree");
        assert_eq!(chars.skip(6).unwrap(), "one\ntw");
        assert_eq!(chars.position(), Position::new(1, 2));
    }

    #[test]
    fn skip_past_end_is_an_error() {
        let mut chars = CharacterStream::new("ab");
        let err = chars.skip(3).unwrap_err();
        assert_eq!(
            err,
            ScanError::SkipPastEnd {
                requested: 3,
                available: 2,
                position: Position::new(0, 0),
                context: "ab".to_string(),
            }
        );
        // Nothing was consumed.
        assert_eq!(chars.offset(), 0);
    }

    #[test]
    fn skip_to_next_row_consumes_newline() {
        let mut chars = CharacterStream::new("first row\nsecond");
        assert_eq!(chars.skip_to_next_row(), "first row\n");
        assert_eq!(chars.position(), Position::new(1, 0));
        assert_eq!(chars.skip_to_next_row(), "second");
        assert!(chars.eof());
    }
}
