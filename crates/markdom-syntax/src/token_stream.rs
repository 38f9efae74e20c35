//! # TokenStream - Nearest-Match Scanning
//!
//! Unlike a maximal-munch lexer, which asks "which pattern matches *here*?",
//! this scanner asks "which pattern matches *nearest* to here?". At every step
//! it searches forward with every registered pattern and picks the match that
//! starts closest to the cursor. Ties go to the pattern registered first.
//!
//! ```text
//! cursor
//!   |
//!   v
//!   Hi *there*
//!      ^ ITALICS is nearest (offset 3)
//!
//! emit TEXT("Hi ")      <- the gap before the match
//! buffer ITALICS("*")   <- returned by the next call
//! ```
//!
//! The located token is held in an explicit one-token buffer until the text
//! in front of it has been emitted. When no pattern matches anywhere in the
//! remainder, the whole remainder becomes a single TEXT token.
//!
//! NEWLINE tokens are zero-width for positions: their `to` equals `from`.

use crate::char_stream::CharacterStream;
use crate::error::ScanError;
use crate::position::Position;
use crate::registry::TokenRegistry;
use crate::token::{Token, TokenKind};

/// Where a pattern was last found, as a byte offset into the source.
///
/// A cached match stays valid while it is still at or ahead of the cursor:
/// leftmost-first search from any earlier point would find the same match.
#[derive(Debug, Clone, Copy)]
enum Nearest {
    Unknown,
    At(usize),
    Nowhere,
}

pub struct TokenStream<'a> {
    chars: CharacterStream<'a>,
    registry: &'a TokenRegistry,
    nearest: Vec<Nearest>,
    /// A real token located behind an emitted TEXT gap.
    pending: Option<Token<'a>>,
    /// The token handed out by `peek()`.
    peeked: Option<Token<'a>>,
}

impl<'a> TokenStream<'a> {
    /// Scan `source` with the markdown registry.
    pub fn new(source: &'a str) -> Self {
        Self::with_registry(source, TokenRegistry::markdown())
    }

    pub fn with_registry(source: &'a str, registry: &'a TokenRegistry) -> Self {
        Self {
            chars: CharacterStream::new(source),
            registry,
            nearest: vec![Nearest::Unknown; registry.len()],
            pending: None,
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Result<Option<&Token<'a>>, ScanError> {
        if self.peeked.is_none() {
            self.peeked = self.scan()?;
        }
        Ok(self.peeked.as_ref())
    }

    pub fn read(&mut self) -> Result<Option<Token<'a>>, ScanError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.scan(),
        }
    }

    pub fn eof(&self) -> bool {
        self.peeked.is_none() && self.pending.is_none() && self.chars.eof()
    }

    /// Reads tokens up to and including the next NEWLINE, or to the end.
    pub fn skip_to_next_row(&mut self) -> Result<Vec<Token<'a>>, ScanError> {
        let mut row = Vec::new();
        while let Some(token) = self.read()? {
            let newline = token.is(TokenKind::NEWLINE);
            row.push(token);
            if newline {
                break;
            }
        }
        Ok(row)
    }

    /// Position of the scanner, past any buffered tokens.
    pub fn position(&self) -> Position {
        self.chars.position()
    }

    pub fn source(&self) -> &'a str {
        self.chars.source()
    }

    /// Diagnostic snippet of the text just past the scanner.
    pub fn context(&self) -> String {
        self.chars.context()
    }

    fn scan(&mut self) -> Result<Option<Token<'a>>, ScanError> {
        if let Some(token) = self.pending.take() {
            return Ok(Some(token));
        }
        if self.chars.eof() {
            return Ok(None);
        }

        let here = self.chars.offset();
        let Some((index, start)) = self.locate(here) else {
            let rest = self.chars.remaining().chars().count();
            return self.text(rest).map(Some);
        };

        if start == here {
            return self.matched(index).map(Some);
        }

        let gap = self.chars.source()[here..start].chars().count();
        let text = self.text(gap)?;
        self.pending = Some(self.matched(index)?);
        Ok(Some(text))
    }

    /// The registry entry whose match starts nearest to `here`.
    fn locate(&mut self, here: usize) -> Option<(usize, usize)> {
        let registry = self.registry;
        let mut best: Option<(usize, usize)> = None;

        for (index, entry) in registry.entries().iter().enumerate() {
            let start = match self.nearest[index] {
                Nearest::At(start) if start >= here => Some(start),
                Nearest::Nowhere => None,
                _ => {
                    let found = self.chars.find(&entry.pattern).map(|m| m.start());
                    self.nearest[index] = found.map_or(Nearest::Nowhere, Nearest::At);
                    found
                }
            };

            if let Some(start) = start
                && best.is_none_or(|(_, nearest)| start < nearest)
            {
                best = Some((index, start));
            }
        }

        best
    }

    fn text(&mut self, n: usize) -> Result<Token<'a>, ScanError> {
        let from = self.chars.position();
        let start = self.chars.offset();
        let raw = self.chars.skip(n)?;
        Ok(Token {
            kind: TokenKind::TEXT,
            pattern: None,
            raw,
            groups: Vec::new(),
            from,
            to: self.chars.position(),
            span: start..self.chars.offset(),
        })
    }

    /// Consume the match of entry `index`, which must start at the cursor.
    fn matched(&mut self, index: usize) -> Result<Token<'a>, ScanError> {
        let registry = self.registry;
        let entry = &registry.entries()[index];
        let from = self.chars.position();
        let start = self.chars.offset();

        let caps = self
            .chars
            .captures(&entry.pattern)
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == start))
            .ok_or(ScanError::LostMatch {
                kind: entry.kind,
                position: from,
            })?;
        let raw = caps.get(0).map_or("", |m| m.as_str());
        if raw.is_empty() {
            return Err(ScanError::EmptyMatch {
                kind: entry.kind,
                position: from,
                context: self.chars.context(),
            });
        }
        let groups = caps.iter().skip(1).map(|g| g.map(|m| m.as_str())).collect();

        self.chars.skip(raw.chars().count())?;
        let to = if entry.kind == TokenKind::NEWLINE {
            from
        } else {
            self.chars.position()
        };

        let token = Token {
            kind: entry.kind,
            pattern: Some(&entry.pattern),
            raw,
            groups,
            from,
            to,
            span: start..self.chars.offset(),
        };
        log::trace!("{:?} {:?} at {}", token.kind, token.raw, token.from);
        Ok(token)
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}
