//! Token kinds and the immutable [`Token`] the scanner emits.

use std::ops::Range;

use regex::Regex;
use serde::Serialize;

use crate::position::Position;

/// Every lexical unit the scanner can emit.
///
/// We use SCREAMING_CASE to match the names the grammar talks about
/// (`HEADER`, `LINK_START`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    // === Full-row kinds (only meaningful at row boundaries) ===
    /// `#` .. `######` followed by whitespace
    HEADER,
    /// `>` quote marker
    BLOCKQUOTE,
    /// `---`, `***` or `___`
    RULE,
    /// Bullet or numbered list marker with its indentation
    LIST,
    /// Code fence
    CODEBLOCK,
    /// `[TOC]`
    TOC,
    /// `[TOF]`
    TOF,
    /// `[PAGEBREAK]`
    PAGEBREAK,
    /// `[id]: url "alt"` definition
    REFERENCE,
    /// `$$` fence
    LATEXBLOCK,
    /// Line ending, zero-width for positions
    NEWLINE,

    // === Inline kinds ===
    /// `**` or `__`
    BOLD,
    /// `*` or `_`
    ITALICS,
    /// `~~`
    STRIKETHROUGH,
    /// `![`
    IMAGE_START,
    /// `[`
    LINK_START,
    /// `](url "alt")`, `][id]` or `][]`
    IMAGE_LINK_END,
    /// Single backtick
    CODE,
    /// Single `$`
    LATEX,

    /// Filler between matched tokens; never registered.
    TEXT,
}

impl TokenKind {
    pub fn is_full_row(self) -> bool {
        matches!(
            self,
            TokenKind::HEADER
                | TokenKind::BLOCKQUOTE
                | TokenKind::RULE
                | TokenKind::LIST
                | TokenKind::CODEBLOCK
                | TokenKind::TOC
                | TokenKind::TOF
                | TokenKind::PAGEBREAK
                | TokenKind::REFERENCE
                | TokenKind::LATEXBLOCK
                | TokenKind::NEWLINE
        )
    }

    pub fn is_inline(self) -> bool {
        !self.is_full_row() && self != TokenKind::TEXT
    }

    /// Kinds that may continue a paragraph row: inline markers and text.
    pub fn is_inline_or_text(self) -> bool {
        !self.is_full_row()
    }
}

/// One scanned token, borrowing its text from the source.
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The registry pattern that produced this token; `None` for TEXT.
    pub pattern: Option<&'a Regex>,
    /// The exact source text of the token.
    pub raw: &'a str,
    /// Capture groups 1..n of the match, `None` where a group did not take part.
    pub groups: Vec<Option<&'a str>>,
    pub from: Position,
    pub to: Position,
    /// Byte range of `raw` in the source.
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    /// Capture group `n` (1-based, like regex group numbering).
    pub fn group(&self, n: usize) -> Option<&'a str> {
        n.checked_sub(1)
            .and_then(|i| self.groups.get(i).copied().flatten())
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
