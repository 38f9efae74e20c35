//! # Block-Level Grammar
//!
//! Blocks are introduced by full-row tokens and otherwise fall back to a
//! paragraph. Each production leaves the parser at the NEWLINE ending its
//! last row, or past any blank rows it had to look across.
//!
//! ## Lists
//!
//! A list collects items whose markers share its indentation width and kind
//! (numeral vs bullet). Blank rows between items do not end it. A marker
//! indented deeper than the current item opens a nested list inside that
//! item, after a SoftBreak:
//!
//! ```text
//! - one            BulletList(0)
//!   - two            ListItem [one, SoftBreak, BulletList(2) [ListItem [two]]]
//! - three            ListItem [three]
//! ```
//!
//! ## Fenced Blocks
//!
//! Code and LaTeX blocks capture the source between their fences verbatim.
//! An opener that never meets its closer becomes a paragraph holding the
//! literal text consumed, fence included.

use markdom_syntax::{Position, Token, TokenKind};

use super::inline;
use crate::dom::{NodeId, NodeKind};
use crate::error::ParseError;
use crate::parser::Parser;

const TAB_WIDTH: usize = 4;

pub(super) fn block(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(kind) = p.peek_kind()? else {
        return Ok(());
    };
    match kind {
        TokenKind::HEADER => header(p, parent),
        TokenKind::BLOCKQUOTE => block_quote(p, parent),
        TokenKind::RULE => single(p, parent, NodeKind::ThematicBreak).map(drop),
        TokenKind::LIST => list(p, parent),
        TokenKind::CODEBLOCK => code_block(p, parent),
        TokenKind::LATEXBLOCK => latex_block(p, parent),
        TokenKind::TOC if p.doc.toc.is_none() => {
            let toc = single(p, parent, NodeKind::Toc)?;
            p.doc.toc = toc;
            Ok(())
        }
        TokenKind::TOF if p.doc.tof.is_none() => {
            let tof = single(p, parent, NodeKind::Tof)?;
            p.doc.tof = tof;
            Ok(())
        }
        TokenKind::TOC | TokenKind::TOF => {
            log::debug!("another {kind:?} marker, kept as a paragraph");
            paragraph(p, parent)
        }
        TokenKind::PAGEBREAK => single(p, parent, NodeKind::PageBreak).map(drop),
        TokenKind::REFERENCE => reference(p, parent),
        _ => paragraph(p, parent),
    }
}

/// A block made of exactly one marker token.
fn single(
    p: &mut Parser<'_>,
    parent: NodeId,
    kind: NodeKind,
) -> Result<Option<NodeId>, ParseError> {
    Ok(p.bump()?
        .map(|token| p.doc.push(kind, parent, token.from, token.to)))
}

fn header(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    let level = open.group(1).map_or(1, str::len);
    let id = format!("Header {}", p.doc.headers.len() + 1);

    let node = p.doc.push(NodeKind::Header { level, id }, parent, open.from, open.to);
    p.doc.headers.push(node);
    inline::row(p, node)?;
    p.doc.finish(node, open.to);
    Ok(())
}

fn block_quote(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    let node = p.doc.push(NodeKind::BlockQuote, parent, open.from, open.to);

    loop {
        inline::row(p, node)?;
        let Some(newline) = eat_newline(p)? else {
            break;
        };
        if !p.at(TokenKind::BLOCKQUOTE)? {
            break;
        }
        p.bump()?;
        p.doc.push(NodeKind::SoftBreak, node, newline.from, newline.to);
    }

    p.doc.finish(node, open.to);
    Ok(())
}

fn reference(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(token) = p.bump()? else {
        return Ok(());
    };
    let kind = NodeKind::Reference {
        reference_id: token.group(1).unwrap_or_default().to_string(),
        url: token.group(2).unwrap_or_default().to_string(),
        alt: token.group(3).unwrap_or_default().to_string(),
    };
    let node = p.doc.push(kind, parent, token.from, token.to);
    p.doc.references.push(node);
    Ok(())
}

/// Rows of inline content joined by SoftBreak, for as long as the next row
/// starts with an inline or TEXT token.
fn paragraph(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let from = match p.peek()? {
        Some(token) => token.from,
        None => return Ok(()),
    };
    let node = p.doc.push(NodeKind::Paragraph, parent, from, from);

    loop {
        inline::row(p, node)?;
        let Some(newline) = eat_newline(p)? else {
            break;
        };
        if !p.peek_kind()?.is_some_and(TokenKind::is_inline_or_text) {
            break;
        }
        p.doc.push(NodeKind::SoftBreak, node, newline.from, newline.to);
    }

    p.doc.finish(node, from);
    Ok(())
}

fn eat_newline<'a>(p: &mut Parser<'a>) -> Result<Option<Token<'a>>, ParseError> {
    if p.at(TokenKind::NEWLINE)? {
        p.bump()
    } else {
        Ok(None)
    }
}

// === Lists ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListMarker {
    from: Position,
    level: usize,
    /// The numeral of an ordered marker.
    start: Option<u64>,
    bullet: char,
}

impl ListMarker {
    fn of(token: &Token<'_>) -> Self {
        Self {
            from: token.from,
            level: indent_width(token.group(1).unwrap_or_default()),
            start: token.group(3).map(|n| n.parse().unwrap_or(1)),
            bullet: token
                .group(2)
                .and_then(|b| b.chars().next())
                .unwrap_or('-'),
        }
    }

    fn ordered(&self) -> bool {
        self.start.is_some()
    }

    fn continues(&self, other: &ListMarker) -> bool {
        self.level == other.level && self.ordered() == other.ordered()
    }
}

fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn peek_marker(p: &mut Parser<'_>) -> Result<Option<ListMarker>, ParseError> {
    Ok(p.peek()?
        .filter(|token| token.is(TokenKind::LIST))
        .map(ListMarker::of))
}

fn list(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(marker) = peek_marker(p)? else {
        return Ok(());
    };

    p.nested(|p| {
        let kind = match marker.start {
            Some(start) => NodeKind::OrderedList {
                level: marker.level,
                start,
            },
            None => NodeKind::BulletList {
                level: marker.level,
                marker: marker.bullet,
            },
        };
        let node = p.doc.push(kind, parent, marker.from, marker.from);

        loop {
            list_item(p, node, marker.level)?;
            match peek_marker(p)? {
                Some(next) if next.continues(&marker) => continue,
                _ => break,
            }
        }

        p.doc.finish(node, marker.from);
        Ok(())
    })
}

fn list_item(p: &mut Parser<'_>, list: NodeId, level: usize) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    let item = p.doc.push(NodeKind::ListItem, list, open.from, open.to);
    inline::row(p, item)?;

    loop {
        let newline = p.skip_newlines()?;
        match peek_marker(p)? {
            Some(next) if next.level > level => {
                let at = newline.map_or(next.from, |n| n.from);
                p.doc.push(NodeKind::SoftBreak, item, at, at);
                self::list(p, item)?;
            }
            _ => break,
        }
    }

    p.doc.finish(item, open.to);
    Ok(())
}

// === Fenced blocks ===

struct Fence<'a> {
    info: String,
    body: &'a str,
    close: Token<'a>,
}

/// Consumes an opening fence, its row, and everything up to the closing
/// fence of the same kind. Returns `None` when the source ends first.
fn fence<'a>(p: &mut Parser<'a>, open: &Token<'a>) -> Result<Option<Fence<'a>>, ParseError> {
    let mut info = String::new();
    while !p.at_row_end()? {
        if let Some(token) = p.bump()? {
            info.push_str(token.raw);
        }
    }

    let Some(newline) = p.bump()? else {
        return Ok(None);
    };
    let body_start = newline.span.end;

    let close = loop {
        match p.bump()? {
            None => return Ok(None),
            Some(token) if token.kind == open.kind => break token,
            Some(_) => {}
        }
    };

    // Whatever follows the closing fence on its row is dropped.
    while !p.at_row_end()? {
        p.bump()?;
    }

    Ok(Some(Fence {
        info: info.trim().to_string(),
        body: &p.source()[body_start..close.span.start],
        close,
    }))
}

fn code_block(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    match fence(p, &open)? {
        Some(fence) => {
            let kind = NodeKind::CodeBlock {
                language: fence.info,
                literal: trim_blank_lines(fence.body),
            };
            p.doc.push(kind, parent, open.from, fence.close.to);
        }
        None => unterminated(p, parent, &open),
    }
    Ok(())
}

fn latex_block(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    match fence(p, &open)? {
        Some(fence) => {
            let literal = trim_blank_lines(fence.body);
            let rendered = p.doc.latex.render(&literal);
            let kind = NodeKind::LatexBlock { literal, rendered };
            p.doc.push(kind, parent, open.from, fence.close.to);
        }
        None => unterminated(p, parent, &open),
    }
    Ok(())
}

/// An unclosed fence: a paragraph holding the literal source from the opener on.
fn unterminated(p: &mut Parser<'_>, parent: NodeId, open: &Token<'_>) {
    log::debug!("unterminated {:?} at {} kept as a paragraph", open.kind, open.from);
    let value = p.consumed_since(open).to_string();
    let node = p.doc.push(NodeKind::Paragraph, parent, open.from, open.to);
    p.doc.push(NodeKind::Text { value }, node, open.from, p.last_to);
    p.doc.finish(node, open.to);
}

/// Drops blank lines at both ends of a fenced body.
fn trim_blank_lines(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let Some(first) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(first);
    lines[first..=last].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("  ", 2)]
    #[case("\t", 4)]
    #[case(" \t", 5)]
    fn indent_widths(#[case] indent: &str, #[case] expected: usize) {
        assert_eq!(indent_width(indent), expected);
    }

    #[rstest]
    #[case("\n\nx\n\n", "x")]
    #[case("  \na\n\n b\n \n", "a\n\n b")]
    #[case("\n \n", "")]
    #[case("a\r\nb\r\n", "a\nb")]
    fn trims_blank_lines_at_both_ends(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(trim_blank_lines(body), expected);
    }
}
