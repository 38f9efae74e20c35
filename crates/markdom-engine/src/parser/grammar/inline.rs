//! # Inline-Level Grammar
//!
//! Inline content never crosses a row. Every construct with a closing token
//! must find it before the row's NEWLINE (or the end of the source), or the
//! opener and everything after it become literal text.
//!
//! ## Dispatch Logic
//!
//! | Token | Element |
//! |-------|---------|
//! | BOLD, ITALICS, STRIKETHROUGH | emphasis with nested inline content |
//! | CODE, LATEX | literal span up to the same token |
//! | LINK_START, IMAGE_START | link or image up to IMAGE_LINK_END |
//! | TEXT and anything else | Text |
//!
//! ## Delimiter Runs
//!
//! The scanner emits `***` as BOLD followed by ITALICS, which does not always
//! match how the run is used:
//!
//! - Inside italics, a `**` right after a non-whitespace character is split:
//!   its first `*` closes the italics and the second is read again.
//!   `*a **b***` and `**Hi *there***` both close this way.
//! - Inside bold, a `*` directly followed by another `*` closes the bold as if
//!   it were `**`. A lone `*` opens nested italics instead.
//!
//! ## Link Forms
//!
//! The groups of IMAGE_LINK_END select the form:
//!
//! - `](url "alt")`: inline target
//! - `][id]`: reference, resolved after parsing
//! - `][]`: collapsed reference, the visible text is the reference id

use markdom_syntax::{Token, TokenKind};

use crate::dom::{LinkForm, NodeId, NodeKind};
use crate::error::ParseError;
use crate::parser::Parser;

/// Parses inline elements until the end of the row.
pub(super) fn row(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    while !p.at_row_end()? {
        element(p, parent)?;
    }
    Ok(())
}

fn element(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(kind) = p.peek_kind()? else {
        return Ok(());
    };
    match kind {
        TokenKind::BOLD | TokenKind::ITALICS | TokenKind::STRIKETHROUGH => {
            p.nested(|p| emphasis(p, parent))
        }
        TokenKind::CODE | TokenKind::LATEX => literal_span(p, parent),
        TokenKind::LINK_START | TokenKind::IMAGE_START => p.nested(|p| link(p, parent)),
        _ => text(p, parent),
    }
}

/// TEXT, or a token with no meaning at this point, kept as it was written.
fn text(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    if let Some(token) = p.bump()? {
        let value = token.raw.to_string();
        p.doc
            .push(NodeKind::Text { value }, parent, token.from, token.to);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    /// The token closes the construct.
    Exact,
    /// The token's first character closes the construct.
    Split,
    /// The token closes the construct if the same delimiter follows it directly.
    Pair,
    /// The token is inline content.
    Inner,
}

fn closing(open: &Token<'_>, kind: TokenKind, raw: &str, previous: Option<char>) -> Closing {
    let same_char = raw.chars().next() == open.raw.chars().next();
    match (open.kind, kind) {
        (TokenKind::STRIKETHROUGH, TokenKind::STRIKETHROUGH) => Closing::Exact,
        (TokenKind::BOLD, TokenKind::BOLD) | (TokenKind::ITALICS, TokenKind::ITALICS)
            if raw == open.raw =>
        {
            Closing::Exact
        }
        (TokenKind::BOLD, TokenKind::ITALICS) if same_char => Closing::Pair,
        (TokenKind::ITALICS, TokenKind::BOLD)
            if same_char && previous.is_some_and(|c| !c.is_whitespace()) =>
        {
            Closing::Split
        }
        _ => Closing::Inner,
    }
}

fn emphasis(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    let marker = open.raw.chars().next().unwrap_or('*');
    let kind = match open.kind {
        TokenKind::BOLD => NodeKind::Bold { marker },
        TokenKind::ITALICS => NodeKind::Italics { marker },
        _ => NodeKind::Strikethrough,
    };
    let checkpoint = p.doc.checkpoint(parent);
    let node = p.doc.push(kind, parent, open.from, open.to);

    loop {
        let next = p.peek()?.map(|token| (token.kind, token.raw));
        let Some((kind, raw)) = next.filter(|(kind, _)| *kind != TokenKind::NEWLINE) else {
            return p.degrade(checkpoint, &open);
        };

        match closing(&open, kind, raw, p.last_char) {
            Closing::Exact => {
                let close = p.bump()?;
                p.doc.finish(node, close.map_or(open.to, |token| token.to));
                return Ok(());
            }
            Closing::Split => {
                let closed_at = p.split_delimiter()?;
                p.doc.finish(node, closed_at);
                return Ok(());
            }
            Closing::Pair => match p.pair_delimiter()? {
                Some(closed_at) => {
                    p.doc.finish(node, closed_at);
                    return Ok(());
                }
                None => element(p, node)?,
            },
            Closing::Inner => element(p, node)?,
        }
    }
}

/// Inline code or inline LaTeX: the source between two equal tokens, taken
/// literally.
fn literal_span(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    let checkpoint = p.doc.checkpoint(parent);

    loop {
        match p.peek_kind()? {
            None | Some(TokenKind::NEWLINE) => return p.degrade(checkpoint, &open),
            Some(kind) if kind == open.kind => break,
            Some(_) => {
                p.bump()?;
            }
        }
    }

    let Some(close) = p.bump()? else {
        return p.degrade(checkpoint, &open);
    };
    let value = p.source()[open.span.end..close.span.start].to_string();
    let kind = if open.is(TokenKind::CODE) {
        NodeKind::InlineCode { value }
    } else {
        let rendered = p.doc.latex.render(&value);
        NodeKind::InlineLatex { value, rendered }
    };
    p.doc.push(kind, parent, open.from, close.to);
    Ok(())
}

fn link(p: &mut Parser<'_>, parent: NodeId) -> Result<(), ParseError> {
    let Some(open) = p.bump()? else {
        return Ok(());
    };
    let image = open.is(TokenKind::IMAGE_START);
    let checkpoint = p.doc.checkpoint(parent);
    let node = p.doc.push(
        NodeKind::Link {
            url: String::new(),
            alt: String::new(),
            reference_id: None,
            form: LinkForm::Inline,
        },
        parent,
        open.from,
        open.to,
    );

    // Figures are numbered in order of their openers.
    let figure = if image {
        p.doc.images.push(node);
        Some(format!("Figure {}", p.doc.images.len()))
    } else {
        None
    };

    let close = loop {
        match p.peek_kind()? {
            None | Some(TokenKind::NEWLINE) => return p.degrade(checkpoint, &open),
            Some(TokenKind::IMAGE_LINK_END) => match p.bump()? {
                Some(close) => break close,
                None => return p.degrade(checkpoint, &open),
            },
            Some(_) => element(p, node)?,
        }
    };

    let (form, url, alt, reference_id) = match (close.group(1), close.group(3)) {
        (Some(url), _) => (
            LinkForm::Inline,
            url.to_string(),
            close.group(2).unwrap_or_default().to_string(),
            None,
        ),
        (None, Some(id)) if !id.is_empty() => (
            LinkForm::Reference,
            String::new(),
            String::new(),
            Some(id.to_string()),
        ),
        (None, _) => (
            LinkForm::Collapsed,
            String::new(),
            String::new(),
            Some(p.doc.node(node).to_string()),
        ),
    };

    let kind = match figure {
        Some(id) => NodeKind::Image {
            url,
            alt,
            reference_id,
            form,
            id,
        },
        None => {
            if reference_id.is_some() {
                p.doc.links.push(node);
            }
            NodeKind::Link {
                url,
                alt,
                reference_id,
                form,
            }
        }
    };
    p.doc.set_kind(node, kind);
    p.doc.finish(node, close.to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdom_syntax::{Position, TokenStream};
    use rstest::rstest;

    #[rstest]
    #[case("*", TokenKind::ITALICS, "*", None, Closing::Exact)]
    #[case("*", TokenKind::ITALICS, "_", None, Closing::Inner)]
    #[case("*", TokenKind::BOLD, "**", Some('a'), Closing::Split)]
    #[case("*", TokenKind::BOLD, "**", Some(' '), Closing::Inner)]
    #[case("*", TokenKind::BOLD, "__", Some('a'), Closing::Inner)]
    #[case("a**", TokenKind::BOLD, "**", None, Closing::Exact)]
    #[case("a**", TokenKind::ITALICS, "*", None, Closing::Pair)]
    #[case("a__", TokenKind::ITALICS, "*", None, Closing::Inner)]
    #[case("~~", TokenKind::STRIKETHROUGH, "~~", None, Closing::Exact)]
    #[case("~~", TokenKind::BOLD, "**", None, Closing::Inner)]
    fn closing_rules(
        #[case] opener: &str,
        #[case] kind: TokenKind,
        #[case] raw: &str,
        #[case] previous: Option<char>,
        #[case] expected: Closing,
    ) {
        // "**" and "__" follow text so they do not scan as a rule.
        let mut stream = TokenStream::new(opener);
        let mut open = stream.read().unwrap().unwrap();
        if open.is(TokenKind::TEXT) {
            open = stream.read().unwrap().unwrap();
        }
        assert_eq!(closing(&open, kind, raw, previous), expected);
    }

    #[test]
    fn literal_span_keeps_markup() {
        let mut p = Parser::new("`**not bold**`");
        row(&mut p, NodeId::ROOT).unwrap();
        let code = p.doc.root().first_child().unwrap();
        assert_eq!(
            code.kind(),
            &NodeKind::InlineCode {
                value: "**not bold**".to_string()
            }
        );
        assert_eq!(code.to(), Position::new(0, 14));
    }

    #[test]
    fn unclosed_link_rolls_back_its_figure() {
        let mut p = Parser::new("![a ![b](x) c");
        row(&mut p, NodeId::ROOT).unwrap();
        assert!(p.doc.images.is_empty());
        let only = p.doc.root().first_child().unwrap();
        assert_eq!(p.doc.root().child_count(), 1);
        assert_eq!(
            only.kind(),
            &NodeKind::Text {
                value: "![a ![b](x) c".to_string()
            }
        );
    }
}
