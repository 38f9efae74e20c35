//! # Grammar Rules
//!
//! One function per construct, each starting at the token that introduces it
//! and consuming at least that token.
//!
//! ## Block Dispatch
//!
//! | Token | Block |
//! |-------|-------|
//! | HEADER | Header |
//! | BLOCKQUOTE | BlockQuote |
//! | RULE | ThematicBreak |
//! | LIST | OrderedList / BulletList |
//! | CODEBLOCK | CodeBlock |
//! | LATEXBLOCK | LatexBlock |
//! | TOC / TOF | Toc / Tof, or a Paragraph once one exists |
//! | PAGEBREAK | PageBreak |
//! | REFERENCE | Reference |
//! | (other) | Paragraph |
//!
//! Inline rules are described in [`inline`].

mod block;
mod inline;

use markdom_syntax::TokenKind;

use crate::dom::NodeId;
use crate::error::ParseError;
use crate::parser::Parser;

/// Parses blocks until the source is exhausted. Blank rows are skipped.
pub(super) fn document(p: &mut Parser<'_>) -> Result<(), ParseError> {
    while let Some(kind) = p.peek_kind()? {
        if kind == TokenKind::NEWLINE {
            p.bump()?;
        } else {
            block::block(p, NodeId::ROOT)?;
        }
    }
    Ok(())
}
