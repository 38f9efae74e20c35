//! # markdom-syntax
//!
//! The lexical layer of markdom: a positional character cursor and a
//! nearest-match tokenizer driven by an ordered registry of regex patterns.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → CharacterStream → TokenStream → Tokens
//!               (row/column)      (nearest match over TokenRegistry)
//! ```
//!
//! ### 1. CharacterStream ([`char_stream`] module)
//!
//! A cursor that consumes characters one at a time and keeps a zero-based
//! [`Position`] for each of them. Pattern lookups search forward from the
//! cursor without consuming anything.
//!
//! ### 2. TokenRegistry ([`registry`] module)
//!
//! The ordered `(kind, pattern)` table. Full-row kinds (headers, lists, code
//! fences, ...) are anchored to row starts; inline kinds (emphasis, links,
//! code spans, ...) float. Registration order breaks ties.
//!
//! ### 3. TokenStream ([`token_stream`] module)
//!
//! Emits the token whose match starts *nearest* to the cursor, with TEXT
//! filling the gaps in between:
//!
//! ```text
//! "see **this**" → [TEXT("see "), BOLD("**"), TEXT("this"), BOLD("**")]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use markdom_syntax::{TokenKind, TokenStream};
//!
//! let kinds: Vec<TokenKind> = TokenStream::new("# Hello\n")
//!     .map(|token| token.unwrap().kind)
//!     .collect();
//!
//! assert_eq!(kinds, [TokenKind::HEADER, TokenKind::TEXT, TokenKind::NEWLINE]);
//! ```
//!
//! Scanning never fails on markdown input. [`ScanError`] only reports broken
//! scanner contracts, such as a registry pattern that matches the empty string.

pub mod char_stream;
pub mod error;
pub mod position;
pub mod registry;
pub mod token;
pub mod token_stream;

pub use char_stream::CharacterStream;
pub use error::ScanError;
pub use position::Position;
pub use registry::{RegistryEntry, Scope, TokenRegistry};
pub use token::{Token, TokenKind};
pub use token_stream::TokenStream;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<(TokenKind, &str)> {
        TokenStream::new(source)
            .map(|t| {
                let t = t.unwrap();
                (t.kind, t.raw)
            })
            .collect()
    }

    #[test]
    fn scans_a_mixed_document() {
        let input = "## Notes\n> quoted *text*\n- [link](u)\n\n```rust\nfn x() {}\n```\n";
        assert_eq!(
            tokens(input),
            vec![
                (TokenKind::HEADER, "## "),
                (TokenKind::TEXT, "Notes"),
                (TokenKind::NEWLINE, "\n"),
                (TokenKind::BLOCKQUOTE, "> "),
                (TokenKind::TEXT, "quoted "),
                (TokenKind::ITALICS, "*"),
                (TokenKind::TEXT, "text"),
                (TokenKind::ITALICS, "*"),
                (TokenKind::NEWLINE, "\n"),
                (TokenKind::LIST, "- "),
                (TokenKind::LINK_START, "["),
                (TokenKind::TEXT, "link"),
                (TokenKind::IMAGE_LINK_END, "](u)"),
                (TokenKind::NEWLINE, "\n"),
                (TokenKind::NEWLINE, "\n"),
                (TokenKind::CODEBLOCK, "```"),
                (TokenKind::TEXT, "rust"),
                (TokenKind::NEWLINE, "\n"),
                (TokenKind::TEXT, "fn x() {}"),
                (TokenKind::NEWLINE, "\n"),
                (TokenKind::CODEBLOCK, "```"),
                (TokenKind::NEWLINE, "\n"),
            ]
        );
    }

    #[test]
    fn positions_never_decrease() {
        let input = "# a\n\n1. one\n   2. two **b** `c`\n$$\nx^2\n$$\n[TOF]\n";
        let mut last = Position::default();
        for token in TokenStream::new(input) {
            let token = token.unwrap();
            assert!(token.from >= last, "{:?} starts before {last}", token);
            assert!(token.to >= token.from);
            last = token.to;
        }
    }
}
