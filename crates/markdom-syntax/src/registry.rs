//! # TokenRegistry - Recognised Patterns
//!
//! An ordered list of `(kind, pattern)` pairs. Full-row entries come first,
//! then inline entries; the iteration order is the tie-break priority when two
//! patterns match at the same distance from the cursor.
//!
//! Full-row patterns are anchored with multi-line `^`, so they can only match
//! at the start of a row even though every pattern is searched forward from
//! the cursor.

use std::sync::OnceLock;

use regex::Regex;

use crate::token::TokenKind;

/// Block-level patterns, in priority order.
///
/// RULE precedes LIST so `- - -` is a break, and the bracketed markers precede
/// REFERENCE and the inline `[` so `[TOC]` is never a link.
const FULL_ROW: &[(TokenKind, &str)] = &[
    (TokenKind::HEADER, r"(?m)^(#{1,6})[ \t]+"),
    (TokenKind::BLOCKQUOTE, r"(?m)^>[ \t]?"),
    (
        TokenKind::RULE,
        r"(?m)^(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})\r?$",
    ),
    (
        TokenKind::LIST,
        r"(?m)^([ \t]*)(?:([-*+])|(\d{1,9})[.)])[ \t]+",
    ),
    (TokenKind::CODEBLOCK, r"(?m)^```[ \t]*"),
    (TokenKind::TOC, r"(?m)^\[TOC\][ \t]*\r?$"),
    (TokenKind::TOF, r"(?m)^\[TOF\][ \t]*\r?$"),
    (TokenKind::PAGEBREAK, r"(?m)^\[PAGEBREAK\][ \t]*\r?$"),
    (
        TokenKind::REFERENCE,
        r#"(?m)^\[([^\]]+)\]:[ \t]*(\S+)(?:[ \t]+"([^"]*)")?[ \t]*\r?$"#,
    ),
    (TokenKind::LATEXBLOCK, r"(?m)^\$\$[ \t]*\r?$"),
    (TokenKind::NEWLINE, r"\r?\n"),
];

/// Inline patterns, in priority order. BOLD precedes ITALICS so `**` is one token.
const INLINE: &[(TokenKind, &str)] = &[
    (TokenKind::BOLD, r"\*\*|__"),
    (TokenKind::ITALICS, r"\*|_"),
    (TokenKind::STRIKETHROUGH, r"~~"),
    (TokenKind::IMAGE_START, r"!\["),
    (TokenKind::LINK_START, r"\["),
    (
        TokenKind::IMAGE_LINK_END,
        r#"\]\(([^\s)]*)(?:[ \t]+"([^"]*)")?\)|\]\[([^\]]*)\]"#,
    ),
    (TokenKind::CODE, r"`"),
    (TokenKind::LATEX, r"\$"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    FullRow,
    Inline,
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub kind: TokenKind,
    pub pattern: Regex,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub struct TokenRegistry {
    entries: Vec<RegistryEntry>,
}

impl TokenRegistry {
    /// Build a registry from full-row and inline pattern tables.
    pub fn new(
        full_row: &[(TokenKind, &str)],
        inline: &[(TokenKind, &str)],
    ) -> Result<Self, regex::Error> {
        let mut entries = Vec::with_capacity(full_row.len() + inline.len());
        for (scope, table) in [(Scope::FullRow, full_row), (Scope::Inline, inline)] {
            for &(kind, pattern) in table {
                entries.push(RegistryEntry {
                    kind,
                    pattern: Regex::new(pattern)?,
                    scope,
                });
            }
        }
        Ok(Self { entries })
    }

    /// The markdown registry, compiled once and shared.
    pub fn markdown() -> &'static TokenRegistry {
        static REGISTRY: OnceLock<TokenRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            TokenRegistry::new(FULL_ROW, INLINE).expect("Invalid markdown token pattern")
        })
    }

    /// All entries in priority order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn full_row(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter().filter(|e| e.scope == Scope::FullRow)
    }

    pub fn inline(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter().filter(|e| e.scope == Scope::Inline)
    }

    /// The first entry registered for `kind`.
    pub fn get(&self, kind: TokenKind) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn matches_at_start(kind: TokenKind, text: &str) -> bool {
        let entry = TokenRegistry::markdown().get(kind).unwrap();
        entry.pattern.find(text).is_some_and(|m| m.start() == 0)
    }

    #[rstest]
    #[case("# Header", true)]
    #[case("######  Header", true)]
    #[case("####### Header", false)]
    #[case("#Header", false)]
    #[case(" # Header", false)]
    fn header_pattern(#[case] text: &str, #[case] expected: bool) {
        let header = &TokenRegistry::markdown().get(TokenKind::HEADER).unwrap().pattern;
        assert_eq!(header.is_match(text), expected, "{text:?}");
    }

    #[rstest]
    #[case("---", true)]
    #[case("* * *", true)]
    #[case("___", true)]
    #[case("--", false)]
    #[case("--- x", false)]
    fn rule_pattern(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(matches_at_start(TokenKind::RULE, text), expected, "{text:?}");
    }

    #[rstest]
    #[case("- item", true)]
    #[case("  * nested", true)]
    #[case("12. twelve", true)]
    #[case("3) three", true)]
    #[case("-item", false)]
    #[case("1.first", false)]
    fn list_pattern(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(matches_at_start(TokenKind::LIST, text), expected, "{text:?}");
    }

    #[test]
    fn reference_groups() {
        let reference = &TokenRegistry::markdown()
            .get(TokenKind::REFERENCE)
            .unwrap()
            .pattern;
        let caps = reference
            .captures(r#"[duck]: https://duckduckgo.com/ "Duck Duck Go""#)
            .unwrap();
        assert_eq!(&caps[1], "duck");
        assert_eq!(&caps[2], "https://duckduckgo.com/");
        assert_eq!(&caps[3], "Duck Duck Go");

        let caps = reference.captures("[bare]: ./x.png").unwrap();
        assert!(caps.get(3).is_none());
    }

    #[test]
    fn link_end_forms() {
        let end = &TokenRegistry::markdown()
            .get(TokenKind::IMAGE_LINK_END)
            .unwrap()
            .pattern;

        let inline = end.captures(r#"](./img.png "Caption")"#).unwrap();
        assert_eq!(&inline[1], "./img.png");
        assert_eq!(&inline[2], "Caption");

        let reference = end.captures("][duck]").unwrap();
        assert!(reference.get(1).is_none());
        assert_eq!(&reference[3], "duck");

        let collapsed = end.captures("][]").unwrap();
        assert_eq!(&collapsed[3], "");
    }

    #[test]
    fn full_row_entries_come_first() {
        let registry = TokenRegistry::markdown();
        let first_inline = registry
            .entries()
            .iter()
            .position(|e| e.scope == Scope::Inline)
            .unwrap();
        assert!(registry.entries()[..first_inline]
            .iter()
            .all(|e| e.kind.is_full_row()));
        assert_eq!(registry.full_row().count() + registry.inline().count(), registry.len());
        assert!(registry.get(TokenKind::TEXT).is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let result = TokenRegistry::new(&[(TokenKind::HEADER, "(")], &[]);
        assert!(result.is_err());
    }
}
