//! # Parser - Recursive Descent over Nearest-Match Tokens
//!
//! The parser pulls tokens from a [`TokenStream`] and builds the [`Document`]
//! arena directly; no intermediate event list or syntax tree is kept.
//!
//! ## Lookahead
//!
//! Grammar functions see one token ahead through [`Parser::peek`]. Emphasis
//! needs a little more when a delimiter run like `***` has to be split or
//! merged, so the parser keeps a pushback stack in front of the stream. A
//! pushed-back token is returned by the next `peek`/`bump` before anything
//! the stream holds.
//!
//! ## Degrading to Text
//!
//! Every construct that needs a closing token takes a [`Checkpoint`] after
//! consuming its opener. When the row or the source ends first, the parser
//! returns to the checkpoint and emits one Text node holding the exact source
//! consumed since the opener:
//!
//! ```text
//! "a **b *c"   →   Text("a "), Text("**b *c")
//! ```
//!
//! ## Depth
//!
//! Lists and inline constructs recurse. [`Parser::nested`] counts the depth and
//! aborts with [`ParseError::DepthLimit`] past [`ParseOptions::max_depth`].

mod grammar;

use std::sync::Arc;

use markdom_syntax::{Position, Token, TokenKind, TokenRegistry, TokenStream};

use crate::dom::{Checkpoint, Document, NodeId, NodeKind};
use crate::error::ParseError;
use crate::latex::{EscapedSource, LatexRenderer};
use crate::options::ParseOptions;

/// Characters of upcoming source quoted in a depth-limit error.
const CONTEXT_CHARS: usize = 24;

pub struct Parser<'a> {
    tokens: TokenStream<'a>,
    pushed_back: Vec<Token<'a>>,
    doc: Document,
    depth: usize,
    max_depth: usize,
    /// Last character of the most recently consumed token.
    last_char: Option<char>,
    /// Byte end and end position of the last consumed token that is not a NEWLINE.
    last_end: usize,
    last_to: Position,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &'a str, options: ParseOptions) -> Self {
        let latex = LatexRenderer::with_capacity(EscapedSource, options.latex_cache_capacity);
        Self {
            tokens: TokenStream::new(source),
            pushed_back: Vec::new(),
            doc: Document::new(Arc::new(latex)),
            depth: 0,
            max_depth: options.max_depth,
            last_char: None,
            last_end: 0,
            last_to: Position::default(),
        }
    }

    /// Renders math through `latex` instead of a private renderer, so its
    /// cache is shared with every other document parsed the same way.
    pub fn with_latex(mut self, latex: Arc<LatexRenderer>) -> Self {
        self.doc.latex = latex;
        self
    }

    /// Parses the whole source and runs the resolution pass.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        grammar::document(&mut self)?;

        self.doc.end = self.tokens.position();
        self.doc.finish(NodeId::ROOT, Position::default());
        self.doc.resolve();
        Ok(self.doc)
    }

    // === Token access ===

    fn peek(&mut self) -> Result<Option<&Token<'a>>, ParseError> {
        if !self.pushed_back.is_empty() {
            return Ok(self.pushed_back.last());
        }
        Ok(self.tokens.peek()?)
    }

    fn peek_kind(&mut self) -> Result<Option<TokenKind>, ParseError> {
        Ok(self.peek()?.map(|token| token.kind))
    }

    fn at(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.peek_kind()? == Some(kind))
    }

    /// True at a NEWLINE or at the end of the source.
    fn at_row_end(&mut self) -> Result<bool, ParseError> {
        Ok(self.peek_kind()?.is_none_or(|kind| kind == TokenKind::NEWLINE))
    }

    fn bump(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        let token = match self.pushed_back.pop() {
            Some(token) => Some(token),
            None => self.tokens.read()?,
        };
        if let Some(token) = &token {
            self.last_char = token.raw.chars().next_back();
            if !token.is(TokenKind::NEWLINE) {
                self.last_end = token.span.end;
                self.last_to = token.to;
            }
        }
        Ok(token)
    }

    /// Consumes blank rows, returning the first NEWLINE consumed.
    fn skip_newlines(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        let mut first = None;
        while self.at(TokenKind::NEWLINE)? {
            let newline = self.bump()?;
            first = first.or(newline);
        }
        Ok(first)
    }

    fn source(&self) -> &'a str {
        self.tokens.source()
    }

    /// Exact source text from the start of `open` to the last consumed token.
    fn consumed_since(&self, open: &Token<'_>) -> &'a str {
        let start = open.span.start.min(self.last_end);
        &self.source()[start..self.last_end]
    }

    // === Delimiter runs ===

    /// Consumes a two-character emphasis token whose first character closes
    /// the current construct. The second character goes back as a
    /// one-character ITALICS token. Returns the end of the first character.
    fn split_delimiter(&mut self) -> Result<Position, ParseError> {
        let Some(run) = self.bump()? else {
            return Ok(self.last_to);
        };
        let half = run.raw.chars().next().map_or(0, char::len_utf8);
        let closed_at = Position::new(run.from.row, run.from.column + 1);

        self.pushed_back.push(Token {
            kind: TokenKind::ITALICS,
            pattern: TokenRegistry::markdown()
                .get(TokenKind::ITALICS)
                .map(|entry| &entry.pattern),
            raw: &run.raw[half..],
            groups: Vec::new(),
            from: closed_at,
            to: run.to,
            span: run.span.start + half..run.span.end,
        });
        self.last_char = run.raw.chars().next();
        self.last_end = run.span.start + half;
        self.last_to = closed_at;
        Ok(closed_at)
    }

    /// Consumes a one-character delimiter and, when the next token is the
    /// same delimiter directly after it, that one too. Returns the end of the
    /// pair, or puts the first delimiter back and returns `None`.
    fn pair_delimiter(&mut self) -> Result<Option<Position>, ParseError> {
        let Some(first) = self.bump()? else {
            return Ok(None);
        };
        let paired = self.peek()?.is_some_and(|next| {
            next.kind == first.kind && next.raw == first.raw && next.span.start == first.span.end
        });
        if paired {
            let second = self.bump()?;
            return Ok(second.map(|token| token.to));
        }
        self.pushed_back.push(first);
        Ok(None)
    }

    // === Structure ===

    /// Runs `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            let (position, offset) = match self.peek()? {
                Some(token) => (token.from, token.span.start),
                None => (self.tokens.position(), self.source().len()),
            };
            return Err(ParseError::DepthLimit {
                limit: self.max_depth,
                position,
                context: self.source()[offset..].chars().take(CONTEXT_CHARS).collect(),
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Abandons the construct opened by `open`: everything built since
    /// `checkpoint` is dropped and the consumed source becomes one Text node.
    fn degrade(&mut self, checkpoint: Checkpoint, open: &Token<'a>) -> Result<(), ParseError> {
        log::debug!(
            "unterminated {:?} at {} kept as text",
            open.kind,
            open.from
        );
        self.doc.rollback(checkpoint);
        let value = self.consumed_since(open).to_string();
        self.doc.push(
            NodeKind::Text { value },
            checkpoint.parent(),
            open.from,
            self.last_to,
        );
        Ok(())
    }
}
