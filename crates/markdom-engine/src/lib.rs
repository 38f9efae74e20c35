//! # markdom-engine
//!
//! Parses markdown into a typed document tree and renders that tree as HTML,
//! plain text or canonical markdown.
//!
//! ## Pipeline
//!
//! ```text
//! Source → TokenStream → Parser → Document → resolution pass
//!          (markdom-syntax)                  (references, TOC, TOF)
//! ```
//!
//! Parsing never fails on malformed markdown: unterminated emphasis, spans,
//! links and fences are kept as the literal text they were written as. The
//! only errors are [`ParseError::DepthLimit`] for input nested deeper than
//! [`ParseOptions::max_depth`], and scanner contract violations.
//!
//! ```
//! let doc = markdom_engine::parse("# Title\n\nSome *emphasis*.").unwrap();
//!
//! assert_eq!(doc.to_string(), "Title\nSome emphasis.");
//! assert_eq!(
//!     doc.to_html(),
//!     "<h1 id=\"Header 1\">Title</h1>\n<p>Some <em>emphasis</em>.</p>"
//! );
//! assert_eq!(doc.to_markdown(), "# Title\n\nSome *emphasis*.");
//! ```

pub mod dom;
pub mod error;
pub mod latex;
pub mod options;
pub mod parser;

pub use dom::{Document, LinkForm, Node, NodeId, NodeKind};
pub use error::ParseError;
pub use latex::{EscapedSource, LatexRenderer, MathRenderer};
pub use markdom_syntax::Position;
pub use options::ParseOptions;
pub use parser::Parser;

/// Parses `source` with the default options.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    Parser::new(source).parse()
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> Result<Document, ParseError> {
    Parser::with_options(source, options).parse()
}
