use thiserror::Error;

use crate::position::Position;
use crate::token::TokenKind;

/// Violations of the scanner's internal contract.
///
/// None of these are caused by malformed markdown: every input text scans
/// cleanly with a well-formed registry. They abort the parse with enough
/// context to locate the fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("cannot skip {requested} characters at {position}, only {available} remain near {context:?}")]
    SkipPastEnd {
        requested: usize,
        available: usize,
        position: Position,
        context: String,
    },

    #[error("pattern for {kind:?} matched the empty string at {position} near {context:?}")]
    EmptyMatch {
        kind: TokenKind,
        position: Position,
        context: String,
    },

    #[error("pattern for {kind:?} was located at {position} but no longer matches there")]
    LostMatch { kind: TokenKind, position: Position },
}
