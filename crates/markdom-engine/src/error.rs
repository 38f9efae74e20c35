use markdom_syntax::{Position, ScanError};
use thiserror::Error;

/// Failures that abort a parse.
///
/// Malformed markdown is never one of them: unterminated or stray syntax is
/// kept as literal text. These variants report broken internal contracts and
/// input nested deeper than the configured limit.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("nesting deeper than {limit} levels at {position}, near {context:?}")]
    DepthLimit {
        limit: usize,
        position: Position,
        context: String,
    },
}
