use serde::{Deserialize, Serialize};

/// Tunables for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// How deeply lists and inline constructs may nest before the parse aborts.
    pub max_depth: usize,
    /// Entries kept by the LaTeX render cache. Zero disables caching.
    pub latex_cache_capacity: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;
    pub const DEFAULT_LATEX_CACHE_CAPACITY: usize = 100;
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            latex_cache_capacity: Self::DEFAULT_LATEX_CACHE_CAPACITY,
        }
    }
}
