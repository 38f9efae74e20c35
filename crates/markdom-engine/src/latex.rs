//! # LatexRenderer - Cached Math Rendering
//!
//! Math expressions are turned into HTML by a [`MathRenderer`] supplied by the
//! host application. [`LatexRenderer`] wraps it in a fixed-capacity cache keyed
//! by the expression source. When the cache is full the *oldest inserted*
//! entry is evicted (FIFO, not LRU): a hit does not refresh an entry.
//!
//! The cache sits behind a [`Mutex`], so one `Arc<LatexRenderer>` can be
//! shared by any number of documents and threads.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::options::ParseOptions;

/// Turns a LaTeX expression into HTML.
pub trait MathRenderer: Send + Sync {
    fn render(&self, expression: &str) -> String;
}

impl<F> MathRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, expression: &str) -> String {
        self(expression)
    }
}

/// Fallback backend that shows the expression source, HTML-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapedSource;

impl MathRenderer for EscapedSource {
    fn render(&self, expression: &str) -> String {
        html_escape::encode_text(expression).into_owned()
    }
}

#[derive(Debug, Default)]
struct FifoCache {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

pub struct LatexRenderer {
    capacity: usize,
    backend: Box<dyn MathRenderer>,
    cache: Mutex<FifoCache>,
}

impl LatexRenderer {
    pub fn new(backend: impl MathRenderer + 'static) -> Self {
        Self::with_capacity(backend, ParseOptions::DEFAULT_LATEX_CACHE_CAPACITY)
    }

    pub fn with_capacity(backend: impl MathRenderer + 'static, capacity: usize) -> Self {
        Self {
            capacity,
            backend: Box::new(backend),
            cache: Mutex::new(FifoCache::default()),
        }
    }

    pub fn render(&self, expression: &str) -> String {
        if self.capacity == 0 {
            return self.backend.render(expression);
        }

        // A panicking backend never runs under the lock, so a poisoned cache is still consistent.
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(expression)
        {
            return hit.clone();
        }

        let html = self.backend.render(expression);

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if !cache.entries.contains_key(expression) {
            while cache.order.len() >= self.capacity {
                let Some(oldest) = cache.order.pop_front() else {
                    break;
                };
                log::trace!("evicting cached latex {oldest:?}");
                cache.entries.remove(&oldest);
            }
            cache.order.push_back(expression.to_string());
            cache.entries.insert(expression.to_string(), html.clone());
        }
        html
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached expressions.
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, expression: &str) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .contains_key(expression)
    }
}

impl Default for LatexRenderer {
    fn default() -> Self {
        Self::new(EscapedSource)
    }
}

impl fmt::Debug for LatexRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatexRenderer")
            .field("capacity", &self.capacity)
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
