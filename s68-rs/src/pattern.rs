//! Regular-expression patterns for the `match` built-in.
//!
//! Patterns use the [`regex`] crate dialect: Perl-style classes, repetition,
//! alternation, groups and anchors, Unicode-aware, no backreferences and no
//! look-around.  Matching is case-sensitive unless the pattern opts out with
//! `(?i)`.  A search finds the leftmost match anywhere in the subject.
//!
//! A `match` call inside a `while` or `foreach` body runs with the same
//! pattern text on every iteration, so compiled patterns are cached by
//! source text in a [`PatternCache`] owned by the interpreter.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

// ── Public types ─────────────────────────────────────────────────────────────

/// Error returned when a pattern cannot be compiled.
#[derive(Debug)]
pub struct PatternError {
    pub src: String,
    pub source: regex::Error,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid regex pattern '{}': {}", self.src, self.source)
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A compiled pattern ready for matching.
///
/// `Arc` makes `Clone` a reference-count increment instead of a recompile.
#[derive(Clone)]
pub struct Pattern {
    src: String,
    re: Arc<Regex>,
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern").field("src", &self.src).finish()
    }
}

impl Pattern {
    /// Compile `src`.
    pub fn new(src: &str) -> Result<Self, PatternError> {
        let re = Regex::new(src).map_err(|source| PatternError {
            src: src.to_owned(),
            source,
        })?;
        Ok(Self {
            src: src.to_owned(),
            re: Arc::new(re),
        })
    }

    /// The text of the leftmost match in `text`, if any.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.re.find(text).map(|m| m.as_str())
    }
}

// ── Cache ────────────────────────────────────────────────────────────────────

/// Compiled patterns keyed by source text.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Pattern>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `src`, compiling it on first use.
    /// Invalid patterns are not cached.
    pub fn get(&mut self, src: &str) -> Result<Pattern, PatternError> {
        if let Some(p) = self.compiled.get(src) {
            return Ok(p.clone());
        }
        let p = Pattern::new(src)?;
        self.compiled.insert(src.to_owned(), p.clone());
        Ok(p)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
