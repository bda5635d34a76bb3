//! Interpreter limits.
//!
//! | Setting | Default | CLI flag |
//! |---------|---------|----------|
//! | [`Config::max_while_iterations`] | 10 000 | `--max-iterations` |
//! | [`Config::max_depth`] | 200 | `--max-depth` |
//!
//! `max_depth` counts block nesting (`if`/`foreach`/`while`) plus call
//! nesting inside an expression.  Exceeding it is a runtime error rather
//! than a stack overflow.

/// Default ceiling on the body executions of a single `while` statement.
pub const DEFAULT_MAX_WHILE_ITERATIONS: usize = 10_000;

/// Default nesting ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_while_iterations: usize,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_while_iterations: DEFAULT_MAX_WHILE_ITERATIONS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_while_iterations(mut self, n: usize) -> Self {
        self.max_while_iterations = n;
        self
    }

    pub fn max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
