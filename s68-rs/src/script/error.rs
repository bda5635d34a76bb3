//! Interpreter error types.

use thiserror::Error;

/// Broad classification of a [`ScriptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Name,
    Index,
    Value,
    Runtime,
}

/// A failure raised while evaluating a statement.  All of these abort the
/// current `interpret` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("name error: Variable '{0}' not defined")]
    Name(String),

    #[error("index error: Index {index} out of bounds (length: {len})")]
    Index { index: i64, len: usize },

    /// A literal that should have been an integer, or text that should have
    /// been an encoded array.
    #[error("value error: {0}")]
    Value(String),

    #[error("runtime error: While loop exceeded maximum iterations ({limit})")]
    LoopLimit { limit: usize },

    #[error("runtime error: nesting deeper than {limit} levels")]
    NestingLimit { limit: usize },
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::Syntax(_) => ErrorKind::Syntax,
            ScriptError::Name(_) => ErrorKind::Name,
            ScriptError::Index { .. } => ErrorKind::Index,
            ScriptError::Value(_) => ErrorKind::Value,
            ScriptError::LoopLimit { .. } | ScriptError::NestingLimit { .. } => ErrorKind::Runtime,
        }
    }

    pub(crate) fn syntax(msg: impl Into<String>) -> Self {
        ScriptError::Syntax(msg.into())
    }
}

/// A [`ScriptError`] annotated with the 1-based source line of the statement
/// that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {error}")]
pub struct InterpretError {
    pub line: usize,
    #[source]
    pub error: ScriptError,
}

impl InterpretError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

pub type Result<T, E = ScriptError> = std::result::Result<T, E>;

// ── Tests ─────────────────────────────────────────────────────────────────────
