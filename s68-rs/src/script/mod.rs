//! strings68 execution engine.
//!
//! strings68 is a line-oriented language in which every variable name is a
//! digit sequence and every value is a string.  This module covers:
//!
//! - `print` and `<digits> = <expr>` statements
//! - `if` … `else` … `endif`, `foreach` … `endfor`, `while` … `endwhile`
//! - ten built-in string functions (`uppercase`, `split`, `match`, …)
//! - the sentinel-encoded array values produced by `split`
//!
//! # Quick start
//!
//! ```rust
//! use s68::script::Interpreter;
//!
//! let mut interp = Interpreter::new();
//! let out = interp
//!     .interpret("0 = split(\"a,b,c\", \",\")\n1 = get(0, \"1\")\nprint 1")
//!     .unwrap();
//! assert_eq!(out, vec!["b"]);
//! ```

pub mod builtins;
pub mod error;
pub mod expr;
pub mod interp;
pub mod stmt;
pub mod value;

// Re-exports for convenience.
pub use error::{ErrorKind, InterpretError, ScriptError};
pub use interp::{interpret, Interpreter};
pub use value::Value;
