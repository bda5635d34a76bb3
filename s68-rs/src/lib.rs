//! strings68: a string-only scripting language whose variables are named by
//! digit sequences.
//!
//! The engine lives in [`script`]; [`cli`] and the `s68` binary are a thin
//! front end that hands it whole programs read from a file or stdin.

pub mod cli;
pub mod config;
pub mod pattern;
pub mod script;
pub mod var;

pub use config::Config;
pub use script::{interpret, ErrorKind, InterpretError, Interpreter, ScriptError, Value};
