//! Variable storage.
//!
//! Two tiers:
//!
//! - [`VarStore`]: the global table, written only by assignment statements
//!   and living for one `interpret` call.
//! - [`Scope`]: the loop-variable overlay handed down through the block
//!   executor.  `foreach` derives a fresh copy per iteration; lookups try
//!   the overlay before the globals, so a loop variable shadows a global of
//!   the same name without ever modifying it.

use std::collections::HashMap;

use crate::script::value::Value;

/// Global key/value variable store.
#[derive(Debug, Default)]
pub struct VarStore {
    vars: HashMap<String, Value>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a variable.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Resolve `name` against `scope` first, then the globals.
    pub fn resolve<'a>(&'a self, scope: &'a Scope, name: &str) -> Option<&'a Value> {
        scope.get(name).or_else(|| self.vars.get(name))
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Loop-variable overlay.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this overlay with `name` bound to `value`.
    pub fn with(&self, name: &str, value: Value) -> Scope {
        let mut vars = self.vars.clone();
        vars.insert(name.to_owned(), value);
        Scope { vars }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
