//! strings68 interpreter.
//!
//! The [`Interpreter`] owns the global variable store, the output log and
//! the regex cache, and walks a classified [`Program`] by line index.  Block
//! constructs re-enter [`Interpreter::exec_block`] over a narrower range of
//! lines for each branch or loop iteration, passing down the loop-variable
//! [`Scope`] that applies to it.

use tracing::{debug, trace};

use crate::config::Config;
use crate::pattern::PatternCache;
use crate::var::{Scope, VarStore};

use super::{
    error::{InterpretError, ScriptError},
    expr::{eval_expr, Condition, Env},
    stmt::{ForeachHeader, Line, Program},
    value::Value,
};

type ExecResult<T> = Result<T, InterpretError>;

/// Attach the 1-based number of line `idx` to an error.
fn at(idx: usize) -> impl Fn(ScriptError) -> InterpretError {
    move |error| InterpretError { line: idx + 1, error }
}

// ── Interpreter ───────────────────────────────────────────────────────────────

/// The strings68 interpreter.
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Global variable store.
    globals: VarStore,
    /// Lines produced by `print`.
    output: Vec<String>,
    /// Compiled `match` patterns.
    patterns: PatternCache,
    config: Config,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Interpreter {
            config,
            ..Self::default()
        }
    }

    /// Output of the most recent [`interpret`](Self::interpret) call.  After
    /// a failed call this holds the lines printed before the failure.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Read a global variable left by the most recent run.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Run a complete program and return its output lines.
    ///
    /// Globals and output start empty on every call.
    pub fn interpret(&mut self, code: &str) -> ExecResult<Vec<String>> {
        self.globals.clear();
        self.output.clear();

        let program = Program::parse(code);
        debug!(lines = program.len(), "interpret");
        let result = self.exec_block(&program, 0, program.len(), &Scope::new(), 0);
        match &result {
            Ok(_) => debug!(output = self.output.len(), "done"),
            Err(e) => debug!(error = %e, output = self.output.len(), "failed"),
        }
        result.map(|_| self.output.clone())
    }

    /// Execute lines `[start, end)` under `scope` and return the index of
    /// the first line not consumed.
    pub fn exec_block(
        &mut self,
        program: &Program,
        start: usize,
        end: usize,
        scope: &Scope,
        depth: usize,
    ) -> ExecResult<usize> {
        if depth > self.config.max_depth {
            return Err(at(start)(ScriptError::NestingLimit {
                limit: self.config.max_depth,
            }));
        }

        let mut i = start;
        while i < end {
            let idx = i;
            i += 1;
            match program.line(idx) {
                Line::Skip => {}

                Line::Print(rest) => {
                    trace!(line = idx + 1, "print");
                    let value = self.eval(rest, scope, depth).map_err(at(idx))?;
                    self.output.push(value.into_wire());
                }

                Line::Assign(text) => {
                    trace!(line = idx + 1, "assign");
                    self.exec_assign(text, scope, depth).map_err(at(idx))?;
                }

                Line::If { cond, else_at, end_at } => {
                    i = self.exec_if(program, idx, end, cond, *else_at, *end_at, scope, depth)?;
                }

                Line::Foreach { header, end_at } => {
                    i = self.exec_foreach(program, idx, end, header, *end_at, scope, depth)?;
                }

                Line::While { cond, end_at } => {
                    i = self.exec_while(program, idx, end, cond, *end_at, scope, depth)?;
                }
            }
        }
        Ok(i)
    }

    // ── Statements ────────────────────────────────────────────────────────────

    fn eval(&mut self, expr: &str, scope: &Scope, depth: usize) -> Result<Value, ScriptError> {
        let mut env = Env::new(&self.globals, scope, &mut self.patterns, self.config.max_depth);
        eval_expr(expr, &mut env, depth)
    }

    fn check(&mut self, cond: &Condition, scope: &Scope) -> Result<bool, ScriptError> {
        let env = Env::new(&self.globals, scope, &mut self.patterns, self.config.max_depth);
        cond.eval(&env)
    }

    /// `<digits> = <expr>`.  Always writes the global store.
    fn exec_assign(&mut self, text: &str, scope: &Scope, depth: usize) -> Result<(), ScriptError> {
        let (target, expr) = text
            .split_once('=')
            .ok_or_else(|| ScriptError::syntax(format!("Invalid assignment: {text}")))?;
        let target = target.trim();
        if target.is_empty() || !target.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScriptError::syntax(format!(
                "Variable name must be digits: {target}"
            )));
        }
        let value = self.eval(expr, scope, depth)?;
        self.globals.set(target, value);
        Ok(())
    }

    // ── Block resolvers ───────────────────────────────────────────────────────

    /// Return `end_at` if the terminator lies inside the current range.
    fn closer(end_at: Option<usize>, end: usize, what: &str) -> Result<usize, ScriptError> {
        match end_at {
            Some(pos) if pos < end => Ok(pos),
            _ => Err(ScriptError::syntax(format!("Unmatched {what}"))),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn exec_if(
        &mut self,
        program: &Program,
        start: usize,
        end: usize,
        cond: &Result<Condition, ScriptError>,
        else_at: Option<usize>,
        end_at: Option<usize>,
        scope: &Scope,
        depth: usize,
    ) -> ExecResult<usize> {
        let cond = cond.as_ref().map_err(|e| at(start)(e.clone()))?;
        let taken = self.check(cond, scope).map_err(at(start))?;
        let endif = Self::closer(end_at, end, "if/endif").map_err(at(start))?;
        trace!(line = start + 1, taken, "if");

        if taken {
            let branch_end = else_at.unwrap_or(endif);
            self.exec_block(program, start + 1, branch_end, scope, depth + 1)?;
        } else if let Some(else_pos) = else_at {
            self.exec_block(program, else_pos + 1, endif, scope, depth + 1)?;
        }
        Ok(endif + 1)
    }

    #[allow(clippy::too_many_arguments)]
    fn exec_foreach(
        &mut self,
        program: &Program,
        start: usize,
        end: usize,
        header: &Result<ForeachHeader, ScriptError>,
        end_at: Option<usize>,
        scope: &Scope,
        depth: usize,
    ) -> ExecResult<usize> {
        let header = header.as_ref().map_err(|e| at(start)(e.clone()))?;
        let source = self
            .globals
            .resolve(scope, &header.source)
            .cloned()
            .ok_or_else(|| ScriptError::Name(header.source.clone()))
            .map_err(at(start))?;
        let endfor = Self::closer(end_at, end, "foreach/endfor").map_err(at(start))?;

        // Array iteration is chosen by representation; anything else walks
        // the characters of the text.
        let items: Vec<String> = if source.is_array() {
            source.array_elems().map_err(at(start))?.into_owned()
        } else {
            source.as_wire().chars().map(String::from).collect()
        };
        debug!(line = start + 1, var = %header.var, items = items.len(), "foreach");

        for item in items {
            let inner = scope.with(&header.var, Value::Scalar(item));
            self.exec_block(program, start + 1, endfor, &inner, depth + 1)?;
        }
        Ok(endfor + 1)
    }

    #[allow(clippy::too_many_arguments)]
    fn exec_while(
        &mut self,
        program: &Program,
        start: usize,
        end: usize,
        cond: &Result<Condition, ScriptError>,
        end_at: Option<usize>,
        scope: &Scope,
        depth: usize,
    ) -> ExecResult<usize> {
        let cond = cond.as_ref().map_err(|e| at(start)(e.clone()))?;
        let endwhile = Self::closer(end_at, end, "while/endwhile").map_err(at(start))?;
        let limit = self.config.max_while_iterations;

        let mut iterations = 0usize;
        loop {
            if iterations >= limit {
                return Err(at(start)(ScriptError::LoopLimit { limit }));
            }
            if !self.check(cond, scope).map_err(at(start))? {
                break;
            }
            self.exec_block(program, start + 1, endwhile, scope, depth + 1)?;
            iterations += 1;
        }
        debug!(line = start + 1, iterations, "while");
        Ok(endwhile + 1)
    }
}

/// Run `code` on a fresh default [`Interpreter`].
pub fn interpret(code: &str) -> ExecResult<Vec<String>> {
    Interpreter::new().interpret(code)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
