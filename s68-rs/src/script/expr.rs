//! strings68 expression evaluator and condition grammar.
//!
//! Expressions have three forms, tried in order:
//!
//! 1. `"literal"`: the text between the quotes, verbatim.
//! 2. `name(args…)`: a call to one of the [`Builtin`]s.
//! 3. anything else: a variable reference.
//!
//! There is no tokenizer.  Call arguments are found by scanning for commas
//! that sit outside nested parentheses and outside `"…"` spans.

use crate::pattern::{Pattern, PatternCache};
use crate::var::{Scope, VarStore};

use super::builtins::{call_builtin, ArgKind, Builtin};
use super::error::{Result, ScriptError};
use super::stmt::strip_quotes;
use super::value::Value;

// ── EvalContext ───────────────────────────────────────────────────────────────

/// Dependency-injection interface used by the expression evaluator.
pub trait EvalContext {
    /// Look up a variable (loop overlay first, then globals).
    fn get_var(&self, name: &str) -> Option<&Value>;

    /// Fetch the compiled form of a `match` pattern.
    fn pattern(&mut self, src: &str) -> Result<Pattern>;

    /// Nesting depth at which evaluation gives up.
    fn max_depth(&self) -> usize;
}

/// The evaluation environment for one statement: global store, the active
/// loop overlay, and the interpreter's pattern cache.
pub struct Env<'a> {
    vars: &'a VarStore,
    scope: &'a Scope,
    patterns: &'a mut PatternCache,
    max_depth: usize,
}

impl<'a> Env<'a> {
    pub fn new(
        vars: &'a VarStore,
        scope: &'a Scope,
        patterns: &'a mut PatternCache,
        max_depth: usize,
    ) -> Self {
        Env { vars, scope, patterns, max_depth }
    }
}

impl EvalContext for Env<'_> {
    fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.resolve(self.scope, name)
    }

    fn pattern(&mut self, src: &str) -> Result<Pattern> {
        self.patterns
            .get(src)
            .map_err(|e| ScriptError::Syntax(e.to_string()))
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Resolve a variable or fail with a name error.
pub fn lookup(name: &str, ctx: &dyn EvalContext) -> Result<Value> {
    ctx.get_var(name)
        .cloned()
        .ok_or_else(|| ScriptError::Name(name.to_owned()))
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// Evaluate `expr` starting at nesting level `depth`.
pub fn eval_expr(expr: &str, ctx: &mut dyn EvalContext, depth: usize) -> Result<Value> {
    if depth > ctx.max_depth() {
        return Err(ScriptError::NestingLimit { limit: ctx.max_depth() });
    }
    let expr = expr.trim();

    if let Some(lit) = strip_quotes(expr) {
        return Ok(Value::Scalar(lit.to_owned()));
    }

    if let Some(builtin) = Builtin::lookup_call(expr) {
        let raw = call_args(expr, builtin)?;
        let mut args = Vec::with_capacity(raw.len());
        for (text, kind) in raw.iter().zip(builtin.params()) {
            args.push(match kind {
                ArgKind::Eval => eval_expr(text, ctx, depth + 1)?,
                ArgKind::Literal => Value::Scalar(text.trim_matches('"').to_owned()),
            });
        }
        return call_builtin(builtin, args, ctx);
    }

    lookup(expr, ctx)
}

/// Extract the argument texts of a call to `builtin`.
fn call_args(expr: &str, builtin: Builtin) -> Result<Vec<String>> {
    let name = builtin.name();
    let start = name.len() + 1;
    let end = expr
        .rfind(')')
        .ok_or_else(|| ScriptError::syntax(format!("{name}: missing closing parenthesis")))?;
    let inner = &expr[start..end];

    if builtin.arity() == 1 {
        return Ok(vec![inner.trim().to_owned()]);
    }

    let args = split_args(inner);
    if args.len() != builtin.arity() {
        return Err(ScriptError::syntax(format!(
            "{name} expects {} arguments, got {}",
            builtin.arity(),
            args.len()
        )));
    }
    Ok(args)
}

/// Split an argument list on top-level commas.
///
/// A `"` toggles the in-string state unless it directly follows a `\` in the
/// current argument.  An empty trailing argument is dropped.
pub fn split_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_str = false;

    for ch in s.chars() {
        match ch {
            '"' if !current.ends_with('\\') => in_str = !in_str,
            '(' if !in_str => depth += 1,
            ')' if !in_str => depth -= 1,
            ',' if depth == 0 && !in_str => {
                args.push(std::mem::take(&mut current).trim().to_owned());
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    if !current.is_empty() {
        args.push(current.trim().to_owned());
    }
    args
}

// ── Conditions ────────────────────────────────────────────────────────────────

/// Comparison operator of an `if`/`while` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

impl CondOp {
    pub fn test(self, left: &str, right: &str) -> bool {
        match self {
            CondOp::Equals => left == right,
            CondOp::Contains => left.contains(right),
            CondOp::StartsWith => left.starts_with(right),
            CondOp::EndsWith => left.ends_with(right),
        }
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(String),
    Var(String),
}

/// `<ident> <op> <operand>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub left: String,
    pub op: CondOp,
    pub operand: Operand,
}

impl Condition {
    /// Resolve both sides and apply the operator.  The left side is looked
    /// up before the operand.
    pub fn eval(&self, ctx: &dyn EvalContext) -> Result<bool> {
        let left = lookup(&self.left, ctx)?;
        let right = match &self.operand {
            Operand::Literal(s) => s.clone(),
            Operand::Var(name) => lookup(name, ctx)?.into_wire(),
        };
        Ok(self.op.test(&left.as_wire(), &right))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        vars: VarStore,
        scope: Scope,
        patterns: PatternCache,
    }

    impl Fixture {
        fn new(vars: &[(&str, &str)]) -> Self {
            let mut store = VarStore::new();
            for (k, v) in vars {
                store.set(*k, Value::from(*v));
            }
            Fixture { vars: store, scope: Scope::new(), patterns: PatternCache::new() }
        }

        fn eval(&mut self, expr: &str) -> Result<Value> {
            let mut env = Env::new(&self.vars, &self.scope, &mut self.patterns, 32);
            eval_expr(expr, &mut env, 0)
        }

        fn text(&mut self, expr: &str) -> String {
            self.eval(expr).expect("eval failed").into_wire()
        }
    }

    #[test]
    fn literal() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.text("\"hello world\""), "hello world");
        assert_eq!(f.text("  \"padded\"  "), "padded");
        assert_eq!(f.text("\"\""), "");
    }

    #[test]
    fn literal_keeps_backslashes() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.text(r#""a\nb""#), r"a\nb");
    }

    #[test]
    fn variable() {
        let mut f = Fixture::new(&[("0", "abc")]);
        assert_eq!(f.text("0"), "abc");
    }

    #[test]
    fn undefined_variable() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.eval("9"), Err(ScriptError::Name("9".into())));
    }

    #[test]
    fn loop_scope_shadows_global() {
        let mut f = Fixture::new(&[("1", "global")]);
        f.scope = f.scope.with("1", "loop".into());
        assert_eq!(f.text("1"), "loop");
    }

    #[test]
    fn nested_calls() {
        let mut f = Fixture::new(&[("0", "abc")]);
        assert_eq!(f.text("uppercase(reverse(0))"), "CBA");
        assert_eq!(f.text("concat(uppercase(0), concat(\"-\", 0))"), "ABC-abc");
    }

    #[test]
    fn quoted_comma_is_not_separator() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.text("concat(\"a,b\", \"c\")"), "a,bc");
    }

    #[test]
    fn split_then_get() {
        let mut f = Fixture::new(&[]);
        assert_eq!(f.text("get(split(\"a,b,c\", \",\"), \"1\")"), "b");
        assert_eq!(f.text("get(split(\"a,b,c\", \",\"), 2)"), "c");
    }

    #[test]
    fn literal_args_are_not_evaluated() {
        // The delimiter names variable 1, but it is taken literally.
        let mut f = Fixture::new(&[("0", "a1b"), ("1", "zzz")]);
        assert_eq!(f.text("get(split(0, 1), 1)"), "b");
    }

    #[test]
    fn wrong_arity() {
        let mut f = Fixture::new(&[]);
        assert!(matches!(f.eval("concat(\"a\")"), Err(ScriptError::Syntax(_))));
        assert!(matches!(
            f.eval("replace(\"a\", \"b\")"),
            Err(ScriptError::Syntax(_))
        ));
    }

    #[test]
    fn trailing_empty_argument_dropped() {
        let mut f = Fixture::new(&[]);
        assert!(matches!(f.eval("concat(\"a\",)"), Err(ScriptError::Syntax(_))));
    }

    #[test]
    fn missing_close_paren() {
        let mut f = Fixture::new(&[]);
        assert!(matches!(f.eval("uppercase(\"a\""), Err(ScriptError::Syntax(_))));
    }

    #[test]
    fn length_of_array_is_wire_length() {
        let mut f = Fixture::new(&[]);
        // "2\0a\0b"
        assert_eq!(f.text("length(split(\"a,b\", \",\"))"), "5");
    }

    #[test]
    fn match_uses_literal_pattern() {
        let mut f = Fixture::new(&[("0", "order 66 now")]);
        assert_eq!(f.text("match(0, \"[0-9]+\")"), "66");
    }

    #[test]
    fn split_args_top_level_only() {
        assert_eq!(
            split_args("concat(a, b), \"x,y\", c"),
            vec!["concat(a, b)", "\"x,y\"", "c"]
        );
    }

    #[test]
    fn split_args_escaped_quote_does_not_toggle() {
        assert_eq!(split_args(r#""a\",b", c"#), vec![r#""a\",b""#, "c"]);
    }

    #[test]
    fn nesting_limit() {
        let mut f = Fixture::new(&[("0", "x")]);
        let deep = format!("{}0{}", "reverse(".repeat(40), ")".repeat(40));
        assert_eq!(f.eval(&deep), Err(ScriptError::NestingLimit { limit: 32 }));
    }

    #[test]
    fn condition_ops() {
        assert!(CondOp::Equals.test("abc", "abc"));
        assert!(CondOp::Contains.test("abc", "b"));
        assert!(CondOp::StartsWith.test("abc", "ab"));
        assert!(CondOp::EndsWith.test("abc", "bc"));
        assert!(!CondOp::Equals.test("abc", "ABC"));
    }

    #[test]
    fn condition_with_variable_operand() {
        let f = Fixture::new(&[("0", "hello"), ("1", "ell")]);
        let env_scope = Scope::new();
        let mut patterns = PatternCache::new();
        let env = Env::new(&f.vars, &env_scope, &mut patterns, 8);
        let cond = Condition {
            left: "0".into(),
            op: CondOp::Contains,
            operand: Operand::Var("1".into()),
        };
        assert_eq!(cond.eval(&env), Ok(true));
        let missing = Condition {
            left: "0".into(),
            op: CondOp::Equals,
            operand: Operand::Var("2".into()),
        };
        assert_eq!(missing.eval(&env), Err(ScriptError::Name("2".into())));
    }
}
