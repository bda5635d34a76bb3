//! Built-in strings68 functions.
//!
//! Each function receives its arguments already prepared by the evaluator:
//! argument positions marked [`ArgKind::Eval`] arrive as evaluated values,
//! positions marked [`ArgKind::Literal`] arrive as their raw text with the
//! surrounding `"` characters stripped.

use tracing::debug;

use super::error::{Result, ScriptError};
use super::expr::EvalContext;
use super::value::{decode_array, encode_array, Value, SENTINEL};

/// How the evaluator prepares one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Evaluate the argument as an expression.
    Eval,
    /// Use the argument text as-is, minus surrounding quotes.
    Literal,
}

use ArgKind::{Eval, Literal};

/// The fixed library of built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Uppercase,
    Lowercase,
    Reverse,
    Length,
    Concat,
    Split,
    Get,
    Match,
    Replace,
    Substring,
}

impl Builtin {
    pub const ALL: [Builtin; 10] = [
        Builtin::Uppercase,
        Builtin::Lowercase,
        Builtin::Reverse,
        Builtin::Length,
        Builtin::Concat,
        Builtin::Split,
        Builtin::Get,
        Builtin::Match,
        Builtin::Replace,
        Builtin::Substring,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Uppercase => "uppercase",
            Builtin::Lowercase => "lowercase",
            Builtin::Reverse => "reverse",
            Builtin::Length => "length",
            Builtin::Concat => "concat",
            Builtin::Split => "split",
            Builtin::Get => "get",
            Builtin::Match => "match",
            Builtin::Replace => "replace",
            Builtin::Substring => "substring",
        }
    }

    /// Argument preparation, one entry per parameter.
    pub fn params(self) -> &'static [ArgKind] {
        match self {
            Builtin::Uppercase | Builtin::Lowercase | Builtin::Reverse | Builtin::Length => &[Eval],
            Builtin::Concat => &[Eval, Eval],
            Builtin::Split | Builtin::Get | Builtin::Match => &[Eval, Literal],
            Builtin::Replace | Builtin::Substring => &[Eval, Literal, Literal],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }

    /// Find the built-in called by `expr`, which must begin with `name(`.
    pub fn lookup_call(expr: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| {
            expr.strip_prefix(b.name())
                .is_some_and(|rest| rest.starts_with('('))
        })
    }
}

/// Apply `builtin` to prepared arguments.  `args.len()` must equal
/// `builtin.arity()`.
pub fn call_builtin(builtin: Builtin, args: Vec<Value>, ctx: &mut dyn EvalContext) -> Result<Value> {
    if builtin == Builtin::Get {
        let elems = args[0].array_elems()?;
        let index = parse_int(&args[1].as_wire())?;
        if index < 0 || index as usize >= elems.len() {
            return Err(ScriptError::Index { index, len: elems.len() });
        }
        return Ok(Value::Scalar(elems[index as usize].clone()));
    }

    let s = args[0].as_wire();
    Ok(match builtin {
        Builtin::Uppercase => Value::Scalar(s.to_uppercase()),
        Builtin::Lowercase => Value::Scalar(s.to_lowercase()),
        Builtin::Reverse => Value::Scalar(s.chars().rev().collect()),
        Builtin::Length => Value::Scalar(s.chars().count().to_string()),
        Builtin::Concat => {
            let mut out = s.into_owned();
            out.push_str(&args[1].as_wire());
            Value::Scalar(out)
        }
        Builtin::Split => {
            let delim = args[1].as_wire();
            let parts: Vec<String> = if delim.is_empty() {
                s.chars().map(String::from).collect()
            } else {
                s.split(&*delim).map(str::to_owned).collect()
            };
            if parts.iter().any(|p| p.contains(SENTINEL)) {
                // Pieces of an already-encoded array: the elements are
                // whatever the joined wire form splits into.
                Value::Array(decode_array(&encode_array(&parts))?)
            } else {
                Value::Array(parts)
            }
        }
        Builtin::Match => {
            let src = args[1].as_wire();
            let pattern = ctx.pattern(&src)?;
            debug!(pattern = %src, subject = %s, "match");
            let found = pattern.find(&s).unwrap_or_default().to_owned();
            debug!(result = %found, "match result");
            Value::Scalar(found)
        }
        Builtin::Replace => {
            let old = args[1].as_wire();
            let new = args[2].as_wire();
            Value::Scalar(s.replace(&*old, &new))
        }
        Builtin::Substring => {
            let start = parse_int(&args[1].as_wire())?;
            let len = parse_int(&args[2].as_wire())?;
            Value::Scalar(slice_chars(&s, start, start.saturating_add(len)))
        }
        Builtin::Get => unreachable!("handled above"),
    })
}

/// Parse an integer literal argument.
fn parse_int(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .map_err(|_| ScriptError::Value(format!("invalid integer: {s:?}")))
}

/// Characters `[start, end)` of `s` with sequence-slice semantics: negative
/// bounds count from the end, and both bounds clamp to the string.
fn slice_chars(s: &str, start: i64, end: i64) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len() as i64;
    let clamp = |i: i64| -> usize {
        let i = if i < 0 { i + n } else { i };
        i.clamp(0, n) as usize
    };
    let (a, b) = (clamp(start), clamp(end));
    if a >= b {
        return String::new();
    }
    chars[a..b].iter().collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
