//! strings68 line classification and block matching.
//!
//! A program is a sequence of physical lines, one statement per line.  There
//! is no tokenizer: each line is classified by its leading keyword, and the
//! text that follows is kept for the evaluator.
//!
//! [`Program::parse`] makes a single pass that also pairs every block opener
//! with its terminator (`if`/`else`/`endif`, `foreach`/`endfor`,
//! `while`/`endwhile`), so loop bodies never rescan for their end line.
//! Only openers and terminators of the same kind affect each other's
//! nesting depth.
//!
//! Parsing never fails.  A malformed header or a missing terminator is
//! recorded on the line and raised when that line is executed.

use std::sync::OnceLock;

use regex::Regex;

use super::error::ScriptError;
use super::expr::{CondOp, Condition, Operand};

/// `foreach <ident> in <digits> do`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeachHeader {
    pub var: String,
    pub source: String,
}

/// One classified source line.
#[derive(Debug, Clone)]
pub enum Line {
    /// Blank, comment, or anything the dispatcher ignores (including stray
    /// `else`/`endif`/`endfor`/`endwhile`).
    Skip,
    /// `print …`; holds the trimmed text after the keyword.
    Print(String),
    /// `<digits> = <expr>`; holds the whole line.
    Assign(String),
    If {
        cond: Result<Condition, ScriptError>,
        else_at: Option<usize>,
        end_at: Option<usize>,
    },
    Foreach {
        header: Result<ForeachHeader, ScriptError>,
        end_at: Option<usize>,
    },
    While {
        cond: Result<Condition, ScriptError>,
        end_at: Option<usize>,
    },
}

/// A classified program: one [`Line`] per physical source line.
#[derive(Debug, Clone, Default)]
pub struct Program {
    lines: Vec<Line>,
}

impl Program {
    /// Classify every line of `src` and match block terminators.
    pub fn parse(src: &str) -> Program {
        let texts: Vec<&str> = src.split('\n').map(str::trim).collect();
        let mut lines: Vec<Line> = texts.iter().map(|t| classify(t)).collect();

        // Per-kind stacks of open block indices.
        let mut ifs: Vec<usize> = Vec::new();
        let mut fors: Vec<usize> = Vec::new();
        let mut whiles: Vec<usize> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if text.starts_with("if ") {
                ifs.push(i);
            } else if *text == "endif" {
                if let Some(open) = ifs.pop() {
                    if let Line::If { end_at, .. } = &mut lines[open] {
                        *end_at = Some(i);
                    }
                }
            } else if *text == "else" {
                if let Some(&open) = ifs.last() {
                    if let Line::If { else_at, .. } = &mut lines[open] {
                        *else_at = Some(i);
                    }
                }
            }

            if text.starts_with("foreach ") {
                fors.push(i);
            } else if *text == "endfor" {
                if let Some(open) = fors.pop() {
                    if let Line::Foreach { end_at, .. } = &mut lines[open] {
                        *end_at = Some(i);
                    }
                }
            }

            if text.starts_with("while ") {
                whiles.push(i);
            } else if *text == "endwhile" {
                if let Some(open) = whiles.pop() {
                    if let Line::While { end_at, .. } = &mut lines[open] {
                        *end_at = Some(i);
                    }
                }
            }
        }

        Program { lines }
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, i: usize) -> &Line {
        &self.lines[i]
    }
}

// ── Classification ────────────────────────────────────────────────────────────

fn classify(text: &str) -> Line {
    if text.is_empty() || text.starts_with('#') {
        return Line::Skip;
    }
    if let Some(rest) = text.strip_prefix("print ") {
        return Line::Print(rest.trim().to_owned());
    }
    if text.starts_with("if ") {
        return Line::If {
            cond: parse_condition(if_re(), text, "if"),
            else_at: None,
            end_at: None,
        };
    }
    if text.starts_with("foreach ") {
        return Line::Foreach {
            header: parse_foreach(text),
            end_at: None,
        };
    }
    if text.starts_with("while ") {
        return Line::While {
            cond: parse_condition(while_re(), text, "while"),
            end_at: None,
        };
    }
    if text.contains('=') {
        return Line::Assign(text.to_owned());
    }
    Line::Skip
}

// ── Header grammars ───────────────────────────────────────────────────────────

fn if_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^if\s+(\w+)\s+(equals|contains|startswith|endswith)\s+(.+?)\s+then")
            .expect("if-header regex")
    })
}

fn while_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^while\s+(\w+)\s+(equals|contains|startswith|endswith)\s+(.+?)\s+do")
            .expect("while-header regex")
    })
}

fn foreach_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^foreach\s+(\w+)\s+in\s+([0-9]+)\s+do").expect("foreach-header regex"))
}

/// Parse `<kw> <ident> <op> <operand> <then|do>`.
fn parse_condition(re: &Regex, text: &str, kw: &str) -> Result<Condition, ScriptError> {
    let caps = re
        .captures(text)
        .ok_or_else(|| ScriptError::syntax(format!("Invalid {kw} statement: {text}")))?;
    let op = match &caps[2] {
        "equals" => CondOp::Equals,
        "contains" => CondOp::Contains,
        "startswith" => CondOp::StartsWith,
        _ => CondOp::EndsWith,
    };
    let operand = caps[3].trim();
    let operand = match strip_quotes(operand) {
        Some(lit) => Operand::Literal(lit.to_owned()),
        None => Operand::Var(operand.to_owned()),
    };
    Ok(Condition {
        left: caps[1].to_owned(),
        op,
        operand,
    })
}

fn parse_foreach(text: &str) -> Result<ForeachHeader, ScriptError> {
    let caps = foreach_re()
        .captures(text)
        .ok_or_else(|| ScriptError::syntax(format!("Invalid foreach statement: {text}")))?;
    Ok(ForeachHeader {
        var: caps[1].to_owned(),
        source: caps[2].to_owned(),
    })
}

/// The contents of a `"…"` literal, or `None` if `s` is not quoted.
///
/// A lone `"` counts as an empty literal.
pub fn strip_quotes(s: &str) -> Option<&str> {
    if s == "\"" {
        return Some("");
    }
    s.strip_prefix('"')?.strip_suffix('"')
}

// ── Tests ─────────────────────────────────────────────────────────────────────
