//! Runtime value type for strings68.
//!
//! At the language level every value is a string.  Collections produced by
//! `split` travel through that string-only space in an encoded form:
//!
//! ```text
//! <count>\0<elem0>\0<elem1>\0…\0<elem{count-1}>
//! ```
//!
//! Inside the interpreter an array is kept as [`Value::Array`] so that
//! `get` and `foreach` don't have to re-parse it; the encoded form is only
//! produced when the value is observed as text (`print`, string built-ins,
//! conditions).

use std::borrow::Cow;
use std::fmt;

use super::error::ScriptError;

/// Separator byte between the elements of an encoded array.
pub const SENTINEL: char = '\0';

/// A strings68 runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Array(Vec<String>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_wire())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_owned())
    }
}

impl Value {
    /// The value as program-visible text.  Arrays are rendered in their
    /// sentinel-joined wire form.
    pub fn as_wire(&self) -> Cow<'_, str> {
        match self {
            Value::Scalar(s) => Cow::Borrowed(s),
            Value::Array(items) => Cow::Owned(encode_array(items)),
        }
    }

    /// Consume the value, returning its wire form.
    pub fn into_wire(self) -> String {
        match self {
            Value::Scalar(s) => s,
            Value::Array(items) => encode_array(&items),
        }
    }

    /// Whether the value reads as an array: either tagged as one, or a
    /// scalar that carries the sentinel byte (e.g. the result of
    /// `concat` on an array).
    pub fn is_array(&self) -> bool {
        match self {
            Value::Scalar(s) => s.contains(SENTINEL),
            Value::Array(_) => true,
        }
    }

    /// Borrow or decode the array elements.
    ///
    /// Fails with a value error if the value has no sentinel at all.
    pub fn array_elems(&self) -> Result<Cow<'_, [String]>, ScriptError> {
        match self {
            Value::Array(items) => Ok(Cow::Borrowed(items.as_slice())),
            Value::Scalar(s) if s.contains(SENTINEL) => decode_array(s).map(Cow::Owned),
            Value::Scalar(s) => Err(ScriptError::Value(format!("not an array: {s:?}"))),
        }
    }
}

// ── Wire encoding ─────────────────────────────────────────────────────────────

/// Encode `items` as `count\0e0\0e1…`.
pub fn encode_array(items: &[String]) -> String {
    let mut out = items.len().to_string();
    out.push(SENTINEL);
    out.push_str(&items.join("\0"));
    out
}

/// Decode a sentinel-joined string.
///
/// The text before the first sentinel is the element count; at least that
/// many elements must follow.  Extra trailing elements are ignored.
pub fn decode_array(s: &str) -> Result<Vec<String>, ScriptError> {
    let mut parts = s.split(SENTINEL);
    let head = parts.next().unwrap_or_default();
    let count: usize = head
        .trim()
        .parse()
        .map_err(|_| ScriptError::Value(format!("invalid array length: {head:?}")))?;
    let items: Vec<String> = parts.take(count).map(str::to_owned).collect();
    if items.len() < count {
        return Err(ScriptError::Index {
            index: items.len() as i64,
            len: count,
        });
    }
    Ok(items)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
