use alloc::string::{String, ToString};

use thiserror::Error;

use crate::Value;

// -----------------------------------------------------------------------------
// Readability

/// How literal JSON text is laid out.
///
/// Readability only affects whitespace; the same [`Value`] renders to
/// semantically identical text at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Readability {
    /// No insignificant whitespace.
    #[default]
    Compact,
    /// Indented, one member or element per line.
    Pretty,
}

// -----------------------------------------------------------------------------
// TextError

/// An error converting between [`Value`] and literal JSON text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TextError {
    #[error("malformed JSON text at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("failed to render JSON text: {0}")]
    Render(String),
}

// -----------------------------------------------------------------------------
// Codec

/// Renders a [`Value`] as JSON text.
///
/// Object members are written in insertion order.
///
/// # Examples
///
/// ```
/// use vc_value::{Object, Readability, Value, to_text};
///
/// let object: Object = [("b", Value::from(1)), ("a", Value::from(true))]
///     .into_iter()
///     .collect();
/// let value = Value::from(object);
///
/// assert_eq!(to_text(&value, Readability::Compact).unwrap(), r#"{"b":1,"a":true}"#);
/// assert_eq!(
///     to_text(&value, Readability::Pretty).unwrap(),
///     "{\n  \"b\": 1,\n  \"a\": true\n}",
/// );
/// ```
pub fn to_text(value: &Value, readability: Readability) -> Result<String, TextError> {
    let rendered = match readability {
        Readability::Compact => serde_json::to_string(value),
        Readability::Pretty => serde_json::to_string_pretty(value),
    };
    rendered.map_err(|e| TextError::Render(e.to_string()))
}

/// Parses JSON text into a [`Value`].
///
/// Numbers keep their literal digits and objects keep member order.
///
/// # Examples
///
/// ```
/// use vc_value::{Value, from_text};
///
/// let value = from_text(r#"[1, -2, 2.5, null]"#).unwrap();
/// assert_eq!(value.as_array().unwrap().len(), 4);
/// assert!(from_text("[1,").is_err());
/// ```
pub fn from_text(text: &str) -> Result<Value, TextError> {
    serde_json::from_str(text).map_err(|e| TextError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

// -----------------------------------------------------------------------------
// Tests
