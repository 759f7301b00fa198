use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{Number, Object};

// -----------------------------------------------------------------------------
// ValueKind

/// The shape of a [`Value`], without its content.
///
/// Used in diagnostics, e.g. "expected number, found object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Bool => f.pad("boolean"),
            Self::Number => f.pad("number"),
            Self::String => f.pad("string"),
            Self::Array => f.pad("array"),
            Self::Object => f.pad("object"),
        }
    }
}

// -----------------------------------------------------------------------------
// Value

/// A JSON-like value tree.
///
/// # Examples
///
/// ```
/// use vc_value::{Object, Value, ValueKind};
///
/// let mut entry = Object::new();
/// entry.insert("key", Value::from(1));
/// entry.insert("value", Value::from("x"));
///
/// let value = Value::Array(vec![Value::Object(entry)]);
/// assert_eq!(value.kind(), ValueKind::Array);
///
/// let first = &value.as_array().unwrap()[0];
/// assert_eq!(first.get("value").and_then(Value::as_str), Some("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Returns the [`ValueKind`] of this value.
    #[inline]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up a member when this value is an object.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(key))
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Number> for Value {
    #[inline]
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<f64> for Value {
    /// Non-finite floats become [`Value::Null`]; translators that must not
    /// lose them check with [`Number::from_f64`] instead.
    #[inline]
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from(f64::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    #[inline]
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Value, ValueKind};
    use crate::Object;

    #[test]
    fn kinds() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from(false).kind(), ValueKind::Bool);
        assert_eq!(Value::from(1.5).kind(), ValueKind::Number);
        assert_eq!(Value::from("s").kind(), ValueKind::String);
        assert_eq!(Value::from(Vec::new()).kind(), ValueKind::Array);
        assert_eq!(Value::from(Object::new()).kind(), ValueKind::Object);
        assert_eq!(ValueKind::Object.to_string(), "object");
    }

    #[test]
    fn non_finite_float_is_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(f32::INFINITY), Value::Null);
    }

    #[test]
    fn member_lookup() {
        let object: Object = [("n", Value::from(5))].into_iter().collect();
        let value = Value::from(object);
        assert_eq!(value.get("n"), Some(&Value::from(5)));
        assert_eq!(value.get("m"), None);
        assert_eq!(Value::from(5).get("n"), None);
    }
}
