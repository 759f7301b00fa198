use alloc::vec::Vec;

use serde_core::de::Error;
use serde_core::{Deserialize, Deserializer};

use crate::{Number, Object, Value};

// -----------------------------------------------------------------------------
// From serde_json

// Parsing is delegated to `serde_json::Value`, which recognizes the
// arbitrary-precision number token and keeps member order. The tree is then
// moved over without copying strings.

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(Number::from_inner(n)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(members) => {
                let mut object = Object::with_capacity(members.len());
                for (name, value) in members {
                    object.insert(name, Value::from(value));
                }
                Value::Object(object)
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n.into_inner()),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items.into_iter().map(serde_json::Value::from).collect::<Vec<_>>(),
            ),
            Value::Object(object) => serde_json::Value::Object(
                object
                    .into_iter()
                    .map(|(name, value)| (name, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

// -----------------------------------------------------------------------------
// Deserialize

impl<'de> Deserialize<'de> for Number {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Number::deserialize(deserializer).map(Number::from_inner)
    }
}

impl<'de> Deserialize<'de> for Value {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(object),
            other => Err(D::Error::custom(format_args!(
                "expected object, found {}",
                other.kind()
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
