use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;
use core::any::Any;

use vc_value::{Object, Value};

use crate::TranslateError;
use crate::info::{Instance, MapOps};
use crate::translate::{Translator, TranslatorRef, decode_slot, encode_slot};

/// Member name of a map entry's key.
pub const KEY: &str = "key";
/// Member name of a map entry's value.
pub const VALUE: &str = "value";

/// Translates a keyed map as an array of `{"key": K, "value": V}` objects.
///
/// Keys may be of any translatable type, not only strings. Entry order on
/// the wire follows the map's iteration order and carries no meaning.
pub struct MapTranslator {
    ops: MapOps,
    key: TranslatorRef,
    value: TranslatorRef,
}

impl MapTranslator {
    #[inline]
    pub fn new(ops: MapOps, key: TranslatorRef, value: TranslatorRef) -> Self {
        Self { ops, key, value }
    }

    fn decode_entry(
        &self,
        entry: &Value,
    ) -> Result<(Option<Instance>, Option<Instance>), TranslateError> {
        let entry = entry
            .as_object()
            .ok_or_else(|| TranslateError::mismatch("map entry object", entry.kind()))?;
        let key = entry.get(KEY).ok_or(TranslateError::MissingMapKey)?;
        let value = entry.get(VALUE).ok_or(TranslateError::MissingMapValue)?;
        Ok((decode_slot(&*self.key, key)?, decode_slot(&*self.value, value)?))
    }
}

impl Translator for MapTranslator {
    fn external_name(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "map<{},{}>",
            self.key.external_name(),
            self.value.external_name()
        ))
    }

    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError> {
        let entries = self
            .ops
            .entries(data)
            .ok_or(TranslateError::WrongType { expected: "map" })?;
        let values = entries
            .into_iter()
            .enumerate()
            .map(|(index, (key, value))| {
                let key = encode_slot(&*self.key, key).map_err(|e| e.in_element(index))?;
                let value = encode_slot(&*self.value, value).map_err(|e| e.in_element(index))?;
                let mut entry = Object::with_capacity(2);
                entry.insert(KEY, key);
                entry.insert(VALUE, value);
                Ok(Value::Object(entry))
            })
            .collect::<Result<Vec<_>, TranslateError>>()?;
        Ok(Value::Array(values))
    }

    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        let entries = value
            .as_array()
            .ok_or_else(|| TranslateError::mismatch("array", value.kind()))?;
        let entries = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.decode_entry(entry).map_err(|e| e.in_element(index)))
            .collect::<Result<Vec<_>, _>>()?;
        self.ops.build(entries)
    }
}
