use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;
use core::any::Any;

use vc_value::Value;

use crate::TranslateError;
use crate::info::{Instance, SeqKind, SeqOps};
use crate::translate::{Translator, TranslatorRef, decode_slot, encode_slot};

/// Translates an array or collection as a JSON array.
///
/// Elements keep their iteration order on the way out and their array order
/// on the way in; null elements are allowed whenever the element slot is
/// nullable.
pub struct SeqTranslator {
    ops: SeqOps,
    element: TranslatorRef,
}

impl SeqTranslator {
    #[inline]
    pub fn new(ops: SeqOps, element: TranslatorRef) -> Self {
        Self { ops, element }
    }

    #[inline]
    pub const fn kind(&self) -> SeqKind {
        self.ops.kind()
    }

    #[inline]
    pub fn element(&self) -> &TranslatorRef {
        &self.element
    }
}

impl Translator for SeqTranslator {
    fn external_name(&self) -> Cow<'_, str> {
        let element = self.element.external_name();
        match self.kind() {
            SeqKind::Array => Cow::Owned(format!("{element}[]")),
            kind => Cow::Owned(format!("{kind}<{element}>")),
        }
    }

    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError> {
        let items = self.ops.items(data).ok_or(TranslateError::WrongType {
            expected: "sequence",
        })?;
        let values = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                encode_slot(&*self.element, item).map_err(|e| e.in_element(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(values))
    }

    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        let values = value
            .as_array()
            .ok_or_else(|| TranslateError::mismatch("array", value.kind()))?;
        let items = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                decode_slot(&*self.element, value).map_err(|e| e.in_element(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.ops.build(items)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use vc_value::{Value, ValueKind};

    use super::SeqTranslator;
    use crate::TranslateError;
    use crate::info::SeqOps;
    use crate::translate::{ScalarTranslator, Translator};

    fn strings<C: crate::info::Sequence>() -> SeqTranslator {
        SeqTranslator::new(SeqOps::of::<C>(), Arc::new(ScalarTranslator::<String>::new()))
    }

    #[test]
    fn list_of_strings() {
        let translator = strings::<Vec<String>>();
        assert_eq!(translator.external_name(), "list<string>");

        let data = vec![String::from("a"), String::from("b")];
        let value = translator.to_value(&data).unwrap();
        assert_eq!(value, Value::from(vec![Value::from("a"), Value::from("b")]));

        let back = translator.from_value(&value).unwrap();
        assert_eq!(*back.downcast::<Vec<String>>().unwrap(), data);
    }

    #[test]
    fn empty_collection() {
        let translator = strings::<VecDeque<String>>();
        let value = translator.to_value(&VecDeque::<String>::new()).unwrap();
        assert_eq!(value, Value::Array(Vec::new()));
        let back = translator.from_value(&value).unwrap();
        assert!(back.downcast::<VecDeque<String>>().unwrap().is_empty());
    }

    #[test]
    fn array_name_and_length() {
        let translator = strings::<[String; 2]>();
        assert_eq!(translator.external_name(), "string[]");
        assert!(matches!(
            translator.from_value(&Value::from(vec![Value::from("a")])),
            Err(TranslateError::LengthMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn nullable_elements() {
        let translator = SeqTranslator::new(
            SeqOps::of::<Vec<Option<String>>>(),
            Arc::new(ScalarTranslator::<String>::new()),
        );
        let data = vec![None, Some(String::from("x"))];
        let value = translator.to_value(&data).unwrap();
        assert_eq!(value, Value::from(vec![Value::Null, Value::from("x")]));
        let back = translator.from_value(&value).unwrap();
        assert_eq!(*back.downcast::<Vec<Option<String>>>().unwrap(), data);

        // a non-nullable element rejects null
        let error = strings::<Vec<String>>().from_value(&value).unwrap_err();
        assert!(matches!(error, TranslateError::InElement { index: 0, .. }));
    }

    #[test]
    fn bad_element_reports_index() {
        let value = Value::from(vec![Value::from("a"), Value::from(2)]);
        let error = strings::<Vec<String>>().from_value(&value).unwrap_err();
        match error {
            TranslateError::InElement { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(
                    *source,
                    TranslateError::Mismatch { found: ValueKind::Number, .. }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(strings::<Vec<String>>().from_value(&Value::from("a")).is_err());
    }
}
