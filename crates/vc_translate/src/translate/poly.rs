use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use vc_value::{Object, Value};

use crate::info::Instance;
use crate::translate::{Translator, TranslatorRef};
use crate::{ResolveError, TranslateError};

/// Member name of the type tag of a polymorphic value.
pub const TYPE_TAG: &str = "value_type";
/// Member name of the payload of a polymorphic value.
pub const PAYLOAD: &str = "value";

struct Alternative {
    id: TypeId,
    name: String,
    translator: TranslatorRef,
}

/// Translates a value whose runtime type is one of several declared alternatives.
///
/// The wire shape is `{"value_type": "<external name>", "value": <payload>}`.
/// Outbound, the alternative is chosen by the runtime type of the data;
/// inbound, by the tag.
pub struct PolyTranslator {
    alternatives: Vec<Alternative>,
}

impl PolyTranslator {
    /// Builds a translator over `(type id, translator)` alternatives.
    ///
    /// Fails when two alternatives share an external name, since the tag
    /// could not tell them apart.
    pub fn new(
        alternatives: impl IntoIterator<Item = (TypeId, TranslatorRef)>,
    ) -> Result<Self, ResolveError> {
        let mut built: Vec<Alternative> = Vec::new();
        for (id, translator) in alternatives {
            let name = translator.external_name().into_owned();
            if built.iter().any(|a| a.name == name) {
                return Err(ResolveError::AmbiguousAlternative { name });
            }
            built.push(Alternative {
                id,
                name,
                translator,
            });
        }
        Ok(Self {
            alternatives: built,
        })
    }

    /// The tags of the alternatives, in declaration order.
    pub fn tags(&self) -> impl ExactSizeIterator<Item = &str> {
        self.alternatives.iter().map(|a| a.name.as_str())
    }

    fn expected(&self) -> String {
        self.tags().collect::<Vec<_>>().join(", ")
    }
}

impl Translator for PolyTranslator {
    fn external_name(&self) -> Cow<'_, str> {
        Cow::Owned(self.tags().collect::<Vec<_>>().join("|"))
    }

    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError> {
        let found = data.type_id();
        let alternative = self
            .alternatives
            .iter()
            .find(|a| a.id == found)
            .ok_or_else(|| TranslateError::UndeclaredAlternative {
                found,
                expected: self.expected(),
            })?;

        let payload = alternative.translator.to_value(data)?;
        let mut object = Object::with_capacity(2);
        object.insert(TYPE_TAG, Value::from(alternative.name.as_str()));
        object.insert(PAYLOAD, payload);
        Ok(Value::Object(object))
    }

    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        let object = value
            .as_object()
            .ok_or_else(|| TranslateError::mismatch("polymorphic object", value.kind()))?;
        let tag = object.get(TYPE_TAG).ok_or(TranslateError::MissingTypeTag)?;
        let tag = tag
            .as_str()
            .ok_or_else(|| TranslateError::mismatch("string type tag", tag.kind()))?;

        let alternative = self
            .alternatives
            .iter()
            .find(|a| a.name == tag)
            .ok_or_else(|| TranslateError::UnknownTypeTag {
                tag: tag.to_string(),
                expected: self.expected(),
            })?;

        let payload = object.get(PAYLOAD).ok_or(TranslateError::MissingPayload)?;
        alternative.translator.from_value(payload)
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::any::TypeId;

    use vc_value::{Value, from_text};

    use super::PolyTranslator;
    use crate::translate::{ScalarTranslator, Translator, TranslatorRef};
    use crate::{ResolveError, TranslateError};

    fn int_or_text() -> PolyTranslator {
        PolyTranslator::new([
            (TypeId::of::<i32>(), Arc::new(ScalarTranslator::<i32>::new()) as TranslatorRef),
            (TypeId::of::<String>(), Arc::new(ScalarTranslator::<String>::new()) as TranslatorRef),
        ])
        .unwrap()
    }

    #[test]
    fn dispatch_on_runtime_type() {
        let translator = int_or_text();
        assert_eq!(translator.external_name(), "int32|string");

        let value = translator.to_value(&String::from("hi")).unwrap();
        assert_eq!(value, from_text(r#"{"value_type":"string","value":"hi"}"#).unwrap());

        let back = translator.from_value(&value).unwrap();
        assert_eq!(back.downcast_ref::<String>().map(String::as_str), Some("hi"));

        let back = translator
            .from_value(&from_text(r#"{"value":5,"value_type":"int32"}"#).unwrap())
            .unwrap();
        assert_eq!(back.downcast_ref::<i32>(), Some(&5));
    }

    #[test]
    fn undeclared_runtime_type() {
        assert!(matches!(
            int_or_text().to_value(&1.5_f64),
            Err(TranslateError::UndeclaredAlternative { .. })
        ));
    }

    #[test]
    fn tag_errors() {
        let translator = int_or_text();
        let cases = [
            (r#"{"value":1}"#, "missing tag"),
            (r#"{"value_type":"int64","value":1}"#, "unknown tag"),
            (r#"{"value_type":"int32"}"#, "missing payload"),
            (r#"{"value_type":7,"value":1}"#, "non-string tag"),
            (r#"[1]"#, "not an object"),
        ];
        for (text, case) in cases {
            let result = translator.from_value(&from_text(text).unwrap());
            let error = result.err().unwrap_or_else(|| panic!("{case} accepted"));
            let ok = match case {
                "missing tag" => matches!(error, TranslateError::MissingTypeTag),
                "unknown tag" => matches!(error, TranslateError::UnknownTypeTag { .. }),
                "missing payload" => matches!(error, TranslateError::MissingPayload),
                _ => matches!(error, TranslateError::Mismatch { .. }),
            };
            assert!(ok, "{case}: {error}");
        }
        assert!(translator.from_value(&Value::Null).is_err());
    }

    #[test]
    fn ambiguous_names_rejected() {
        let result = PolyTranslator::new([
            (TypeId::of::<i32>(), Arc::new(ScalarTranslator::<i32>::new()) as TranslatorRef),
            (TypeId::of::<u8>(), Arc::new(ScalarTranslator::<i32>::new()) as TranslatorRef),
        ]);
        assert!(matches!(result, Err(ResolveError::AmbiguousAlternative { .. })));
    }
}
