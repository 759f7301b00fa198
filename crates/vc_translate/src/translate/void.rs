use alloc::borrow::Cow;
use core::any::Any;

use vc_value::{Object, Value};

use crate::TranslateError;
use crate::info::Instance;
use crate::translate::Translator;

/// The translator of a declared-void slot, `()`.
///
/// A void slot carries no data: it renders as an empty object and rejects
/// every non-null inbound value, including an empty object.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidTranslator;

impl Translator for VoidTranslator {
    #[inline]
    fn external_name(&self) -> Cow<'_, str> {
        Cow::Borrowed("void")
    }

    #[inline]
    fn to_value(&self, _data: &dyn Any) -> Result<Value, TranslateError> {
        Ok(Value::Object(Object::new()))
    }

    #[inline]
    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        Err(TranslateError::VoidPayload { found: value.kind() })
    }
}
