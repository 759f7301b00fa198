use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;

use vc_value::Value;

use crate::TranslateError;
use crate::info::Instance;
use crate::source::EnumShape;
use crate::translate::Translator;

/// Translates a symbolic enum as its symbol string.
#[derive(Debug, Clone)]
pub struct EnumTranslator {
    shape: Arc<EnumShape>,
}

impl EnumTranslator {
    #[inline]
    pub const fn new(shape: Arc<EnumShape>) -> Self {
        Self { shape }
    }

    #[inline]
    pub fn shape(&self) -> &EnumShape {
        &self.shape
    }
}

impl Translator for EnumTranslator {
    #[inline]
    fn external_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.shape.name())
    }

    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError> {
        match self.shape.symbol_of(data) {
            Some(symbol) => Ok(Value::from(symbol)),
            None => Err(TranslateError::WrongType { expected: "enum" }),
        }
    }

    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        let symbol = value
            .as_str()
            .ok_or_else(|| TranslateError::mismatch("string", value.kind()))?;
        self.shape
            .instance_of(symbol)
            .ok_or_else(|| TranslateError::UnknownSymbol {
                enum_name: String::from(self.shape.name()),
                symbol: String::from(symbol),
            })
    }
}
