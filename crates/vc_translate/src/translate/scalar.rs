use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use vc_value::{Number, Value};

use crate::TranslateError;
use crate::info::{Describe, Instance, TypeDesc};
use crate::translate::{Translator, TranslatorRef, VoidTranslator};

// -----------------------------------------------------------------------------
// Scalar

/// A type that maps to a single JSON primitive.
///
/// Scalars are pre-registered in every
/// [`TranslatorRegistry`](crate::registry::TranslatorRegistry); custom ones
/// can be added with
/// [`TranslatorRegistry::register_scalar`](crate::registry::TranslatorRegistry::register_scalar).
pub trait Scalar: Describe {
    /// The external type name.
    const NAME: &'static str;

    fn to_value(&self) -> Result<Value, TranslateError>;

    fn from_value(value: &Value) -> Result<Self, TranslateError>;
}

/// The [`Translator`] of a [`Scalar`].
pub struct ScalarTranslator<T>(PhantomData<fn() -> T>);

impl<T> ScalarTranslator<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ScalarTranslator<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Translator for ScalarTranslator<T> {
    #[inline]
    fn external_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(T::NAME)
    }

    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError> {
        let data = data.downcast_ref::<T>().ok_or(TranslateError::WrongType {
            expected: core::any::type_name::<T>(),
        })?;
        T::to_value(data)
    }

    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError> {
        T::from_value(value).map(|v| Box::new(v) as Instance)
    }
}

/// Every built-in scalar, plus void.
pub(crate) fn builtin_scalars() -> Vec<(TypeDesc, TranslatorRef)> {
    fn entry<T: Scalar>() -> (TypeDesc, TranslatorRef) {
        (T::type_desc(), Arc::new(ScalarTranslator::<T>::new()))
    }

    let mut scalars = Vec::new();
    scalars.extend([
        entry::<i8>(),
        entry::<i16>(),
        entry::<i32>(),
        entry::<i64>(),
        entry::<u8>(),
        entry::<u16>(),
        entry::<u32>(),
        entry::<u64>(),
        entry::<f32>(),
        entry::<f64>(),
        entry::<bool>(),
        entry::<char>(),
        entry::<String>(),
        (TypeDesc::of::<()>(), Arc::new(VoidTranslator) as TranslatorRef),
    ]);

    #[cfg(feature = "chrono")]
    scalars.extend([
        entry::<chrono::DateTime<chrono::Utc>>(),
        entry::<chrono::NaiveDate>(),
    ]);

    #[cfg(feature = "uuid")]
    scalars.push(entry::<uuid::Uuid>());

    scalars
}

// -----------------------------------------------------------------------------
// Helpers

#[inline]
fn expect_number(value: &Value) -> Result<&Number, TranslateError> {
    value
        .as_number()
        .ok_or_else(|| TranslateError::mismatch("number", value.kind()))
}

#[inline]
fn expect_str(value: &Value) -> Result<&str, TranslateError> {
    value
        .as_str()
        .ok_or_else(|| TranslateError::mismatch("string", value.kind()))
}

#[inline]
fn out_of_range(number: &Number, target: &'static str) -> TranslateError {
    TranslateError::OutOfRange {
        value: number.to_string(),
        target,
    }
}

#[inline]
fn finite(value: f64, target: &'static str) -> Result<Value, TranslateError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| TranslateError::NonFinite {
            value: value.to_string(),
            target,
        })
}

// -----------------------------------------------------------------------------
// Numbers

macro_rules! impl_signed {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Scalar for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn to_value(&self) -> Result<Value, TranslateError> {
                Ok(Value::from(*self))
            }

            fn from_value(value: &Value) -> Result<Self, TranslateError> {
                let number = expect_number(value)?;
                number
                    .as_i64()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| out_of_range(number, $name))
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Scalar for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn to_value(&self) -> Result<Value, TranslateError> {
                Ok(Value::from(*self))
            }

            fn from_value(value: &Value) -> Result<Self, TranslateError> {
                let number = expect_number(value)?;
                number
                    .as_u64()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| out_of_range(number, $name))
            }
        }
    )*};
}

impl_signed!(i8 => "int8", i16 => "int16", i32 => "int32", i64 => "int64");
impl_unsigned!(u8 => "uint8", u16 => "uint16", u32 => "uint32", u64 => "uint64");

impl Scalar for f64 {
    const NAME: &'static str = "double";

    /// NaN and the infinities have no JSON form and fail.
    #[inline]
    fn to_value(&self) -> Result<Value, TranslateError> {
        finite(*self, Self::NAME)
    }

    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let number = expect_number(value)?;
        number
            .as_f64()
            .ok_or_else(|| out_of_range(number, Self::NAME))
    }
}

impl Scalar for f32 {
    const NAME: &'static str = "float";

    #[inline]
    fn to_value(&self) -> Result<Value, TranslateError> {
        finite(f64::from(*self), Self::NAME)
    }

    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let number = expect_number(value)?;
        let wide = number
            .as_f64()
            .ok_or_else(|| out_of_range(number, Self::NAME))?;
        if wide.abs() > f64::from(f32::MAX) {
            return Err(out_of_range(number, Self::NAME));
        }
        #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
        let narrow = wide as f32;
        Ok(narrow)
    }
}

// -----------------------------------------------------------------------------
// Text and logic

impl Scalar for bool {
    const NAME: &'static str = "boolean";

    #[inline]
    fn to_value(&self) -> Result<Value, TranslateError> {
        Ok(Value::Bool(*self))
    }

    #[inline]
    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        value
            .as_bool()
            .ok_or_else(|| TranslateError::mismatch("boolean", value.kind()))
    }
}

impl Scalar for String {
    const NAME: &'static str = "string";

    #[inline]
    fn to_value(&self) -> Result<Value, TranslateError> {
        Ok(Value::String(self.clone()))
    }

    #[inline]
    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        expect_str(value).map(String::from)
    }
}

impl Scalar for char {
    const NAME: &'static str = "char";

    #[inline]
    fn to_value(&self) -> Result<Value, TranslateError> {
        Ok(Value::String(self.to_string()))
    }

    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let text = expect_str(value)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(TranslateError::InvalidText {
                target: Self::NAME,
                text: String::from(text),
                reason: String::from("expected exactly one character"),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Time and identifiers

#[cfg(feature = "chrono")]
impl Scalar for chrono::DateTime<chrono::Utc> {
    const NAME: &'static str = "datetime";

    /// RFC 3339 with as many fractional digits as needed.
    fn to_value(&self) -> Result<Value, TranslateError> {
        Ok(Value::String(
            self.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
        ))
    }

    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let text = expect_str(value)?;
        chrono::DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&chrono::Utc))
            .map_err(|e| TranslateError::InvalidText {
                target: Self::NAME,
                text: String::from(text),
                reason: e.to_string(),
            })
    }
}

#[cfg(feature = "chrono")]
impl Scalar for chrono::NaiveDate {
    const NAME: &'static str = "date";

    fn to_value(&self) -> Result<Value, TranslateError> {
        Ok(Value::String(self.format("%Y-%m-%d").to_string()))
    }

    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let text = expect_str(value)?;
        chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
            TranslateError::InvalidText {
                target: Self::NAME,
                text: String::from(text),
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(feature = "uuid")]
impl Scalar for uuid::Uuid {
    const NAME: &'static str = "uuid";

    fn to_value(&self) -> Result<Value, TranslateError> {
        Ok(Value::String(self.hyphenated().to_string()))
    }

    fn from_value(value: &Value) -> Result<Self, TranslateError> {
        let text = expect_str(value)?;
        uuid::Uuid::parse_str(text).map_err(|e| TranslateError::InvalidText {
            target: Self::NAME,
            text: String::from(text),
            reason: e.to_string(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use vc_value::{Number, Value, ValueKind};

    use super::{Scalar, ScalarTranslator, builtin_scalars};
    use crate::TranslateError;
    use crate::translate::Translator;

    #[test]
    fn names_are_unique() {
        let scalars = builtin_scalars();
        let mut names: Vec<String> = scalars
            .iter()
            .map(|(_, t)| t.external_name().into_owned())
            .collect();
        names.sort();
        let count = names.len();
        names.dedup();
        assert_eq!(names.len(), count);
        assert!(names.iter().any(|n| n == "int32"));
        assert!(names.iter().any(|n| n == "void"));
    }

    #[test]
    fn integer_round_trip() {
        let translator = ScalarTranslator::<i32>::new();
        let value = translator.to_value(&42_i32).unwrap();
        assert_eq!(value, Value::from(42));
        let back = translator.from_value(&value).unwrap();
        assert_eq!(back.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn integer_range_is_checked() {
        assert_eq!(u8::from_value(&Value::from(255)).unwrap(), 255);
        assert!(matches!(
            u8::from_value(&Value::from(256)),
            Err(TranslateError::OutOfRange { target: "uint8", .. })
        ));
        assert!(matches!(
            u32::from_value(&Value::from(-1)),
            Err(TranslateError::OutOfRange { .. })
        ));
        assert_eq!(i64::from_value(&Value::from(i64::MIN)).unwrap(), i64::MIN);
        assert!(i64::from_value(&Value::from(u64::MAX)).is_err());
    }

    #[test]
    fn integral_float_accepted() {
        let value = Value::Number(Number::from_f64(7.0).unwrap());
        assert_eq!(i16::from_value(&value).unwrap(), 7);

        let value = Value::Number(Number::from_f64(7.5).unwrap());
        assert!(i16::from_value(&value).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(f64::from_value(&Value::from(3)).unwrap(), 3.0);
        assert_eq!(f32::from_value(&Value::from(0.5)).unwrap(), 0.5);
        assert!(f32::from_value(&Value::from(1e300)).is_err());

        let huge = Value::Number("1e400".parse().unwrap());
        assert!(matches!(
            f64::from_value(&huge),
            Err(TranslateError::OutOfRange { target: "double", .. })
        ));
    }

    #[test]
    fn non_finite_floats_fail() {
        assert!(matches!(
            f64::NAN.to_value(),
            Err(TranslateError::NonFinite { target: "double", .. })
        ));
        assert!(matches!(
            f32::NEG_INFINITY.to_value(),
            Err(TranslateError::NonFinite { target: "float", .. })
        ));

        let translator = ScalarTranslator::<f64>::new();
        let error = translator.to_value(&f64::INFINITY).unwrap_err();
        assert_eq!(error.to_string(), "inf has no JSON representation as `double`");
        assert_eq!(2.5_f64.to_value().unwrap(), Value::from(2.5));
    }

    #[test]
    fn kind_mismatch() {
        match bool::from_value(&Value::from("true")) {
            Err(TranslateError::Mismatch { found, .. }) => assert_eq!(found, ValueKind::String),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(String::from_value(&Value::from(1)).is_err());
    }

    #[test]
    fn char_needs_one_character() {
        assert_eq!(char::from_value(&Value::from("é")).unwrap(), 'é');
        assert!(char::from_value(&Value::from("ab")).is_err());
        assert!(char::from_value(&Value::from("")).is_err());
    }

    #[test]
    fn wrong_runtime_type() {
        let translator = ScalarTranslator::<i32>::new();
        assert!(matches!(
            translator.to_value(&1_i64),
            Err(TranslateError::WrongType { .. })
        ));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn datetime_and_date() {
        use chrono::{NaiveDate, TimeZone, Utc};

        let at = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
        let value = at.to_value().unwrap();
        assert_eq!(value, Value::from("2024-02-29T12:30:00Z"));
        assert_eq!(<chrono::DateTime<Utc>>::from_value(&value).unwrap(), at);

        let offset = Value::from("2024-02-29T14:30:00+02:00");
        assert_eq!(<chrono::DateTime<Utc>>::from_value(&offset).unwrap(), at);

        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day.to_value().unwrap(), Value::from("2024-02-29"));
        assert!(NaiveDate::from_value(&Value::from("2023-02-29")).is_err());
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn uuid_text() {
        let id = uuid::Uuid::new_v4();
        let value = id.to_value().unwrap();
        assert_eq!(uuid::Uuid::from_value(&value).unwrap(), id);
        assert!(matches!(
            uuid::Uuid::from_value(&Value::from("not-a-uuid")),
            Err(TranslateError::InvalidText { target: "uuid", .. })
        ));
    }
}
