//! Translators: the per-type conversion between host data and [`Value`]s.
//!
//! Every translator converts in both directions. Nullness is handled one
//! level up, by the slot that holds the data: a null slot always renders as
//! [`Value::Null`] and a [`Value::Null`] always fills a slot with null, so
//! individual translators only ever see real payloads.

// -----------------------------------------------------------------------------
// Modules

mod enums;
mod map;
mod object;
mod poly;
mod scalar;
mod seq;
mod void;

// -----------------------------------------------------------------------------
// Exports

pub use enums::EnumTranslator;
pub use map::{KEY, MapTranslator, VALUE};
pub use object::{MemberMap, TypeMap};
pub use poly::{PAYLOAD, PolyTranslator, TYPE_TAG};
pub use scalar::{Scalar, ScalarTranslator};
pub use seq::SeqTranslator;
pub use void::VoidTranslator;

pub(crate) use scalar::builtin_scalars;

use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use vc_value::Value;

use crate::TranslateError;
use crate::info::Instance;

// -----------------------------------------------------------------------------
// Translator

/// Converts one type of host data to and from [`Value`]s.
///
/// Translators are immutable once built and shared between threads.
pub trait Translator: Any + Send + Sync {
    /// The name the type is known by on the wire, e.g. as a polymorphic tag.
    fn external_name(&self) -> Cow<'_, str>;

    /// Renders a non-null payload.
    fn to_value(&self, data: &dyn Any) -> Result<Value, TranslateError>;

    /// Builds a payload from a non-null value.
    fn from_value(&self, value: &Value) -> Result<Instance, TranslateError>;
}

impl dyn Translator {
    /// The object type map behind this translator, if it is one.
    #[inline]
    pub fn as_type_map(&self) -> Option<&TypeMap> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }
}

impl fmt::Debug for dyn Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Translator").field(&self.external_name()).finish()
    }
}

/// A shared translator.
pub type TranslatorRef = Arc<dyn Translator>;

/// Renders the payload of a slot, `None` as null.
#[inline]
pub(crate) fn encode_slot(
    translator: &dyn Translator,
    data: Option<&dyn Any>,
) -> Result<Value, TranslateError> {
    match data {
        Some(data) => translator.to_value(data),
        None => Ok(Value::Null),
    }
}

/// Builds the payload of a slot, null as `None`.
#[inline]
pub(crate) fn decode_slot(
    translator: &dyn Translator,
    value: &Value,
) -> Result<Option<Instance>, TranslateError> {
    match value {
        Value::Null => Ok(None),
        value => translator.from_value(value).map(Some),
    }
}
