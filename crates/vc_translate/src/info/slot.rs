use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;

use crate::TranslateError;
use crate::info::TypeDesc;

// -----------------------------------------------------------------------------
// Instance

/// An owned, type-erased host value.
///
/// Translators produce instances when reading values, and the data sites of
/// fields consume them.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Unboxes an instance of exactly type `T`.
///
/// `None` (a null slot) fails with [`TranslateError::UnexpectedNull`].
pub fn fill_exact<T: Any>(value: Option<Instance>) -> Result<T, TranslateError> {
    let value = value.ok_or(TranslateError::UnexpectedNull {
        expected: core::any::type_name::<T>(),
    })?;
    match value.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(TranslateError::WrongType {
            expected: core::any::type_name::<T>(),
        }),
    }
}

// -----------------------------------------------------------------------------
// Slot

/// A type that can be stored in a field, element or map entry.
///
/// A slot exposes its runtime payload for writing and rebuilds itself from a
/// translated instance. Nullable wrappers such as [`Option`] report `None`;
/// polymorphic enums report the payload of their active variant so the
/// runtime type can be matched against the declared alternatives.
///
/// Use [`impl_slot!`](crate::impl_slot) for plain types.
pub trait Slot: Send + Sync + Sized + 'static {
    /// The current payload, or `None` for null.
    fn peek(&self) -> Option<&dyn Any>;

    /// Rebuilds the slot from a translated instance, or from null.
    fn fill(value: Option<Instance>) -> Result<Self, TranslateError>;
}

/// A slot that knows its own [`TypeDesc`].
pub trait Describe: Slot {
    fn type_desc() -> TypeDesc;
}

/// Implements [`Slot`] and [`Describe`] for plain types.
///
/// The type is described by its own [`TypeId`](core::any::TypeId) and never null.
///
/// # Examples
///
/// ```
/// use vc_translate::info::{Describe, Slot, TypeDesc};
///
/// #[derive(Default)]
/// struct Meters(f64);
///
/// vc_translate::impl_slot!(Meters);
///
/// assert_eq!(Meters::type_desc(), TypeDesc::of::<Meters>());
/// assert!(Meters(1.0).peek().is_some());
/// ```
#[macro_export]
macro_rules! impl_slot {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::info::Slot for $ty {
                #[inline]
                fn peek(&self) -> ::core::option::Option<&dyn ::core::any::Any> {
                    ::core::option::Option::Some(self)
                }

                #[inline]
                fn fill(
                    value: ::core::option::Option<$crate::info::Instance>,
                ) -> ::core::result::Result<Self, $crate::TranslateError> {
                    $crate::info::fill_exact::<Self>(value)
                }
            }

            impl $crate::info::Describe for $ty {
                #[inline]
                fn type_desc() -> $crate::info::TypeDesc {
                    $crate::info::TypeDesc::of::<Self>()
                }
            }
        )+
    };
}

crate::impl_slot!(
    bool, char, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String,
);

#[cfg(feature = "chrono")]
crate::impl_slot!(chrono::DateTime<chrono::Utc>, chrono::NaiveDate);

#[cfg(feature = "uuid")]
crate::impl_slot!(uuid::Uuid);

impl Slot for () {
    #[inline]
    fn peek(&self) -> Option<&dyn Any> {
        Some(self)
    }

    /// A void slot has nothing to restore, so null is accepted.
    fn fill(value: Option<Instance>) -> Result<Self, TranslateError> {
        match value {
            None => Ok(()),
            some => fill_exact(some),
        }
    }
}

impl Describe for () {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::of::<()>()
    }
}

impl<T: Slot> Slot for Option<T> {
    #[inline]
    fn peek(&self) -> Option<&dyn Any> {
        self.as_ref().and_then(T::peek)
    }

    fn fill(value: Option<Instance>) -> Result<Self, TranslateError> {
        match value {
            None => Ok(None),
            some => T::fill(some).map(Some),
        }
    }
}

impl<T: Describe> Describe for Option<T> {
    #[inline]
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }
}

impl<T: Slot> Slot for Box<T> {
    #[inline]
    fn peek(&self) -> Option<&dyn Any> {
        T::peek(self)
    }

    #[inline]
    fn fill(value: Option<Instance>) -> Result<Self, TranslateError> {
        T::fill(value).map(Box::new)
    }
}

impl<T: Describe> Describe for Box<T> {
    #[inline]
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }
}

// -----------------------------------------------------------------------------
// Tests
