//! Where type shapes come from.
//!
//! The engine never inspects host types on its own; it asks a
//! [`TypeSource`] for the [`TypeShape`] of every non-scalar type it meets.
//! [`TypeTable`] is the default source, filled by explicit registration or,
//! with the `auto_register` feature, by [`auto_register!`](crate::auto_register).

// -----------------------------------------------------------------------------
// Modules

mod shape;
mod table;

#[cfg(feature = "auto_register")]
mod auto_register;

// -----------------------------------------------------------------------------
// Exports

pub use shape::{EnumShape, ObjectShape, ObjectShapeBuilder, Symbolic, TypeShape};
pub use table::{GetTypeShape, TypeTable};

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;

use alloc::sync::Arc;

use crate::info::TypeDesc;

// -----------------------------------------------------------------------------
// TypeSource

/// A provider of type shapes.
///
/// Must be safe to query from several threads at once.
pub trait TypeSource: Send + Sync {
    /// The shape of `desc`, or `None` if the source does not describe it.
    fn shape_of(&self, desc: &TypeDesc) -> Option<TypeShape>;
}

impl<T: TypeSource + ?Sized> TypeSource for Arc<T> {
    #[inline]
    fn shape_of(&self, desc: &TypeDesc) -> Option<TypeShape> {
        T::shape_of(self, desc)
    }
}
