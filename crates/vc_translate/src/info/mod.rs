//! Descriptors of translatable types and their fields.
//!
//! - [`TypeDesc`]: cache identity of a type, including its generic arguments.
//! - [`Slot`] / [`Describe`]: the data-site capability of a storable type.
//! - [`Sequence`] / [`Associative`]: container capabilities, erased into
//!   [`SeqOps`] / [`MapOps`].
//! - [`FieldDesc`]: one serializable field of an object type.

// -----------------------------------------------------------------------------
// Modules

mod container;
mod desc;
mod field;
mod slot;

// -----------------------------------------------------------------------------
// Exports

pub use container::{Associative, CollectionKind, MapOps, SeqKind, SeqOps, Sequence};
pub use desc::{Form, TypeDesc};
pub use field::{Container, DataSite, FieldDesc};
pub use slot::{Describe, Instance, Slot, fill_exact};
