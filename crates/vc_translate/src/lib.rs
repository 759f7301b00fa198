//! Reflective, bidirectional translation between native objects and [`Value`] trees.
//!
//! A type source describes the serializable shape of host types (fields,
//! declared value types, container kinds); the [`Engine`] turns those
//! descriptions into a cached graph of [`Translator`]s and uses it to convert
//! instances to values and back.
//!
//! ## Menu
//!
//! - [`info`]: descriptors. [`TypeDesc`](info::TypeDesc) is the cache identity of a
//!   type, [`FieldDesc`](info::FieldDesc) one field, [`Slot`](info::Slot) the
//!   data-site capability every storable type provides.
//! - [`source`]: the [`TypeSource`](source::TypeSource) interface and the default
//!   manual registration table [`TypeTable`](source::TypeTable).
//! - [`naming`]: pluggable type-name and member-name policies.
//! - [`translate`]: the [`Translator`] capability, the scalar set and the
//!   composite translators (sequence, map, polymorphic, object).
//! - [`registry`]: the shared translator cache and the cycle-safe builder.
//! - [`Engine`]: the public entry surface.
//!
//! ## Wire shapes
//!
//! - scalars render as JSON primitives, enums as their symbol string;
//! - arrays and collections render as JSON arrays;
//! - maps render as `[{"key": K, "value": V}, ...]`, keys need not be strings;
//! - polymorphic values render as `{"value_type": "<name>", "value": <payload>}`;
//! - a declared-void slot renders as `{}` and never accepts data.
//!
//! # Examples
//!
//! ```
//! use vc_translate::prelude::*;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! vc_translate::impl_slot!(Point);
//!
//! impl GetTypeShape for Point {
//!     fn type_shape() -> TypeShape {
//!         ObjectShape::builder::<Self>("Point")
//!             .field("x", |p| &p.x, |p| &mut p.x)
//!             .field("y", |p| &p.y, |p| &mut p.y)
//!             .build()
//!             .into()
//!     }
//! }
//!
//! let mut table = TypeTable::new();
//! table.register::<Point>();
//!
//! let engine = Engine::new(table);
//! let text = engine.encode_text(&Point { x: 1, y: -2 }, Readability::Compact).unwrap();
//! assert_eq!(text, r#"{"x":1,"y":-2}"#);
//!
//! let point: Point = engine.decode_text(&text).unwrap();
//! assert_eq!(point, Point { x: 1, y: -2 });
//! ```
//!
//! [`Value`]: vc_value::Value

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod engine;
mod error;
mod hash;

pub mod info;
pub mod naming;
pub mod registry;
pub mod source;
pub mod translate;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use config::{EngineConfig, UnknownMembers};
pub use engine::Engine;
pub use error::{Error, ResolveError, TranslateError};
pub use info::Instance;
pub use translate::{Translator, TranslatorRef};

pub use vc_value::{Readability, Value};

/// Commonly used items.
pub mod prelude {
    pub use crate::info::{Describe, FieldDesc, Instance, Slot, TypeDesc};
    pub use crate::source::{EnumShape, GetTypeShape, ObjectShape, Symbolic, TypeShape, TypeTable};
    pub use crate::{Engine, EngineConfig, Error, Translator, UnknownMembers};
    pub use vc_value::{Object, Readability, Value};
}
