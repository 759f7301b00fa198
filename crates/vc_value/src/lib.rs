//! A generic, tree-shaped JSON value model and its text codec.
//!
//! Every translator in `vc_translate` produces and consumes [`Value`];
//! nothing downstream may assume a richer host type.
//!
//! - [`Value`]: the closed sum of null, boolean, number, string, array and object.
//! - [`Number`]: an arbitrary-precision number that keeps its literal digits.
//! - [`Object`]: an insertion-ordered string-keyed map.
//! - [`to_text`] / [`from_text`]: literal JSON text, rendered at a [`Readability`].

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod de;
mod number;
mod object;
mod ser;
mod text;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use number::Number;
pub use object::Object;
pub use text::{Readability, TextError, from_text, to_text};
pub use value::{Value, ValueKind};
