//! Bidirectional translation between native objects and JSON values.
//!
//! - [`value`]: the JSON value model and its text codec.
//! - [`translate`]: type descriptors, the type source, translators and the
//!   [`Engine`](translate::Engine) facade.
//!
//! # Examples
//!
//! ```
//! use vc_json::prelude::*;
//!
//! let engine = Engine::new(TypeTable::new());
//! let value = engine.encode(&vec![1_u8, 2, 3]).unwrap();
//! assert_eq!(engine.decode::<Vec<u8>>(&value).unwrap(), [1, 2, 3]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_translate as translate;
pub use vc_value as value;

/// Commonly used items of both member crates.
pub mod prelude {
    pub use vc_translate::prelude::*;
}
