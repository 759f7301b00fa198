//! The shared translator cache and the builder that fills it.
//!
//! ## Menu
//!
//! - [`TranslatorRegistry`]: a thread-safe map from [`TypeDesc`] to translator,
//!   pre-populated with the scalar set.
//! - [`Resolver`]: one resolution session. It builds every translator a
//!   descriptor needs in a private pending table and publishes the whole
//!   batch only if the build succeeds.
//!
//! ## Cycles
//!
//! An object type map is placed in the pending table *before* its fields are
//! resolved, so a field that refers back to the type (directly, or through
//! any number of other object types) resolves to the map under construction.
//! Only the session that built it can see that map until it is published,
//! and a failed session publishes nothing.
//!
//! ## Concurrency
//!
//! Publication is first-wins: if two sessions build the same descriptor
//! concurrently, the first published translator is kept and returned to
//! both. The losing translator is still complete and correct, so any
//! translator that already captured it keeps working.
//!
//! [`TypeDesc`]: crate::info::TypeDesc

// -----------------------------------------------------------------------------
// Modules

mod resolver;
mod translator_registry;

// -----------------------------------------------------------------------------
// Exports

pub use resolver::Resolver;
pub use translator_registry::TranslatorRegistry;
