//! Naming policies for external type names and member names.
//!
//! A policy is any [`NameValidator`]; plain closures `Fn(&str) -> bool`
//! qualify. Names are checked once, when a type map is built, so a rejected
//! name aborts registration of the whole type.

use core::fmt;

// -----------------------------------------------------------------------------
// NameValidator

/// Decides whether an external name is acceptable.
///
/// # Examples
///
/// ```
/// use vc_translate::naming::{Identifier, NameValidator};
///
/// assert!(Identifier.is_valid("first_name"));
/// assert!(!Identifier.is_valid("first name"));
///
/// let short = |name: &str| name.len() <= 4;
/// assert!(short.is_valid("abcd"));
/// assert!(!short.is_valid("abcde"));
/// ```
pub trait NameValidator: Send + Sync {
    fn is_valid(&self, name: &str) -> bool;
}

impl<F> NameValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    #[inline]
    fn is_valid(&self, name: &str) -> bool {
        self(name)
    }
}

impl fmt::Debug for dyn NameValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameValidator")
    }
}

// -----------------------------------------------------------------------------
// Built-in policies

/// Accepts any non-empty name. The default policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmpty;

impl NameValidator for NonEmpty {
    #[inline]
    fn is_valid(&self, name: &str) -> bool {
        !name.is_empty()
    }
}

/// Accepts ASCII identifiers: a letter or `_`, then letters, digits or `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identifier;

impl NameValidator for Identifier {
    fn is_valid(&self, name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

/// Accepts `snake_case` names: lowercase ASCII words joined by single underscores.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

impl NameValidator for SnakeCase {
    fn is_valid(&self, name: &str) -> bool {
        !name.is_empty()
            && name.split('_').all(|word| {
                word.starts_with(|c: char| c.is_ascii_lowercase())
                    && word.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            })
    }
}

// -----------------------------------------------------------------------------
// Tests
