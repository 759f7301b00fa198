use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::any::TypeId;

use thiserror::Error;
use vc_value::{TextError, ValueKind};

use crate::info::{CollectionKind, SeqKind};

// -----------------------------------------------------------------------------
// ResolveError

/// A static configuration defect found while building translators.
///
/// These are raised once per type, at build time, and should abort
/// registration rather than be retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("no translator can be resolved for type `{type_path}`")]
    Unresolvable { type_path: &'static str },

    #[error("type source describes `{shape_path}` for type `{type_path}`")]
    ShapeMismatch {
        type_path: &'static str,
        shape_path: &'static str,
    },

    #[error("external name `{name}` of type `{type_path}` is rejected by the type-name policy")]
    InvalidTypeName {
        type_path: &'static str,
        name: String,
    },

    #[error("member name `{name}` is rejected by the member-name policy")]
    InvalidMemberName { name: String },

    #[error("member `{name}` is declared more than once")]
    DuplicateMember { name: String },

    #[error("field is declared on `{declared}` but its data site belongs to `{actual}`")]
    ForeignField {
        declared: &'static str,
        actual: &'static str,
    },

    #[error("field declares no value type")]
    EmptyValueTypes,

    #[error("map field declares no key type")]
    EmptyKeyTypes,

    #[error("two alternatives share the external name `{name}`")]
    AmbiguousAlternative { name: String },

    #[error("declared container `{declared}` has no default matching `{actual}`")]
    UnsupportedContainer {
        declared: CollectionKind,
        actual: SeqKind,
    },

    #[error("in `{type_name}.{field}`: {source}")]
    InField {
        type_name: String,
        field: String,
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Attaches the offending type and field name.
    #[inline]
    pub fn in_field(self, type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InField {
            type_name: type_name.into(),
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field context.
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            Self::InField { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// -----------------------------------------------------------------------------
// TranslateError

/// A per-call translation failure.
///
/// Failures abort the whole translation; no partial instance or value is
/// produced. Failures inside a member or element are wrapped with
/// [`InMember`](Self::InMember) / [`InElement`](Self::InElement) so the
/// message shows the path to the offending value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslateError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: Cow<'static, str>,
        found: ValueKind,
    },

    #[error("unexpected null for `{expected}`")]
    UnexpectedNull { expected: &'static str },

    #[error("number {value} cannot be represented as `{target}`")]
    OutOfRange { value: String, target: &'static str },

    #[error("{value} has no JSON representation as `{target}`")]
    NonFinite { value: String, target: &'static str },

    #[error("invalid {target} text `{text}`: {reason}")]
    InvalidText {
        target: &'static str,
        text: String,
        reason: String,
    },

    #[error("`{symbol}` is not a symbol of enum `{enum_name}`")]
    UnknownSymbol { enum_name: String, symbol: String },

    #[error("map entry has no `key` member")]
    MissingMapKey,

    #[error("map entry has no `value` member")]
    MissingMapValue,

    #[error("polymorphic value has no `value_type` member")]
    MissingTypeTag,

    #[error("`value_type` `{tag}` is not one of the declared alternatives [{expected}]")]
    UnknownTypeTag { tag: String, expected: String },

    #[error("polymorphic value has no `value` member")]
    MissingPayload,

    #[error("runtime type {found:?} is not one of the declared alternatives [{expected}]")]
    UndeclaredAlternative { found: TypeId, expected: String },

    #[error("a declared-void slot cannot receive data (found {found})")]
    VoidPayload { found: ValueKind },

    #[error("`{name}` is not a member of `{type_name}`")]
    UnknownMember { type_name: String, name: String },

    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("value is not a `{expected}`")]
    WrongType { expected: &'static str },

    #[error("type map `{type_name}` is not complete")]
    Incomplete { type_name: String },

    #[error("validation of `{type_name}` failed: {reason}")]
    Validation { type_name: String, reason: String },

    #[error("`{type_name}.{member}`: {source}")]
    InMember {
        type_name: String,
        member: String,
        source: Box<TranslateError>,
    },

    #[error("[{index}]: {source}")]
    InElement {
        index: usize,
        source: Box<TranslateError>,
    },
}

impl TranslateError {
    /// Creates a [`Mismatch`](Self::Mismatch) error.
    #[inline]
    pub fn mismatch(expected: impl Into<Cow<'static, str>>, found: ValueKind) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            found,
        }
    }

    /// Attaches the containing type and member name.
    #[inline]
    pub fn in_member(self, type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self::InMember {
            type_name: type_name.into(),
            member: member.into(),
            source: Box::new(self),
        }
    }

    /// Attaches the element index inside an array, collection or map.
    #[inline]
    pub fn in_element(self, index: usize) -> Self {
        Self::InElement {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping member and element context.
    pub fn root_cause(&self) -> &TranslateError {
        match self {
            Self::InMember { source, .. } | Self::InElement { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// -----------------------------------------------------------------------------
// Error

/// Any failure surfaced by the [`Engine`](crate::Engine) facade.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Text(#[from] TextError),
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ResolveError, TranslateError};
    use vc_value::ValueKind;

    #[test]
    fn nested_context_renders_path() {
        let error = TranslateError::mismatch("number", ValueKind::String)
            .in_element(2)
            .in_member("Line", "points")
            .in_member("Drawing", "lines");

        assert_eq!(
            error.to_string(),
            "`Drawing.lines`: `Line.points`: [2]: expected number, found string",
        );
        assert!(matches!(
            error.root_cause(),
            TranslateError::Mismatch { found: ValueKind::String, .. }
        ));
    }

    #[test]
    fn resolve_root_cause() {
        let error = ResolveError::EmptyValueTypes.in_field("Foo", "bar");
        assert_eq!(error.to_string(), "in `Foo.bar`: field declares no value type");
        assert!(matches!(error.root_cause(), ResolveError::EmptyValueTypes));
    }
}
