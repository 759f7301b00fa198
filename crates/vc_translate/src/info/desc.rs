use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{Associative, MapOps, SeqKind, SeqOps, Sequence};

// -----------------------------------------------------------------------------
// Form

/// How a [`TypeDesc`] is translated.
#[derive(Clone, Copy)]
pub enum Form {
    /// A scalar, enum or object type, resolved through the registry or the type source.
    Plain,
    /// A closed set of alternatives, listed in the descriptor's params.
    Union,
    /// An array or collection; params hold `[element]`.
    Sequence { kind: SeqKind, ops: SeqOps },
    /// A keyed map; params hold `[key, value]`.
    Map { ops: MapOps },
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("Plain"),
            Self::Union => f.write_str("Union"),
            Self::Sequence { kind, .. } => f.debug_struct("Sequence").field("kind", kind).finish(),
            Self::Map { .. } => f.write_str("Map"),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeDesc

/// Marker used as the base identity of every union descriptor.
struct UnionMarker;

/// The identity of a translatable type.
///
/// Two descriptors are equal when their base [`TypeId`] and their ordered
/// type parameters are equal, so `Vec<A>` and `Vec<B>` (or the same storage
/// with different declared alternatives) are distinct cache keys.
///
/// # Examples
///
/// ```
/// use vc_translate::info::{Describe, TypeDesc};
///
/// let a = <Vec<i32>>::type_desc();
/// let b = TypeDesc::sequence::<Vec<i32>>(TypeDesc::of::<i32>());
/// assert_eq!(a, b);
/// assert_ne!(a, <Vec<u32>>::type_desc());
/// assert_eq!(a.element(), Some(&TypeDesc::of::<i32>()));
/// ```
#[derive(Clone)]
pub struct TypeDesc {
    id: TypeId,
    type_path: &'static str,
    params: Option<Arc<[TypeDesc]>>,
    form: Form,
}

impl TypeDesc {
    /// A plain descriptor of `T`.
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            params: None,
            form: Form::Plain,
        }
    }

    /// A closed set of alternatives.
    ///
    /// A single alternative yields that alternative itself.
    pub fn union(alternatives: impl IntoIterator<Item = TypeDesc>) -> Self {
        let mut alternatives: Vec<TypeDesc> = alternatives.into_iter().collect();
        if alternatives.len() == 1 {
            return alternatives.swap_remove(0);
        }
        Self {
            id: TypeId::of::<UnionMarker>(),
            type_path: "union",
            params: Some(alternatives.into()),
            form: Form::Union,
        }
    }

    /// A sequence container `C` holding `element`.
    pub fn sequence<C: Sequence>(element: TypeDesc) -> Self {
        Self::sequence_with(TypeId::of::<C>(), core::any::type_name::<C>(), SeqOps::of::<C>(), element)
    }

    /// A map container `M` from `key` to `value`.
    pub fn map<M: Associative>(key: TypeDesc, value: TypeDesc) -> Self {
        Self::map_with(TypeId::of::<M>(), core::any::type_name::<M>(), MapOps::of::<M>(), key, value)
    }

    pub(crate) fn sequence_with(
        id: TypeId,
        type_path: &'static str,
        ops: SeqOps,
        element: TypeDesc,
    ) -> Self {
        Self {
            id,
            type_path,
            params: Some(Arc::new([element])),
            form: Form::Sequence {
                kind: ops.kind(),
                ops,
            },
        }
    }

    pub(crate) fn map_with(
        id: TypeId,
        type_path: &'static str,
        ops: MapOps,
        key: TypeDesc,
        value: TypeDesc,
    ) -> Self {
        Self {
            id,
            type_path,
            params: Some(Arc::new([key, value])),
            form: Form::Map { ops },
        }
    }

    /// Attaches type parameters to a plain descriptor.
    ///
    /// Used by generic user types whose instantiations must not share a translator.
    pub fn with_params(mut self, params: impl IntoIterator<Item = TypeDesc>) -> Self {
        let params: Vec<TypeDesc> = params.into_iter().collect();
        self.params = if params.is_empty() { None } else { Some(params.into()) };
        self
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The host type name, for diagnostics.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn form(&self) -> Form {
        self.form
    }

    /// The ordered type parameters, empty for non-generic types.
    #[inline]
    pub fn params(&self) -> &[TypeDesc] {
        self.params.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub const fn is_union(&self) -> bool {
        matches!(self.form, Form::Union)
    }

    /// The alternatives of a union, or the descriptor itself otherwise.
    #[inline]
    pub fn alternatives(&self) -> &[TypeDesc] {
        if self.is_union() { self.params() } else { core::slice::from_ref(self) }
    }

    /// The element of a sequence descriptor.
    #[inline]
    pub fn element(&self) -> Option<&TypeDesc> {
        match self.form {
            Form::Sequence { .. } => self.params().first(),
            _ => None,
        }
    }

    /// The key and value of a map descriptor.
    #[inline]
    pub fn entry(&self) -> Option<(&TypeDesc, &TypeDesc)> {
        match (self.form, self.params()) {
            (Form::Map { .. }, [key, value]) => Some((key, value)),
            _ => None,
        }
    }
}

impl PartialEq for TypeDesc {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.params() == other.params()
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.params().hash(state);
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path)?;
        if let Some(params) = &self.params {
            f.debug_list().entries(params.iter()).finish()?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
