use core::any::TypeId;

use crate::hash::HashMap;
use crate::info::{Describe, TypeDesc};
use crate::source::{TypeShape, TypeSource};

// -----------------------------------------------------------------------------
// GetTypeShape

/// A type that can describe its own shape.
///
/// `register_dependencies` registers the types reachable from this one so a
/// single [`TypeTable::register`] call covers a whole object graph.
pub trait GetTypeShape: Describe {
    fn type_shape() -> TypeShape;

    /// Registers the shapes this type depends on. Does nothing by default.
    #[inline(always)]
    fn register_dependencies(_table: &mut TypeTable) {}
}

// -----------------------------------------------------------------------------
// TypeTable

/// The default [`TypeSource`]: shapes keyed by [`TypeId`].
///
/// # Examples
///
/// ```
/// use vc_translate::prelude::*;
/// use vc_translate::source::TypeSource;
///
/// #[derive(Default)]
/// struct Empty;
///
/// vc_translate::impl_slot!(Empty);
///
/// impl GetTypeShape for Empty {
///     fn type_shape() -> TypeShape {
///         ObjectShape::builder::<Self>("Empty").build().into()
///     }
/// }
///
/// let mut table = TypeTable::new();
/// assert!(table.is_empty());
///
/// table.register::<Empty>();
/// assert!(table.contains::<Empty>());
/// assert_eq!(table.shape_of(&TypeDesc::of::<Empty>()).unwrap().name(), "Empty");
/// ```
#[derive(Default, Clone)]
pub struct TypeTable {
    shapes: HashMap<TypeId, TypeShape>,
    #[cfg(feature = "auto_register")]
    pub(super) auto_registered: bool,
}

impl TypeTable {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` and its dependencies.
    ///
    /// Types already present are skipped, which also stops recursion on
    /// cyclic type graphs.
    pub fn register<T: GetTypeShape>(&mut self) {
        let id = TypeId::of::<T>();
        if self.shapes.contains_key(&id) {
            return;
        }
        self.shapes.insert(id, T::type_shape());
        T::register_dependencies(self);
    }

    /// Inserts a shape for `id`, replacing any previous one.
    ///
    /// Returns the replaced shape.
    #[inline]
    pub fn insert(&mut self, id: TypeId, shape: TypeShape) -> Option<TypeShape> {
        self.shapes.insert(id, shape)
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.shapes.contains_key(&TypeId::of::<T>())
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> Option<&TypeShape> {
        self.shapes.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl TypeSource for TypeTable {
    #[inline]
    fn shape_of(&self, desc: &TypeDesc) -> Option<TypeShape> {
        self.shapes.get(&desc.id()).cloned()
    }
}

// -----------------------------------------------------------------------------
// Tests
