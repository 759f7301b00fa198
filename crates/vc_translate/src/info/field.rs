use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use crate::info::{CollectionKind, Describe, Form, Instance, MapOps, SeqKind, SeqOps, TypeDesc};
use crate::{ResolveError, TranslateError};

// -----------------------------------------------------------------------------
// DataSite

/// Read and write access to one field of an owner instance.
///
/// The engine treats a data site as opaque: it only needs to read the
/// current payload of the field and to store a translated instance into it.
pub trait DataSite: Send + Sync + 'static {
    /// The type that declares the field.
    fn owner(&self) -> TypeId;

    /// The name of the owner type, for diagnostics.
    fn owner_path(&self) -> &'static str;

    /// Borrows the field payload of `owner`, `None` for null.
    fn read<'a>(&self, owner: &'a dyn Any) -> Result<Option<&'a dyn Any>, TranslateError>;

    /// Stores a translated instance (or null) into the field of `owner`.
    fn write(&self, owner: &mut dyn Any, value: Option<Instance>) -> Result<(), TranslateError>;
}

/// A [`DataSite`] backed by typed accessor functions.
struct AccessorSite<O, F> {
    get: fn(&O) -> &F,
    get_mut: fn(&mut O) -> &mut F,
    _marker: PhantomData<fn(O) -> F>,
}

impl<O, F> DataSite for AccessorSite<O, F>
where
    O: Any + Send + Sync,
    F: Describe,
{
    #[inline]
    fn owner(&self) -> TypeId {
        TypeId::of::<O>()
    }

    #[inline]
    fn owner_path(&self) -> &'static str {
        core::any::type_name::<O>()
    }

    fn read<'a>(&self, owner: &'a dyn Any) -> Result<Option<&'a dyn Any>, TranslateError> {
        let owner = owner.downcast_ref::<O>().ok_or(TranslateError::WrongType {
            expected: core::any::type_name::<O>(),
        })?;
        Ok((self.get)(owner).peek())
    }

    fn write(&self, owner: &mut dyn Any, value: Option<Instance>) -> Result<(), TranslateError> {
        let owner = owner.downcast_mut::<O>().ok_or(TranslateError::WrongType {
            expected: core::any::type_name::<O>(),
        })?;
        *(self.get_mut)(owner) = F::fill(value)?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Container

/// The container shape of a field's storage.
#[derive(Clone, Copy)]
pub enum Container {
    /// A single value.
    Single,
    /// A fixed-length array.
    Array(SeqOps),
    /// A collection with its declared kind.
    Collection(CollectionKind, SeqOps),
    /// A keyed map.
    Map(MapOps),
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("Single"),
            Self::Array(_) => f.write_str("Array"),
            Self::Collection(declared, ops) => f
                .debug_tuple("Collection")
                .field(declared)
                .field(&ops.kind())
                .finish(),
            Self::Map(_) => f.write_str("Map"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldDesc

/// One serializable field of an object type.
///
/// A field has an external member name, a data site, a container shape and a
/// non-empty set of permitted value types (more than one makes the field
/// polymorphic). Map fields also carry a set of permitted key types.
///
/// [`FieldDesc::new`] infers all of it from the field's storage type;
/// [`alternatives`](Self::alternatives), [`key_alternatives`](Self::key_alternatives)
/// and [`declared`](Self::declared) refine the inference.
///
/// # Examples
///
/// ```
/// use vc_translate::info::{CollectionKind, Container, FieldDesc};
///
/// #[derive(Default)]
/// struct Tags {
///     names: Vec<String>,
/// }
///
/// let field = FieldDesc::new::<Tags, _>("names", |t| &t.names, |t| &mut t.names)
///     .declared(CollectionKind::Sequence);
///
/// assert_eq!(field.name(), "names");
/// assert!(matches!(field.container(), Container::Collection(CollectionKind::Sequence, _)));
/// assert_eq!(field.value_types().len(), 1);
/// ```
#[derive(Clone)]
pub struct FieldDesc {
    name: Cow<'static, str>,
    site: Arc<dyn DataSite>,
    storage: TypeDesc,
    container: Container,
    value_types: Vec<TypeDesc>,
    key_types: Vec<TypeDesc>,
}

impl FieldDesc {
    /// Describes the field of `O` reached through `get` / `get_mut`.
    pub fn new<O, F>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&O) -> &F,
        get_mut: fn(&mut O) -> &mut F,
    ) -> Self
    where
        O: Any + Send + Sync,
        F: Describe,
    {
        let site = AccessorSite {
            get,
            get_mut,
            _marker: PhantomData,
        };
        Self::from_site(name, Arc::new(site), F::type_desc())
    }

    /// Describes a field with a custom data site and its storage descriptor.
    pub fn from_site(
        name: impl Into<Cow<'static, str>>,
        site: Arc<dyn DataSite>,
        storage: TypeDesc,
    ) -> Self {
        let (container, key_types, value_types) = match storage.form() {
            Form::Plain | Form::Union => (Container::Single, Vec::new(), storage.alternatives().to_vec()),
            Form::Sequence { kind, ops } => {
                let container = match kind {
                    SeqKind::Array => Container::Array(ops),
                    other => Container::Collection(other.into(), ops),
                };
                let values = storage.element().map(|e| e.alternatives().to_vec()).unwrap_or_default();
                (container, Vec::new(), values)
            }
            Form::Map { ops } => {
                let (keys, values) = storage
                    .entry()
                    .map(|(k, v)| (k.alternatives().to_vec(), v.alternatives().to_vec()))
                    .unwrap_or_default();
                (Container::Map(ops), keys, values)
            }
        };

        Self {
            name: name.into(),
            site,
            storage,
            container,
            value_types,
            key_types,
        }
    }

    /// Replaces the permitted value types.
    pub fn alternatives(mut self, types: impl IntoIterator<Item = TypeDesc>) -> Self {
        self.value_types = types.into_iter().collect();
        self
    }

    /// Replaces the permitted key types of a map field.
    pub fn key_alternatives(mut self, types: impl IntoIterator<Item = TypeDesc>) -> Self {
        self.key_types = types.into_iter().collect();
        self
    }

    /// Declares the collection kind of a collection field.
    ///
    /// Has no effect on other containers.
    pub fn declared(mut self, kind: CollectionKind) -> Self {
        if let Container::Collection(_, ops) = self.container {
            self.container = Container::Collection(kind, ops);
        }
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn site(&self) -> &dyn DataSite {
        &*self.site
    }

    /// The descriptor of the field's storage type.
    #[inline]
    pub const fn storage(&self) -> &TypeDesc {
        &self.storage
    }

    #[inline]
    pub const fn container(&self) -> Container {
        self.container
    }

    #[inline]
    pub fn value_types(&self) -> &[TypeDesc] {
        &self.value_types
    }

    #[inline]
    pub fn key_types(&self) -> &[TypeDesc] {
        &self.key_types
    }

    /// Composes the descriptor the field is translated with.
    ///
    /// This is the storage descriptor with the declared value (and key) sets
    /// substituted, so fields that narrow or widen their alternatives get a
    /// translator of their own.
    pub fn translation_desc(&self) -> Result<TypeDesc, ResolveError> {
        if self.value_types.is_empty() {
            return Err(ResolveError::EmptyValueTypes);
        }
        let value = TypeDesc::union(self.value_types.iter().cloned());

        match self.container {
            Container::Single => Ok(value),
            Container::Array(ops) => Ok(self.sequence_desc(ops, value)),
            Container::Collection(declared, ops) => {
                if declared.accepts(ops.kind()) {
                    Ok(self.sequence_desc(ops, value))
                } else {
                    Err(ResolveError::UnsupportedContainer {
                        declared,
                        actual: ops.kind(),
                    })
                }
            }
            Container::Map(ops) => {
                if self.key_types.is_empty() {
                    return Err(ResolveError::EmptyKeyTypes);
                }
                let key = TypeDesc::union(self.key_types.iter().cloned());
                Ok(TypeDesc::map_with(
                    self.storage.id(),
                    self.storage.type_path(),
                    ops,
                    key,
                    value,
                ))
            }
        }
    }

    fn sequence_desc(&self, ops: SeqOps, element: TypeDesc) -> TypeDesc {
        TypeDesc::sequence_with(self.storage.id(), self.storage.type_path(), ops, element)
    }
}

impl fmt::Debug for FieldDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDesc")
            .field("name", &self.name)
            .field("owner", &self.site.owner_path())
            .field("container", &self.container)
            .field("value_types", &self.value_types)
            .field("key_types", &self.key_types)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
