use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use crate::info::{Describe, FieldDesc, Instance, Slot};

type PostConstruct = Arc<dyn Fn(&mut dyn Any) + Send + Sync>;
type Validate = Arc<dyn Fn(&dyn Any) -> Result<(), String> + Send + Sync>;

// -----------------------------------------------------------------------------
// ObjectShape

/// The serializable shape of an object type.
///
/// Holds the external type name, the ordered field list, a default
/// constructor and the optional post-construction and validation hooks run
/// after every member of an inbound value has been applied.
///
/// Built with [`ObjectShape::builder`].
pub struct ObjectShape {
    name: Cow<'static, str>,
    owner: TypeId,
    owner_path: &'static str,
    fields: Vec<FieldDesc>,
    construct: fn() -> Instance,
    post_construct: Option<PostConstruct>,
    validate: Option<Validate>,
}

impl ObjectShape {
    /// Starts describing `T` under the external name `name`.
    #[inline]
    pub fn builder<T>(name: impl Into<Cow<'static, str>>) -> ObjectShapeBuilder<T>
    where
        T: Default + Any + Send + Sync,
    {
        ObjectShapeBuilder {
            shape: ObjectShape {
                name: name.into(),
                owner: TypeId::of::<T>(),
                owner_path: core::any::type_name::<T>(),
                fields: Vec::new(),
                construct: construct_default::<T>,
                post_construct: None,
                validate: None,
            },
            _marker: PhantomData,
        }
    }

    /// The external type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn owner(&self) -> TypeId {
        self.owner
    }

    #[inline]
    pub const fn owner_path(&self) -> &'static str {
        self.owner_path
    }

    /// The fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    /// A default-constructed instance of the owner type.
    #[inline]
    pub fn construct(&self) -> Instance {
        (self.construct)()
    }

    pub(crate) fn post_construct(&self, instance: &mut dyn Any) {
        if let Some(hook) = &self.post_construct {
            hook(instance);
        }
    }

    pub(crate) fn validate(&self, instance: &dyn Any) -> Result<(), String> {
        match &self.validate {
            Some(hook) => hook(instance),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectShape")
            .field("name", &self.name)
            .field("owner", &self.owner_path)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

fn construct_default<T: Default + Any + Send + Sync>() -> Instance {
    Box::new(T::default())
}

/// Builder of an [`ObjectShape`] for owner type `T`.
pub struct ObjectShapeBuilder<T> {
    shape: ObjectShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Default + Any + Send + Sync> ObjectShapeBuilder<T> {
    /// Adds a field reached through typed accessors.
    pub fn field<F: Describe>(
        self,
        name: impl Into<Cow<'static, str>>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.with_field(FieldDesc::new(name, get, get_mut))
    }

    /// Adds a prepared field descriptor.
    pub fn with_field(mut self, field: FieldDesc) -> Self {
        self.shape.fields.push(field);
        self
    }

    /// Runs `hook` on every instance built from a value, after its members are applied.
    pub fn post_construct(mut self, hook: fn(&mut T)) -> Self {
        self.shape.post_construct = Some(Arc::new(move |instance: &mut dyn Any| {
            if let Some(instance) = instance.downcast_mut::<T>() {
                hook(instance);
            }
        }));
        self
    }

    /// Checks every instance built from a value; runs after [`post_construct`](Self::post_construct).
    pub fn validate(mut self, hook: fn(&T) -> Result<(), String>) -> Self {
        self.shape.validate = Some(Arc::new(move |instance: &dyn Any| {
            match instance.downcast_ref::<T>() {
                Some(instance) => hook(instance),
                None => Ok(()),
            }
        }));
        self
    }

    #[inline]
    pub fn build(self) -> ObjectShape {
        self.shape
    }
}

// -----------------------------------------------------------------------------
// EnumShape

/// A closed set of named symbols, translated as strings.
///
/// # Examples
///
/// ```
/// use vc_translate::info::{Instance, fill_exact};
/// use vc_translate::source::{EnumShape, Symbolic};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Suit {
///     Hearts,
///     Spades,
/// }
///
/// vc_translate::impl_slot!(Suit);
///
/// impl Symbolic for Suit {
///     const SYMBOLS: &'static [&'static str] = &["HEARTS", "SPADES"];
///
///     fn symbol(&self) -> &'static str {
///         match self {
///             Self::Hearts => "HEARTS",
///             Self::Spades => "SPADES",
///         }
///     }
///
///     fn from_symbol(symbol: &str) -> Option<Self> {
///         match symbol {
///             "HEARTS" => Some(Self::Hearts),
///             "SPADES" => Some(Self::Spades),
///             _ => None,
///         }
///     }
/// }
///
/// let shape = EnumShape::of::<Suit>("Suit");
/// assert_eq!(shape.symbol_of(&Suit::Spades), Some("SPADES"));
/// let instance: Instance = shape.instance_of("HEARTS").unwrap();
/// assert_eq!(fill_exact::<Suit>(Some(instance)).unwrap(), Suit::Hearts);
/// ```
pub trait Symbolic: Slot {
    /// All symbols, in declaration order.
    const SYMBOLS: &'static [&'static str];

    fn symbol(&self) -> &'static str;

    fn from_symbol(symbol: &str) -> Option<Self>;
}

/// The shape of a [`Symbolic`] enum.
pub struct EnumShape {
    name: Cow<'static, str>,
    owner: TypeId,
    symbols: &'static [&'static str],
    to_symbol: fn(&dyn Any) -> Option<&'static str>,
    from_symbol: fn(&str) -> Option<Instance>,
}

impl EnumShape {
    pub fn of<E: Symbolic>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            owner: TypeId::of::<E>(),
            symbols: E::SYMBOLS,
            to_symbol: |data| data.downcast_ref::<E>().map(E::symbol),
            from_symbol: |symbol| E::from_symbol(symbol).map(|e| Box::new(e) as Instance),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn owner(&self) -> TypeId {
        self.owner
    }

    #[inline]
    pub const fn symbols(&self) -> &'static [&'static str] {
        self.symbols
    }

    /// The symbol of `data`, or `None` if it is not an instance of this enum.
    #[inline]
    pub fn symbol_of(&self, data: &dyn Any) -> Option<&'static str> {
        (self.to_symbol)(data)
    }

    /// The instance named `symbol`, or `None` if the symbol is unknown.
    #[inline]
    pub fn instance_of(&self, symbol: &str) -> Option<Instance> {
        (self.from_symbol)(symbol)
    }
}

impl fmt::Debug for EnumShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumShape")
            .field("name", &self.name)
            .field("symbols", &self.symbols)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// What a type source knows about a non-scalar type.
#[derive(Debug, Clone)]
pub enum TypeShape {
    Object(Arc<ObjectShape>),
    Enum(Arc<EnumShape>),
}

impl TypeShape {
    /// The external type name.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(shape) => shape.name(),
            Self::Enum(shape) => shape.name(),
        }
    }

    #[inline]
    pub fn owner(&self) -> TypeId {
        match self {
            Self::Object(shape) => shape.owner(),
            Self::Enum(shape) => shape.owner(),
        }
    }
}

impl From<ObjectShape> for TypeShape {
    #[inline]
    fn from(shape: ObjectShape) -> Self {
        Self::Object(Arc::new(shape))
    }
}

impl From<EnumShape> for TypeShape {
    #[inline]
    fn from(shape: EnumShape) -> Self {
        Self::Enum(Arc::new(shape))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::TypeId;

    use super::{EnumShape, ObjectShape, TypeShape};
    use crate::fixtures::{Color, Point};

    #[test]
    fn builder_keeps_field_order() {
        let shape = ObjectShape::builder::<Point>("Point")
            .field("y", |p| &p.y, |p| &mut p.y)
            .field("x", |p| &p.x, |p| &mut p.x)
            .build();

        let names: Vec<_> = shape.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["y", "x"]);
        assert_eq!(shape.owner(), TypeId::of::<Point>());
        assert!(shape.construct().downcast_ref::<Point>().is_some());
    }

    #[test]
    fn hooks_run_on_owner_only() {
        let shape = ObjectShape::builder::<Point>("Point")
            .post_construct(|p| p.x += 1)
            .validate(|p| if p.x > 0 { Ok(()) } else { Err(String::from("x must be positive")) })
            .build();

        let mut instance = shape.construct();
        assert!(shape.validate(&*instance).is_err());
        shape.post_construct(&mut *instance);
        assert!(shape.validate(&*instance).is_ok());

        // foreign instances pass through untouched.
        let mut other = String::new();
        shape.post_construct(&mut other);
        assert!(shape.validate(&other).is_ok());
    }

    #[test]
    fn enum_symbols() {
        let shape: TypeShape = EnumShape::of::<Color>("Color").into();
        let TypeShape::Enum(shape) = shape else {
            panic!("expected an enum shape");
        };
        assert_eq!(shape.symbols(), ["RED", "GREEN", "BLUE"]);
        assert_eq!(shape.symbol_of(&Color::Blue), Some("BLUE"));
        assert_eq!(shape.symbol_of(&1_i32), None);
        assert!(shape.instance_of("PURPLE").is_none());
    }
}
