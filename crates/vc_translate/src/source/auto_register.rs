use crate::source::TypeTable;

// -----------------------------------------------------------------------------
// AutoRegistration

/// A registration function collected at link time.
///
/// Submitted by [`auto_register!`](crate::auto_register); not meant to be
/// constructed by hand.
#[doc(hidden)]
pub struct AutoRegistration {
    register: fn(&mut TypeTable),
}

impl AutoRegistration {
    #[inline]
    pub const fn new(register: fn(&mut TypeTable)) -> Self {
        Self { register }
    }
}

inventory::collect!(AutoRegistration);

// Marks the table once collection has run, so platforms without
// link-time collection can be detected.
inventory::submit! {
    AutoRegistration::new(|table| table.auto_registered = true)
}

impl TypeTable {
    /// Registers every type listed in an [`auto_register!`](crate::auto_register) invocation.
    ///
    /// Returns `false` if link-time collection is not supported on this
    /// platform, in which case nothing was registered.
    pub fn auto_register(&mut self) -> bool {
        for registration in inventory::iter::<AutoRegistration> {
            (registration.register)(self);
        }
        let supported = self.auto_registered;
        if !supported {
            log::warn!("automatic type registration is not supported on this platform");
        }
        supported
    }
}

/// Submits types for [`TypeTable::auto_register`].
///
/// # Examples
///
/// ```
/// use vc_translate::prelude::*;
///
/// #[derive(Default)]
/// struct Marker;
///
/// vc_translate::impl_slot!(Marker);
///
/// impl GetTypeShape for Marker {
///     fn type_shape() -> TypeShape {
///         ObjectShape::builder::<Self>("Marker").build().into()
///     }
/// }
///
/// vc_translate::auto_register!(Marker);
///
/// let mut table = TypeTable::new();
/// if table.auto_register() {
///     assert!(table.contains::<Marker>());
/// }
/// ```
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::inventory::submit! {
                $crate::source::AutoRegistration::new(|table| table.register::<$ty>())
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// Tests
