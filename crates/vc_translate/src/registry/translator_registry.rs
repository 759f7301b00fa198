use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::hash::HashMap;
use crate::info::TypeDesc;
use crate::translate::{Scalar, ScalarTranslator, TranslatorRef, builtin_scalars};

// -----------------------------------------------------------------------------
// TranslatorRegistry

/// A thread-safe cache of translators keyed by [`TypeDesc`].
///
/// Entries are only ever added, never replaced or removed: once a
/// descriptor has a translator, every later lookup returns that same
/// translator.
///
/// Dropping the registry frees its translators, except the maps of types
/// that refer back to themselves (see [`TypeMap`](crate::translate::TypeMap)).
///
/// # Examples
///
/// ```
/// use vc_translate::info::TypeDesc;
/// use vc_translate::registry::TranslatorRegistry;
///
/// let registry = TranslatorRegistry::new();
/// let int = registry.get(&TypeDesc::of::<i32>()).unwrap();
/// assert_eq!(int.external_name(), "int32");
///
/// assert!(TranslatorRegistry::empty().is_empty());
/// ```
pub struct TranslatorRegistry {
    entries: RwLock<HashMap<TypeDesc, TranslatorRef>>,
}

impl Default for TranslatorRegistry {
    /// See [`TranslatorRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TranslatorRegistry {
    /// Creates a registry with no translators at all.
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(HashMap::default()),
        }
    }

    /// Creates a registry holding the built-in scalars and void.
    ///
    /// - `int8`..`int64`, `uint8`..`uint64`, `float`, `double`
    /// - `boolean`, `char`, `string`
    /// - `datetime`, `date` (feature `chrono`), `uuid` (feature `uuid`)
    /// - `void` for `()`
    pub fn new() -> Self {
        let registry = Self::empty();
        {
            let mut entries = registry.write();
            for (desc, translator) in builtin_scalars() {
                entries.insert(desc, translator);
            }
        }
        registry
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeDesc, TranslatorRef>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeDesc, TranslatorRef>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The translator registered for `desc`.
    #[inline]
    pub fn get(&self, desc: &TypeDesc) -> Option<TranslatorRef> {
        self.read().get(desc).cloned()
    }

    #[inline]
    pub fn contains(&self, desc: &TypeDesc) -> bool {
        self.read().contains_key(desc)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registers a fixed translator for `desc`.
    ///
    /// Returns the translator that ends up registered, which is the existing
    /// one if `desc` was already present.
    pub fn insert(&self, desc: TypeDesc, translator: TranslatorRef) -> TranslatorRef {
        self.write().entry(desc).or_insert(translator).clone()
    }

    /// Registers a custom [`Scalar`].
    #[inline]
    pub fn register_scalar<T: Scalar>(&self) -> TranslatorRef {
        self.insert(T::type_desc(), Arc::new(ScalarTranslator::<T>::new()))
    }

    /// Publishes a batch of translators built by one resolution session.
    ///
    /// Descriptors already present keep their translator.
    pub(crate) fn publish(&self, batch: impl IntoIterator<Item = (TypeDesc, TranslatorRef)>) {
        let mut entries = self.write();
        for (desc, translator) in batch {
            if entries.contains_key(&desc) {
                log::debug!("translator for `{}` was published concurrently", desc.type_path());
                continue;
            }
            entries.insert(desc, translator);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::TranslatorRegistry;
    use crate::info::{Describe, TypeDesc};
    use crate::translate::{ScalarTranslator, TranslatorRef, VoidTranslator};

    #[test]
    fn scalars_are_preregistered() {
        let registry = TranslatorRegistry::new();
        for (desc, name) in [
            (TypeDesc::of::<u16>(), "uint16"),
            (TypeDesc::of::<f32>(), "float"),
            (TypeDesc::of::<f64>(), "double"),
            (TypeDesc::of::<bool>(), "boolean"),
            (String::type_desc(), "string"),
            (TypeDesc::of::<()>(), "void"),
        ] {
            assert_eq!(registry.get(&desc).unwrap().external_name(), name);
        }
        assert!(!registry.contains(&<Vec<i32>>::type_desc()));
    }

    #[test]
    fn first_insert_wins() {
        let registry = TranslatorRegistry::empty();
        let desc = TypeDesc::of::<i32>();

        let first: TranslatorRef = Arc::new(ScalarTranslator::<i32>::new());
        let second: TranslatorRef = Arc::new(VoidTranslator);

        let kept = registry.insert(desc.clone(), first.clone());
        assert!(Arc::ptr_eq(&kept, &first));
        let kept = registry.insert(desc.clone(), second.clone());
        assert!(Arc::ptr_eq(&kept, &first));

        registry.publish([(desc.clone(), second)]);
        assert!(Arc::ptr_eq(&registry.get(&desc).unwrap(), &first));
        assert_eq!(registry.len(), 1);
    }
}
