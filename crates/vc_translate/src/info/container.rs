use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::{HashMap, HashSet};

use crate::TranslateError;
use crate::info::{Describe, Instance, Slot, TypeDesc};

// -----------------------------------------------------------------------------
// SeqKind

/// The concrete kind of a sequence container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    /// Fixed-length array, e.g. `[T; N]`.
    Array,
    /// Ordered growable list, e.g. `Vec<T>`.
    List,
    /// Double-ended queue, e.g. `VecDeque<T>`.
    Deque,
    /// Unordered set, e.g. `HashSet<T>`.
    Set,
    /// Ordered set, e.g. `BTreeSet<T>`.
    SortedSet,
}

impl SeqKind {
    /// The name used in external type names, e.g. `list<int32>`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::List => "list",
            Self::Deque => "deque",
            Self::Set => "set",
            Self::SortedSet => "sorted_set",
        }
    }
}

impl fmt::Display for SeqKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// CollectionKind

/// The collection kind a field declares, possibly abstract.
///
/// Field storage is always a concrete type, so instead of instantiating a
/// default for an abstract declaration the engine checks that the concrete
/// storage is the default (or an accepted refinement) of the declared kind.
///
/// | declared     | accepted storage          |
/// |--------------|---------------------------|
/// | `Sequence`   | `List` (default), `Deque` |
/// | `Set`        | `Set` (default), `SortedSet` |
/// | any concrete | the same kind             |
/// | `Named`      | nothing                   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Any ordered collection.
    Sequence,
    List,
    Deque,
    /// Any set.
    Set,
    SortedSet,
    /// A collection abstraction with no known default.
    Named(&'static str),
}

impl CollectionKind {
    /// Whether concrete storage of `actual` satisfies this declaration.
    pub const fn accepts(self, actual: SeqKind) -> bool {
        matches!(
            (self, actual),
            (Self::Sequence, SeqKind::List | SeqKind::Deque)
                | (Self::List, SeqKind::List)
                | (Self::Deque, SeqKind::Deque)
                | (Self::Set, SeqKind::Set | SeqKind::SortedSet)
                | (Self::SortedSet, SeqKind::SortedSet)
        )
    }
}

impl From<SeqKind> for CollectionKind {
    fn from(kind: SeqKind) -> Self {
        match kind {
            SeqKind::Array | SeqKind::List => Self::List,
            SeqKind::Deque => Self::Deque,
            SeqKind::Set => Self::Set,
            SeqKind::SortedSet => Self::SortedSet,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence => f.pad("sequence"),
            Self::List => f.pad("list"),
            Self::Deque => f.pad("deque"),
            Self::Set => f.pad("set"),
            Self::SortedSet => f.pad("sorted_set"),
            Self::Named(name) => f.pad(name),
        }
    }
}

// -----------------------------------------------------------------------------
// Sequence

/// A container translated as a JSON array.
pub trait Sequence: Slot {
    type Item: Slot;

    const KIND: SeqKind;

    /// The items in iteration order.
    fn items(&self) -> impl Iterator<Item = &Self::Item>;

    /// Builds the container from translated items.
    fn collect_items(items: Vec<Self::Item>) -> Result<Self, TranslateError>;
}

/// Borrowed payloads of a sequence, `None` for null items.
pub type ErasedItems<'a> = Vec<Option<&'a dyn Any>>;

/// Type-erased [`Sequence`] operations.
#[derive(Clone, Copy)]
pub struct SeqOps {
    kind: SeqKind,
    items: for<'a> fn(&'a dyn Any) -> Option<ErasedItems<'a>>,
    build: fn(Vec<Option<Instance>>) -> Result<Instance, TranslateError>,
}

impl SeqOps {
    pub fn of<C: Sequence>() -> Self {
        Self {
            kind: C::KIND,
            items: erased_items::<C>,
            build: erased_build::<C>,
        }
    }

    #[inline]
    pub const fn kind(&self) -> SeqKind {
        self.kind
    }

    /// Borrows the items of `data`, or `None` if it is not the expected container.
    #[inline]
    pub fn items<'a>(&self, data: &'a dyn Any) -> Option<ErasedItems<'a>> {
        (self.items)(data)
    }

    /// Builds a container instance from item instances.
    #[inline]
    pub fn build(&self, items: Vec<Option<Instance>>) -> Result<Instance, TranslateError> {
        (self.build)(items)
    }
}

fn erased_items<C: Sequence>(data: &dyn Any) -> Option<ErasedItems<'_>> {
    let container = data.downcast_ref::<C>()?;
    Some(container.items().map(|item| item.peek()).collect())
}

fn erased_build<C: Sequence>(items: Vec<Option<Instance>>) -> Result<Instance, TranslateError> {
    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| C::Item::fill(item).map_err(|e| e.in_element(index)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(C::collect_items(items)?))
}

// -----------------------------------------------------------------------------
// Associative

/// A keyed container translated as an array of `{key, value}` objects.
pub trait Associative: Slot {
    type Key: Slot;
    type Value: Slot;

    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    fn collect_entries(entries: Vec<(Self::Key, Self::Value)>) -> Result<Self, TranslateError>;
}

/// Borrowed key and value payloads of a map.
pub type ErasedEntries<'a> = Vec<(Option<&'a dyn Any>, Option<&'a dyn Any>)>;

/// Type-erased [`Associative`] operations.
#[derive(Clone, Copy)]
pub struct MapOps {
    entries: for<'a> fn(&'a dyn Any) -> Option<ErasedEntries<'a>>,
    build: fn(Vec<(Option<Instance>, Option<Instance>)>) -> Result<Instance, TranslateError>,
}

impl MapOps {
    pub fn of<M: Associative>() -> Self {
        Self {
            entries: erased_entries::<M>,
            build: erased_build_map::<M>,
        }
    }

    #[inline]
    pub fn entries<'a>(&self, data: &'a dyn Any) -> Option<ErasedEntries<'a>> {
        (self.entries)(data)
    }

    #[inline]
    pub fn build(
        &self,
        entries: Vec<(Option<Instance>, Option<Instance>)>,
    ) -> Result<Instance, TranslateError> {
        (self.build)(entries)
    }
}

fn erased_entries<M: Associative>(data: &dyn Any) -> Option<ErasedEntries<'_>> {
    let map = data.downcast_ref::<M>()?;
    Some(map.entries().map(|(k, v)| (k.peek(), v.peek())).collect())
}

fn erased_build_map<M: Associative>(
    entries: Vec<(Option<Instance>, Option<Instance>)>,
) -> Result<Instance, TranslateError> {
    let entries = entries
        .into_iter()
        .enumerate()
        .map(|(index, (key, value))| {
            let key = M::Key::fill(key).map_err(|e| e.in_element(index))?;
            let value = M::Value::fill(value).map_err(|e| e.in_element(index))?;
            Ok((key, value))
        })
        .collect::<Result<Vec<_>, TranslateError>>()?;
    Ok(Box::new(M::collect_entries(entries)?))
}

// -----------------------------------------------------------------------------
// Implementations

macro_rules! impl_container_slot {
    (impl<$($param:ident),*> for $ty:ty where $($bounds:tt)*) => {
        impl<$($param),*> Slot for $ty where $($bounds)* {
            #[inline]
            fn peek(&self) -> Option<&dyn Any> {
                Some(self)
            }

            #[inline]
            fn fill(value: Option<Instance>) -> Result<Self, TranslateError> {
                crate::info::fill_exact(value)
            }
        }
    };
}

impl_container_slot!(impl<T> for Vec<T> where T: Slot);
impl_container_slot!(impl<T> for VecDeque<T> where T: Slot);
impl_container_slot!(impl<T> for BTreeSet<T> where T: Slot + Ord);
impl_container_slot!(impl<T, S> for HashSet<T, S> where T: Slot + Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static);
impl_container_slot!(impl<K, V> for BTreeMap<K, V> where K: Slot + Ord, V: Slot);
impl_container_slot!(impl<K, V, S> for HashMap<K, V, S> where K: Slot + Eq + Hash, V: Slot, S: BuildHasher + Default + Send + Sync + 'static);

impl<T: Slot, const N: usize> Slot for [T; N] {
    #[inline]
    fn peek(&self) -> Option<&dyn Any> {
        Some(self)
    }

    #[inline]
    fn fill(value: Option<Instance>) -> Result<Self, TranslateError> {
        crate::info::fill_exact(value)
    }
}

impl<T: Slot> Sequence for Vec<T> {
    type Item = T;
    const KIND: SeqKind = SeqKind::List;

    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn collect_items(items: Vec<T>) -> Result<Self, TranslateError> {
        Ok(items)
    }
}

impl<T: Slot> Sequence for VecDeque<T> {
    type Item = T;
    const KIND: SeqKind = SeqKind::Deque;

    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn collect_items(items: Vec<T>) -> Result<Self, TranslateError> {
        Ok(items.into())
    }
}

impl<T: Slot + Ord> Sequence for BTreeSet<T> {
    type Item = T;
    const KIND: SeqKind = SeqKind::SortedSet;

    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn collect_items(items: Vec<T>) -> Result<Self, TranslateError> {
        Ok(items.into_iter().collect())
    }
}

impl<T, S> Sequence for HashSet<T, S>
where
    T: Slot + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    type Item = T;
    const KIND: SeqKind = SeqKind::Set;

    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn collect_items(items: Vec<T>) -> Result<Self, TranslateError> {
        Ok(items.into_iter().collect())
    }
}

impl<T: Slot, const N: usize> Sequence for [T; N] {
    type Item = T;
    const KIND: SeqKind = SeqKind::Array;

    fn items(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn collect_items(items: Vec<T>) -> Result<Self, TranslateError> {
        let found = items.len();
        <[T; N]>::try_from(items)
            .map_err(|_| TranslateError::LengthMismatch { expected: N, found })
    }
}

impl<K: Slot + Ord, V: Slot> Associative for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    fn collect_entries(entries: Vec<(K, V)>) -> Result<Self, TranslateError> {
        Ok(entries.into_iter().collect())
    }
}

impl<K, V, S> Associative for HashMap<K, V, S>
where
    K: Slot + Eq + Hash,
    V: Slot,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    fn collect_entries(entries: Vec<(K, V)>) -> Result<Self, TranslateError> {
        Ok(entries.into_iter().collect())
    }
}

macro_rules! impl_describe_sequence {
    (impl<$($param:ident),*> for $ty:ty where $($bounds:tt)*) => {
        impl<$($param),*> Describe for $ty where $($bounds)* {
            #[inline]
            fn type_desc() -> TypeDesc {
                TypeDesc::sequence::<Self>(T::type_desc())
            }
        }
    };
}

impl_describe_sequence!(impl<T> for Vec<T> where T: Describe);
impl_describe_sequence!(impl<T> for VecDeque<T> where T: Describe);
impl_describe_sequence!(impl<T> for BTreeSet<T> where T: Describe + Ord);
impl_describe_sequence!(impl<T, S> for HashSet<T, S> where T: Describe + Eq + Hash, S: BuildHasher + Default + Send + Sync + 'static);

impl<T: Describe, const N: usize> Describe for [T; N] {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::sequence::<Self>(T::type_desc())
    }
}

impl<K: Describe + Ord, V: Describe> Describe for BTreeMap<K, V> {
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::map::<Self>(K::type_desc(), V::type_desc())
    }
}

impl<K, V, S> Describe for HashMap<K, V, S>
where
    K: Describe + Eq + Hash,
    V: Describe,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    #[inline]
    fn type_desc() -> TypeDesc {
        TypeDesc::map::<Self>(K::type_desc(), V::type_desc())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeMap, BTreeSet};
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{CollectionKind, MapOps, SeqKind, SeqOps};
    use crate::TranslateError;
    use crate::info::Instance;

    #[test]
    fn collection_policy() {
        assert!(CollectionKind::Sequence.accepts(SeqKind::List));
        assert!(CollectionKind::Sequence.accepts(SeqKind::Deque));
        assert!(!CollectionKind::Sequence.accepts(SeqKind::Set));
        assert!(CollectionKind::Set.accepts(SeqKind::Set));
        assert!(CollectionKind::Set.accepts(SeqKind::SortedSet));
        assert!(!CollectionKind::SortedSet.accepts(SeqKind::Set));
        assert!(!CollectionKind::List.accepts(SeqKind::Deque));
        assert!(!CollectionKind::Named("bag").accepts(SeqKind::List));
    }

    #[test]
    fn erased_sequence_ops() {
        let ops = SeqOps::of::<Vec<Option<i32>>>();
        assert_eq!(ops.kind(), SeqKind::List);

        let data = vec![Some(1), None, Some(3)];
        let items = ops.items(&data).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[1].is_none());
        assert_eq!(items[2].unwrap().downcast_ref::<i32>(), Some(&3));
        assert!(ops.items(&String::new()).is_none());

        let built = ops
            .build(vec![Some(Box::new(4_i32) as Instance), None])
            .unwrap();
        assert_eq!(*built.downcast::<Vec<Option<i32>>>().unwrap(), vec![Some(4), None]);
    }

    #[test]
    fn set_deduplicates() {
        let ops = SeqOps::of::<BTreeSet<i32>>();
        let items: Vec<Option<Instance>> = [3, 1, 3]
            .into_iter()
            .map(|n| Some(Box::new(n) as Instance))
            .collect();
        let built = ops.build(items).unwrap();
        let set = built.downcast::<BTreeSet<i32>>().unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 3]);
    }

    #[test]
    fn array_length_is_checked() {
        let ops = SeqOps::of::<[u8; 2]>();
        let error = ops.build(vec![Some(Box::new(1_u8) as Instance)]).unwrap_err();
        assert!(matches!(
            error,
            TranslateError::LengthMismatch { expected: 2, found: 1 }
        ));
    }

    #[test]
    fn null_element_reports_index() {
        let ops = SeqOps::of::<Vec<i32>>();
        let error = ops.build(vec![Some(Box::new(1_i32) as Instance), None]).unwrap_err();
        assert!(matches!(error, TranslateError::InElement { index: 1, .. }));
    }

    #[test]
    fn erased_map_ops() {
        let ops = MapOps::of::<BTreeMap<i32, String>>();
        let data = BTreeMap::from([(1, String::from("x"))]);
        let entries = ops.entries(&data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.unwrap().downcast_ref::<i32>(), Some(&1));

        let built = ops
            .build(vec![(
                Some(Box::new(2_i32) as Instance),
                Some(Box::new(String::from("y")) as Instance),
            )])
            .unwrap();
        let map = built.downcast::<BTreeMap<i32, String>>().unwrap();
        assert_eq!(map.get(&2).map(String::as_str), Some("y"));
    }
}
