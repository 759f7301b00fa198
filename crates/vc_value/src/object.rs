use alloc::string::String;
use alloc::vec::{self, Vec};
use core::fmt;
use core::hash::BuildHasher;
use core::slice;

use foldhash::fast::RandomState;
use hashbrown::HashTable;

use crate::Value;

// -----------------------------------------------------------------------------
// Object

/// An insertion-ordered map from member name to [`Value`].
///
/// Order is kept so that human-readable rendering matches the order members
/// were written in, but it carries no meaning: two objects with the same
/// members in different orders compare equal.
///
/// Members live in a vector; a hash table of positions into it keeps lookups
/// and inserts constant-time, so parsing untrusted text stays linear in the
/// number of members. Each object hashes with its own random seed.
///
/// # Examples
///
/// ```
/// use vc_value::{Object, Value};
///
/// let mut a = Object::new();
/// a.insert("x", Value::from(1));
/// a.insert("y", Value::from(2));
///
/// let b: Object = [("y", Value::from(2)), ("x", Value::from(1))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(a, b);
/// assert_eq!(a.keys().collect::<Vec<_>>(), ["x", "y"]);
/// ```
#[derive(Clone, Default)]
pub struct Object {
    entries: Vec<(String, Value)>,
    /// Positions into `entries`, keyed by member name.
    index: HashTable<usize>,
    state: RandomState,
}

impl Object {
    /// Creates an empty `Object`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty `Object` with room for `capacity` members.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            state: RandomState::default(),
        }
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the object has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn position(&self, key: &str) -> Option<usize> {
        let entries = &self.entries;
        self.index
            .find(self.state.hash_one(key), |&i| entries[i].0 == key)
            .copied()
    }

    /// Inserts a member.
    ///
    /// If the name already exists its value is replaced in place (the member
    /// keeps its position) and the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Some(i) = self.position(&key) {
            return Some(core::mem::replace(&mut self.entries[i].1, value));
        }

        let hash = self.state.hash_one(key.as_str());
        self.entries.push((key, value));

        let Self {
            entries,
            index,
            state,
        } = self;
        index.insert_unique(hash, entries.len() - 1, |&i| {
            state.hash_one(entries[i].0.as_str())
        });
        None
    }

    /// Returns the value of the named member.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Returns a mutable reference to the value of the named member.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    /// Returns `true` if the named member exists.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes the named member, keeping the order of the rest.
    ///
    /// Later members shift down by one, so this is linear in the number of
    /// members.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let entries = &self.entries;
        let hash = self.state.hash_one(key);
        let removed = match self.index.find_entry(hash, |&i| entries[i].0 == key) {
            Ok(entry) => entry.remove().0,
            Err(_) => return None,
        };

        for slot in self.index.iter_mut() {
            if *slot > removed {
                *slot -= 1;
            }
        }
        Some(self.entries.remove(removed).1)
    }

    /// Iterates members in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Iterates member names in insertion order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates member values in insertion order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut object = Object::with_capacity(iter.size_hint().0);
        object.extend(iter);
        object
    }
}

impl<K: Into<String>> Extend<(K, Value)> for Object {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// -----------------------------------------------------------------------------
// Iterators

/// Borrowing iterator over the members of an [`Object`].
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, Value)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// -----------------------------------------------------------------------------
// Tests
