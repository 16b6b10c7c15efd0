use std::fmt;
use std::iter::FusedIterator;

use crate::config::TreeConfig;
use crate::error::{ConfigError, CorruptionError, DuplicateKey};
use crate::tree::{self, Comparator, NaturalOrder, Position, Record, RecordFactory, Tree, ValueRecord};

/// A key and its value, the record type of [`Map`] and [`MultiMap`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    /// Creates a pair.
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The value.
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Splits the pair.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> Record for Pair<K, V> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.key
    }
}

impl<K, V> ValueRecord for Pair<K, V> {
    type Value = V;

    #[inline]
    fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

/// An ordered map, unique or multi depending on `UNIQUE`.
///
/// Use the [`Map`] and [`MultiMap`] aliases. Lookups compare keys only;
/// values can be read and replaced in place through a [`Position`].
///
/// # Examples
///
/// ```rust
/// use rbtree::collections::Map;
///
/// let mut ports: Map<&str, u16> = Map::new();
/// ports.insert("http", 80);
/// ports.insert("ssh", 22);
///
/// let (_, old) = ports.insert_or_assign("http", 8080);
/// assert_eq!(old, Some(80));
///
/// if let Some(port) = ports.get_mut(&"ssh") {
///     *port = 2222;
/// }
/// let pairs: Vec<_> = ports.iter().collect();
/// assert_eq!(pairs, [(&"http", &8080), (&"ssh", &2222)]);
/// ```
pub struct MapBase<K, V, C, const UNIQUE: bool> {
    tree: Tree<Pair<K, V>, C>,
}

/// An ordered map with distinct keys.
pub type Map<K, V, C = NaturalOrder> = MapBase<K, V, C, true>;

/// An ordered map that keeps every inserted pair, equal keys included.
pub type MultiMap<K, V, C = NaturalOrder> = MapBase<K, V, C, false>;

impl<K: Ord, V, const UNIQUE: bool> MapBase<K, V, NaturalOrder, UNIQUE> {
    /// Creates an empty map ordered by `K`'s [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V, const UNIQUE: bool> Default for MapBase<K, V, NaturalOrder, UNIQUE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Comparator<K>, const UNIQUE: bool> MapBase<K, V, C, UNIQUE> {
    /// Creates an empty map ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: Tree::with_parts(UNIQUE, comparator, RecordFactory),
        }
    }

    /// Creates an empty map with explicit arena settings. The `unique` field
    /// of `config` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn with_config(config: TreeConfig, comparator: C) -> Result<Self, ConfigError> {
        let config = TreeConfig {
            unique: UNIQUE,
            ..config
        };
        Tree::with_config(config, comparator, RecordFactory).map(|tree| Self { tree })
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Inserts a pair. A [`Map`] that already holds `key` keeps its current
    /// value and returns `false`.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert(Pair::new(key, value))
    }

    /// Inserts a pair, handing it back if a [`Map`] already holds `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] holding the existing position and the pair.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Position, DuplicateKey<Pair<K, V>>> {
        self.tree.try_insert(Pair::new(key, value))
    }

    /// Whether some pair has key `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Position of a pair with key `key`, or `end()`.
    #[must_use]
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// Number of pairs with key `key`.
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Position of the first pair whose key is not less than `key`.
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Position {
        self.tree.lower_bound(key)
    }

    /// Position of the first pair whose key is greater than `key`.
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Position {
        self.tree.upper_bound(key)
    }

    /// `(lower_bound(key), upper_bound(key))`.
    #[must_use]
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        self.tree.equal_range(key)
    }

    /// Removes every pair with key `key` and returns how many were removed.
    pub fn erase(&mut self, key: &K) -> usize {
        self.tree.erase(key)
    }

    /// Removes the pair at `position` and returns the position after it.
    ///
    /// # Panics
    ///
    /// Panics if `position` is `end()`, stale, or from another map.
    pub fn erase_at(&mut self, position: Position) -> Position {
        self.tree.erase_at(position)
    }

    /// Removes the pairs in `[begin, end)` and returns how many were removed.
    ///
    /// # Panics
    ///
    /// Panics if a position is stale or from another map, or if `end` does
    /// not follow `begin`.
    pub fn erase_range(&mut self, begin: Position, end: Position) -> usize {
        self.tree.erase_range(begin, end)
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Position of the pair with the smallest key.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// The end position.
    #[must_use]
    pub fn end(&self) -> Position {
        self.tree.end()
    }

    /// The position after `position`.
    ///
    /// # Panics
    ///
    /// Panics on `end()` or on a stale or foreign position.
    #[must_use]
    pub fn next(&self, position: Position) -> Position {
        self.tree.next(position)
    }

    /// The position before `position`.
    ///
    /// # Panics
    ///
    /// Panics on `begin()` or on a stale or foreign position.
    #[must_use]
    pub fn prev(&self, position: Position) -> Position {
        self.tree.prev(position)
    }

    /// The key and value at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    #[must_use]
    pub fn entry(&self, position: Position) -> Option<(&K, &V)> {
        self.tree.get(position).map(|pair| (&pair.key, &pair.value))
    }

    /// The key at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    #[must_use]
    pub fn key(&self, position: Position) -> Option<&K> {
        self.tree.key(position)
    }

    /// The value at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    #[must_use]
    pub fn value(&self, position: Position) -> Option<&V> {
        self.tree.value(position)
    }

    /// The value at `position` for mutation, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    pub fn value_mut(&mut self, position: Position) -> Option<&mut V> {
        self.tree.value_mut(position)
    }

    /// Replaces the value at `position` and returns the old one, or `None`
    /// for `end()`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    pub fn set_value(&mut self, position: Position, value: V) -> Option<V> {
        self.tree.set_value(position, value)
    }

    /// The pair with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|pair| (&pair.key, &pair.value))
    }

    /// The pair with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|pair| (&pair.key, &pair.value))
    }

    /// Pairs in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Pairs in `[begin, end)`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    pub fn range(&self, begin: Position, end: Position) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.tree
            .range(begin, end)
            .map(|pair| (&pair.key, &pair.value))
    }

    /// Checks the internal invariants.
    ///
    /// # Errors
    ///
    /// Returns the violation found, if any.
    pub fn verify(&self) -> Result<usize, CorruptionError> {
        self.tree.verify()
    }
}

impl<K, V, C: Comparator<K>> MapBase<K, V, C, true> {
    /// The value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.value(self.tree.find(key))
    }

    /// The value stored under `key`, for mutation.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let position = self.tree.find(key);
        self.tree.value_mut(position)
    }

    /// Inserts the pair, or replaces the value if `key` is present.
    ///
    /// Returns the pair's position and the replaced value.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, Option<V>) {
        match self.tree.try_insert(Pair::new(key, value)) {
            Ok(position) => (position, None),
            Err(DuplicateKey { existing, data }) => {
                let old = self.tree.set_value(existing, data.value);
                (existing, old)
            }
        }
    }
}

impl<K, V, C: Comparator<K>> MapBase<K, V, C, false> {
    /// Every value stored under `key`, in order of their positions.
    pub fn get_all(&self, key: &K) -> impl Iterator<Item = &V> + '_ {
        let (begin, end) = self.tree.equal_range(key);
        self.tree.range(begin, end).map(|pair| &pair.value)
    }
}

impl<K: Clone, V: Clone, C: Clone, const UNIQUE: bool> Clone for MapBase<K, V, C, UNIQUE> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C, const UNIQUE: bool> fmt::Debug for MapBase<K, V, C, UNIQUE> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.tree.iter().map(|pair| (&pair.key, &pair.value)))
            .finish()
    }
}

impl<K: PartialEq, V: PartialEq, C, const UNIQUE: bool> PartialEq for MapBase<K, V, C, UNIQUE> {
    fn eq(&self, other: &Self) -> bool {
        self.tree.len() == other.tree.len() && self.tree.iter().eq(other.tree.iter())
    }
}

impl<K: Eq, V: Eq, C, const UNIQUE: bool> Eq for MapBase<K, V, C, UNIQUE> {}

impl<K: Ord, V, const UNIQUE: bool> FromIterator<(K, V)> for MapBase<K, V, NaturalOrder, UNIQUE> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>, const UNIQUE: bool> Extend<(K, V)> for MapBase<K, V, C, UNIQUE> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C: Comparator<K>, const UNIQUE: bool> IntoIterator for &'a MapBase<K, V, C, UNIQUE> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the pairs of a map.
pub struct Iter<'a, K, V> {
    inner: tree::Iter<'a, Pair<K, V>>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|pair| (&pair.key, &pair.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|pair| (&pair.key, &pair.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
