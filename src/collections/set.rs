use std::fmt;
use std::iter::FusedIterator;

use crate::config::TreeConfig;
use crate::error::{ConfigError, CorruptionError};
use crate::tree::{self, Comparator, NaturalOrder, Position, Record, RecordFactory, Tree};

/// Record of a set: the key alone.
#[derive(Clone)]
struct SetEntry<K>(K);

impl<K> Record for SetEntry<K> {
    type Key = K;

    #[inline]
    fn key(&self) -> &K {
        &self.0
    }
}

/// An ordered set of keys, unique or multi depending on `UNIQUE`.
///
/// Use the [`Set`] and [`MultiSet`] aliases.
///
/// # Examples
///
/// ```rust
/// use rbtree::collections::MultiSet;
///
/// let mut set: MultiSet<i32> = [5, 3, 8, 3, 1].into_iter().collect();
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 3, 5, 8]);
/// assert_eq!(set.count(&3), 2);
///
/// assert_eq!(set.erase(&3), 2);
/// assert_eq!(set.len(), 3);
/// ```
pub struct SetBase<K, C, const UNIQUE: bool> {
    tree: Tree<SetEntry<K>, C>,
}

/// An ordered set of distinct keys.
pub type Set<K, C = NaturalOrder> = SetBase<K, C, true>;

/// An ordered set that keeps every inserted key, duplicates included.
pub type MultiSet<K, C = NaturalOrder> = SetBase<K, C, false>;

impl<K: Ord, const UNIQUE: bool> SetBase<K, NaturalOrder, UNIQUE> {
    /// Creates an empty set ordered by `K`'s [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, const UNIQUE: bool> Default for SetBase<K, NaturalOrder, UNIQUE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C: Comparator<K>, const UNIQUE: bool> SetBase<K, C, UNIQUE> {
    /// Creates an empty set ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: Tree::with_parts(UNIQUE, comparator, RecordFactory),
        }
    }

    /// Creates an empty set with explicit arena settings.
    ///
    /// The `unique` field of `config` is ignored; the set type decides it.
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

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Inserts `key`. Returns its position and whether it was inserted;
    /// a [`Set`] refuses a key it already holds.
    pub fn insert(&mut self, key: K) -> (Position, bool) {
        self.tree.insert(SetEntry(key))
    }

    /// Whether the set holds `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Position of `key`, or `end()`.
    #[must_use]
    pub fn find(&self, key: &K) -> Position {
        self.tree.find(key)
    }

    /// How many times `key` is present.
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.tree.count(key)
    }

    /// Position of the first key not less than `key`.
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Position {
        self.tree.lower_bound(key)
    }

    /// Position of the first key greater than `key`.
    #[must_use]
    pub fn upper_bound(&self, key: &K) -> Position {
        self.tree.upper_bound(key)
    }

    /// `(lower_bound(key), upper_bound(key))`.
    #[must_use]
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        self.tree.equal_range(key)
    }

    /// Removes every copy of `key` and returns how many were removed.
    pub fn erase(&mut self, key: &K) -> usize {
        self.tree.erase(key)
    }

    /// Removes the key at `position` and returns the position after it.
    ///
    /// # Panics
    ///
    /// Panics if `position` is `end()`, stale, or from another set.
    pub fn erase_at(&mut self, position: Position) -> Position {
        self.tree.erase_at(position)
    }

    /// Removes the keys in `[begin, end)` and returns how many were removed.
    ///
    /// # Panics
    ///
    /// Panics if a position is stale or from another set, or if `end` does
    /// not follow `begin`.
    pub fn erase_range(&mut self, begin: Position, end: Position) -> usize {
        self.tree.erase_range(begin, end)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Position of the smallest key.
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

    /// The key at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    #[must_use]
    pub fn key(&self, position: Position) -> Option<&K> {
        self.tree.key(position)
    }

    /// The smallest key.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(Record::key)
    }

    /// The largest key.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(Record::key)
    }

    /// Keys in order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    /// Keys in `[begin, end)`.
    ///
    /// # Panics
    ///
    /// Panics on a stale or foreign position.
    pub fn range(&self, begin: Position, end: Position) -> impl Iterator<Item = &K> + '_ {
        self.tree.range(begin, end).map(Record::key)
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

impl<K: Clone, C: Clone, const UNIQUE: bool> Clone for SetBase<K, C, UNIQUE> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: fmt::Debug, C, const UNIQUE: bool> fmt::Debug for SetBase<K, C, UNIQUE> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_set()
            .entries(self.tree.iter().map(Record::key))
            .finish()
    }
}

impl<K: PartialEq, C, const UNIQUE: bool> PartialEq for SetBase<K, C, UNIQUE> {
    fn eq(&self, other: &Self) -> bool {
        self.tree.len() == other.tree.len()
            && self
                .tree
                .iter()
                .zip(other.tree.iter())
                .all(|(left, right)| left.0 == right.0)
    }
}

impl<K: Eq, C, const UNIQUE: bool> Eq for SetBase<K, C, UNIQUE> {}

impl<K: Ord, const UNIQUE: bool> FromIterator<K> for SetBase<K, NaturalOrder, UNIQUE> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K, C: Comparator<K>, const UNIQUE: bool> Extend<K> for SetBase<K, C, UNIQUE> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, C: Comparator<K>, const UNIQUE: bool> IntoIterator for &'a SetBase<K, C, UNIQUE> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of a set.
pub struct Iter<'a, K> {
    inner: tree::Iter<'a, SetEntry<K>>,
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &entry.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| &entry.0)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
