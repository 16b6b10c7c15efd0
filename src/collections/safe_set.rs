//! A set shared between threads behind one reader/writer lock.

use std::fmt;

use parking_lot::RwLock;

use super::SetBase;
use crate::tree::{Comparator, NaturalOrder};

/// A [`SetBase`] behind a single [`RwLock`].
///
/// Read operations take the shared lock and mutations take the exclusive
/// lock, each for the whole call. Keys leave the lock by clone, never by
/// reference. [`Position`](crate::tree::Position)s are not exposed: they
/// would outlive the lock that made them meaningful. For several steps under
/// one lock, use [`read`](Self::read) or [`write`](Self::write).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use rbtree::collections::SafeSet;
///
/// let set: Arc<SafeSet<u32>> = Arc::new(SafeSet::new());
/// let handles: Vec<_> = (0..4)
///     .map(|worker| {
///         let set = Arc::clone(&set);
///         thread::spawn(move || {
///             for key in 0..100 {
///                 set.insert(key * 4 + worker);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(set.len(), 400);
/// assert_eq!(set.first(), Some(0));
/// ```
pub struct SafeSetBase<K, C, const UNIQUE: bool> {
    inner: RwLock<SetBase<K, C, UNIQUE>>,
}

/// A thread-safe [`Set`](super::Set).
pub type SafeSet<K, C = NaturalOrder> = SafeSetBase<K, C, true>;

/// A thread-safe [`MultiSet`](super::MultiSet).
pub type SafeMultiSet<K, C = NaturalOrder> = SafeSetBase<K, C, false>;

impl<K: Ord, const UNIQUE: bool> SafeSetBase<K, NaturalOrder, UNIQUE> {
    /// Creates an empty set ordered by `K`'s [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_set(SetBase::new())
    }
}

impl<K: Ord, const UNIQUE: bool> Default for SafeSetBase<K, NaturalOrder, UNIQUE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C: Comparator<K>, const UNIQUE: bool> SafeSetBase<K, C, UNIQUE> {
    /// Creates an empty set ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_set(SetBase::with_comparator(comparator))
    }

    /// Wraps an existing set.
    #[must_use]
    pub fn from_set(set: SetBase<K, C, UNIQUE>) -> Self {
        Self {
            inner: RwLock::new(set),
        }
    }

    /// Unwraps the set.
    pub fn into_inner(self) -> SetBase<K, C, UNIQUE> {
        self.inner.into_inner()
    }

    /// Inserts `key` and reports whether it was inserted.
    pub fn insert(&self, key: K) -> bool {
        self.inner.write().insert(key).1
    }

    /// Removes every copy of `key` and returns how many were removed.
    pub fn erase(&self, key: &K) -> usize {
        self.inner.write().erase(key)
    }

    /// Removes every key.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Whether the set holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// How many times `key` is present.
    pub fn count(&self, key: &K) -> usize {
        self.inner.read().count(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Runs `f` with shared access to the set.
    pub fn read<T>(&self, f: impl FnOnce(&SetBase<K, C, UNIQUE>) -> T) -> T {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the set.
    pub fn write<T>(&self, f: impl FnOnce(&mut SetBase<K, C, UNIQUE>) -> T) -> T {
        f(&mut self.inner.write())
    }
}

impl<K: Clone, C: Comparator<K>, const UNIQUE: bool> SafeSetBase<K, C, UNIQUE> {
    /// The smallest key.
    pub fn first(&self) -> Option<K> {
        self.inner.read().first().cloned()
    }

    /// The largest key.
    pub fn last(&self) -> Option<K> {
        self.inner.read().last().cloned()
    }

    /// The first key not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Option<K> {
        let set = self.inner.read();
        set.key(set.lower_bound(key)).cloned()
    }

    /// The first key greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Option<K> {
        let set = self.inner.read();
        set.key(set.upper_bound(key)).cloned()
    }

    /// Every key, in order.
    pub fn to_vec(&self) -> Vec<K> {
        self.inner.read().iter().cloned().collect()
    }
}

impl<K: fmt::Debug, C, const UNIQUE: bool> fmt::Debug for SafeSetBase<K, C, UNIQUE> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SafeSet")
            .field("set", &*self.inner.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(SafeSet<i32>: Send, Sync);
static_assertions::assert_impl_all!(SafeMultiSet<String>: Send, Sync);
