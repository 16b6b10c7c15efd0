//! Capabilities a caller plugs into the engine.
//!
//! - [`Record`]: the stored type exposes its key.
//! - [`ValueRecord`]: the stored type also carries a mutable value.
//! - [`Comparator`]: the total order used for every descent.
//! - [`NodeFactory`]: turns insert data into a record and disposes of records
//!   when they leave the tree.

use std::cmp::Ordering;

/// A type that can be stored in a [`Tree`](super::Tree).
///
/// The key must not change while the record is linked; the engine only ever
/// hands out shared references to records, apart from the value part of a
/// [`ValueRecord`].
///
/// # Examples
///
/// ```rust
/// use rbtree::tree::{Record, Tree};
///
/// struct Job {
///     priority: u8,
///     name: String,
/// }
///
/// impl Record for Job {
///     type Key = u8;
///     fn key(&self) -> &u8 {
///         &self.priority
///     }
/// }
///
/// let mut jobs: Tree<Job> = Tree::new(false);
/// jobs.insert(Job { priority: 2, name: "build".into() });
/// jobs.insert(Job { priority: 1, name: "fetch".into() });
///
/// let names: Vec<_> = jobs.iter().map(|job| job.name.as_str()).collect();
/// assert_eq!(names, ["fetch", "build"]);
/// ```
pub trait Record {
    /// The ordering key.
    type Key: ?Sized;

    /// Returns the key of this record.
    fn key(&self) -> &Self::Key;
}

/// A record whose value can be read and replaced in place.
///
/// Changing the value never moves the record, because the key is untouched.
pub trait ValueRecord: Record {
    /// The payload stored next to the key.
    type Value;

    /// Returns the value.
    fn value(&self) -> &Self::Value;

    /// Returns the value for mutation.
    fn value_mut(&mut self) -> &mut Self::Value;
}

/// A total order over keys.
///
/// The order must stay the same for as long as the tree holding the keys is
/// alive. Closures of type `Fn(&K, &K) -> Ordering` are comparators.
///
/// # Examples
///
/// ```rust
/// use rbtree::collections::Set;
///
/// let mut set = Set::<i32, _>::with_comparator(|left: &i32, right: &i32| right.cmp(left));
/// set.extend([1, 3, 2]);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

/// The key type's own [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}

/// Builds records from insert data and disposes of removed records.
///
/// The engine calls [`create`](Self::create) only after it has decided to
/// link a new record (the unique check passed, or the tree is multi-key), and
/// calls [`destroy`](Self::destroy) exactly once for every record it removes,
/// whether by erase, clear, or dropping the tree. Link setup is the engine's
/// job, not the factory's.
pub trait NodeFactory<R: Record> {
    /// What callers pass to `insert`.
    type Data;

    /// The key `data` will have once it becomes a record.
    fn key_of<'a>(&self, data: &'a Self::Data) -> &'a R::Key;

    /// Turns insert data into a record.
    fn create(&mut self, data: Self::Data) -> R;

    /// Disposes of a record removed from the tree.
    fn destroy(&mut self, record: R) {
        drop(record);
    }
}

/// The identity factory: callers insert finished records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordFactory;

impl<R: Record> NodeFactory<R> for RecordFactory {
    type Data = R;

    #[inline]
    fn key_of<'a>(&self, data: &'a R) -> &'a R::Key {
        data.key()
    }

    #[inline]
    fn create(&mut self, data: R) -> R {
        data
    }
}
