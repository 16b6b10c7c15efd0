use std::cmp::Ordering;

use super::node::{Link, Side};
use super::{Comparator, NodeFactory, Position, Record, Tree};

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    C: Comparator<R::Key>,
    F: NodeFactory<R>,
{
    /// Position of a record whose key equals `key`, or `end()`.
    ///
    /// In a multi tree any record of the equal run may be returned; use
    /// [`lower_bound`](Self::lower_bound) for the first one.
    #[must_use]
    pub fn find(&self, key: &R::Key) -> Position {
        self.position_of_link(self.find_node(key))
    }

    /// Whether some record has a key equal to `key`.
    #[must_use]
    pub fn contains(&self, key: &R::Key) -> bool {
        self.find_node(key).is_some()
    }

    /// Position of the first record whose key is not less than `key`.
    #[must_use]
    pub fn lower_bound(&self, key: &R::Key) -> Position {
        self.position_of_link(self.lower_bound_node(key))
    }

    /// Position of the first record whose key is greater than `key`.
    #[must_use]
    pub fn upper_bound(&self, key: &R::Key) -> Position {
        self.position_of_link(self.bound_node(key, Ordering::Greater))
    }

    /// `(lower_bound(key), upper_bound(key))`.
    #[must_use]
    pub fn equal_range(&self, key: &R::Key) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Number of records whose key equals `key`.
    #[must_use]
    pub fn count(&self, key: &R::Key) -> usize {
        if self.unique {
            return usize::from(self.contains(key));
        }
        let mut count = 0;
        let mut current = self.lower_bound_node(key);
        while let Some(node) = current {
            if self.comparator.compare(self.arena.record(node).key(), key) != Ordering::Equal {
                break;
            }
            count += 1;
            current = self.arena.step(node, Side::Right);
        }
        count
    }

    pub(super) fn find_node(&self, key: &R::Key) -> Link {
        let mut current = self.header.root;
        while let Some(node) = current {
            match self.comparator.compare(key, self.arena.record(node).key()) {
                Ordering::Less => current = self.arena.child(node, Side::Left),
                Ordering::Greater => current = self.arena.child(node, Side::Right),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    pub(super) fn lower_bound_node(&self, key: &R::Key) -> Link {
        self.bound_node(key, Ordering::Equal)
    }

    /// Leftmost node whose key compares to `key` as `wanted` or greater.
    fn bound_node(&self, key: &R::Key, wanted: Ordering) -> Link {
        let mut candidate = None;
        let mut current = self.header.root;
        while let Some(node) = current {
            if self.comparator.compare(self.arena.record(node).key(), key) >= wanted {
                candidate = Some(node);
                current = self.arena.child(node, Side::Left);
            } else {
                current = self.arena.child(node, Side::Right);
            }
        }
        candidate
    }
}
