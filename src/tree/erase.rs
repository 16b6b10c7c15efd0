use std::cmp::Ordering;

use super::node::{Color, Link, NodeIndex, Side};
use super::{Comparator, Header, NodeFactory, Position, Record, Tree};
use crate::error::UsageError;

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    /// Erases the record at `position` and returns the position after it.
    ///
    /// Every other position stays valid.
    ///
    /// # Panics
    ///
    /// Panics if `position` is `end()`, stale, or belongs to another tree.
    pub fn erase_at(&mut self, position: Position) -> Position {
        self.try_erase_at(position)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Erases the record at `position` and returns the position after it.
    ///
    /// # Errors
    ///
    /// [`UsageError::EraseEnd`] for `end()`, and the errors of position
    /// resolution for stale or foreign positions.
    pub fn try_erase_at(&mut self, position: Position) -> Result<Position, UsageError> {
        let node = self.resolve(position)?.ok_or(UsageError::EraseEnd)?;
        let successor = self.arena.step(node, Side::Right);
        self.remove(node);
        Ok(self.position_of_link(successor))
    }

    /// Erases every record in `[begin, end)` and returns how many were
    /// erased.
    ///
    /// # Panics
    ///
    /// Panics if either position is stale or foreign, or if `end` is not
    /// reachable from `begin` by stepping forward.
    pub fn erase_range(&mut self, begin: Position, end: Position) -> usize {
        self.locate(end);
        let mut current = begin;
        let mut erased = 0;
        while current != end {
            current = self.erase_at(current);
            erased += 1;
        }
        tracing::trace!(erased, len = self.len, "range erased");
        erased
    }

    /// Erases every record. The arena keeps its slots for reuse.
    pub fn clear(&mut self) {
        let factory = &mut self.factory;
        let released = self.arena.release_all(|record| factory.destroy(record));
        self.header = Header::default();
        self.len = 0;
        if released > 0 {
            tracing::debug!(released, capacity = self.arena.capacity(), "tree cleared");
        }
    }

    /// Unlinks `node`, frees its slot and hands its record to the factory.
    fn remove(&mut self, node: NodeIndex) {
        self.unlink(node);
        let record = self.arena.release(node);
        self.factory.destroy(record);
    }

    fn unlink(&mut self, node: NodeIndex) {
        if self.header.leftmost == Some(node) {
            self.header.leftmost = self.arena.step(node, Side::Right);
        }
        if self.header.rightmost == Some(node) {
            self.header.rightmost = self.arena.step(node, Side::Left);
        }

        if let (Some(left), Some(_)) = (
            self.arena.child(node, Side::Left),
            self.arena.child(node, Side::Right),
        ) {
            let donor = self.arena.extreme(left, Side::Right);
            self.swap_places(node, donor);
        }

        // At most one child now.
        let child = self
            .arena
            .child(node, Side::Left)
            .or_else(|| self.arena.child(node, Side::Right));
        let parent = self.arena.parent(node);
        if let Some(child) = child {
            self.arena.set_parent(child, parent);
        }
        self.replace_child(parent, node, child);
        self.len -= 1;

        if self.arena.color(node) == Color::Black {
            self.rebalance_after_erase(child, parent);
        }
    }

    /// Exchanges the structural places of `node` and its in-order
    /// predecessor `donor`, colors included. Records stay in their slots.
    fn swap_places(&mut self, node: NodeIndex, donor: NodeIndex) {
        let node_links = *self.arena.links(node);
        let donor_links = *self.arena.links(donor);

        self.replace_child(node_links.parent, node, Some(donor));
        self.arena.set_parent(donor, node_links.parent);
        self.arena.set_color(donor, node_links.color);
        self.arena.set_color(node, donor_links.color);

        let right = node_links.children[Side::Right as usize];
        self.arena.set_child(donor, Side::Right, right);
        if let Some(right) = right {
            self.arena.set_parent(right, Some(donor));
        }
        // The donor is a left-subtree maximum and has no right child.
        self.arena.set_child(node, Side::Right, None);

        let donor_left = donor_links.children[Side::Left as usize];
        self.arena.set_child(node, Side::Left, donor_left);
        if let Some(donor_left) = donor_left {
            self.arena.set_parent(donor_left, Some(node));
        }

        if donor_links.parent == Some(node) {
            self.arena.set_child(donor, Side::Left, Some(node));
            self.arena.set_parent(node, Some(donor));
        } else {
            let left = node_links.children[Side::Left as usize];
            self.arena.set_child(donor, Side::Left, left);
            if let Some(left) = left {
                self.arena.set_parent(left, Some(donor));
            }
            if let Some(donor_parent) = donor_links.parent {
                self.arena.set_child(donor_parent, Side::Right, Some(node));
            }
            self.arena.set_parent(node, donor_links.parent);
        }
    }

    /// Restores the black height after a black node was spliced out.
    ///
    /// `node` is what took the removed node's place (possibly the sentinel)
    /// and `parent` is its parent.
    fn rebalance_after_erase(&mut self, mut node: Link, mut parent: Link) {
        loop {
            let Some(above) = parent else {
                if let Some(node) = node {
                    self.arena.set_color(node, Color::Black);
                }
                return;
            };
            if let Some(red) = self.arena.red_node(node) {
                self.arena.set_color(red, Color::Black);
                return;
            }

            let side = if self.arena.child(above, Side::Left) == node {
                Side::Left
            } else {
                Side::Right
            };
            // The removed black node leaves the sibling subtree with a black
            // height of at least one.
            let Some(sibling) = self.arena.child(above, side.opposite()) else {
                return;
            };
            let near = self.arena.child(sibling, side);
            let far = self.arena.child(sibling, side.opposite());

            if self.arena.color(above) == Color::Red {
                if let Some(near) = self.arena.red_node(near) {
                    self.arena.set_color(above, Color::Black);
                    self.rotate_up(near);
                    self.rotate_up(near);
                } else if self.arena.is_red(far) {
                    self.rotate_up(sibling);
                } else {
                    self.arena.set_color(sibling, Color::Red);
                    self.arena.set_color(above, Color::Black);
                }
                return;
            }

            if self.arena.color(sibling) == Color::Red {
                self.arena.set_color(sibling, Color::Black);
                self.arena.set_color(above, Color::Red);
                self.rotate_up(sibling);
                continue;
            }

            if let Some(near) = self.arena.red_node(near) {
                self.arena.set_color(near, Color::Black);
                self.rotate_up(near);
                self.rotate_up(near);
                return;
            }
            if let Some(far) = self.arena.red_node(far) {
                self.arena.set_color(far, Color::Black);
                self.rotate_up(sibling);
                return;
            }

            self.arena.set_color(sibling, Color::Red);
            node = Some(above);
            parent = self.arena.parent(above);
        }
    }
}

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    C: Comparator<R::Key>,
    F: NodeFactory<R>,
{
    /// Erases every record whose key equals `key` and returns how many were
    /// erased (at most one in a unique tree).
    pub fn erase(&mut self, key: &R::Key) -> usize {
        if self.unique {
            return self.find_node(key).map_or(0, |node| {
                self.remove(node);
                1
            });
        }
        let mut erased = 0;
        let mut current = self.lower_bound_node(key);
        while let Some(node) = current {
            if self.comparator.compare(self.arena.record(node).key(), key) != Ordering::Equal {
                break;
            }
            current = self.arena.step(node, Side::Right);
            self.remove(node);
            erased += 1;
        }
        erased
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Clone, Debug, PartialEq)]
    struct Item(i64);

    impl Record for Item {
        type Key = i64;
        fn key(&self) -> &i64 {
            &self.0
        }
    }

    fn tree_of(unique: bool, keys: impl IntoIterator<Item = i64>) -> Tree<Item> {
        let mut tree = Tree::new(unique);
        for key in keys {
            tree.insert(Item(key));
        }
        tree
    }

    fn keys(tree: &Tree<Item>) -> Vec<i64> {
        tree.iter().map(|item| item.0).collect()
    }

    #[rstest]
    #[case::leaf(vec![2, 1, 3], 1, vec![2, 3])]
    #[case::single_child(vec![2, 1, 3, 4], 3, vec![1, 2, 4])]
    #[case::two_children(vec![4, 2, 6, 1, 3, 5, 7], 4, vec![1, 2, 3, 5, 6, 7])]
    #[case::only_record(vec![1], 1, vec![])]
    fn test_erase_shapes(#[case] initial: Vec<i64>, #[case] key: i64, #[case] expected: Vec<i64>) {
        let mut tree = tree_of(true, initial);
        assert_eq!(tree.erase(&key), 1);
        assert_eq!(keys(&tree), expected);
        assert!(tree.verify().is_ok());
        assert_eq!(tree.find(&key), tree.end());
    }

    #[rstest]
    fn test_erase_missing_key_is_noop() {
        let mut tree = tree_of(true, [1, 2, 3]);
        assert_eq!(tree.erase(&9), 0);
        assert_eq!(tree.len(), 3);
    }

    #[rstest]
    fn test_erase_every_key_in_every_order_keeps_invariants() {
        let initial: Vec<i64> = (0..40).collect();
        for stride in [1, 3, 7, 11] {
            let mut tree = tree_of(true, initial.iter().copied());
            let mut remaining = initial.clone();
            let mut cursor = 0;
            while !remaining.is_empty() {
                cursor = (cursor + stride) % remaining.len();
                let key = remaining.remove(cursor);
                assert_eq!(tree.erase(&key), 1);
                assert!(tree.verify().is_ok());
                assert_eq!(keys(&tree), remaining);
            }
            assert!(tree.is_empty());
            assert_eq!(tree.begin(), tree.end());
        }
    }

    #[rstest]
    fn test_erase_at_returns_successor() {
        let mut tree = tree_of(true, [10, 20, 30]);
        let twenty = tree.find(&20);
        let after = tree.erase_at(twenty);
        assert_eq!(tree.key(after), Some(&30));
        let after_last = tree.erase_at(after);
        assert_eq!(after_last, tree.end());
    }

    #[rstest]
    fn test_two_child_erase_keeps_donor_position() {
        let mut tree = tree_of(true, [4, 2, 6, 1, 3, 5, 7]);
        let donor = tree.find(&3);
        let others: Vec<_> = [1, 2, 5, 6, 7].iter().map(|key| (*key, tree.find(key))).collect();

        tree.erase(&4);

        assert_eq!(tree.key(donor), Some(&3));
        for (key, position) in others {
            assert_eq!(tree.key(position), Some(&key));
        }
        assert!(tree.verify().is_ok());
    }

    #[rstest]
    fn test_erase_updates_bounds() {
        let mut tree = tree_of(true, 1..=5);
        tree.erase(&1);
        tree.erase(&5);
        assert_eq!(tree.first(), Some(&Item(2)));
        assert_eq!(tree.last(), Some(&Item(4)));
        assert_eq!(tree.key(tree.prev(tree.end())), Some(&4));
    }

    #[rstest]
    fn test_multi_erase_removes_whole_run() {
        let mut tree = tree_of(false, [5, 3, 8, 3, 1, 3]);
        assert_eq!(tree.erase(&3), 3);
        assert_eq!(keys(&tree), vec![1, 5, 8]);
        assert!(tree.verify().is_ok());
    }

    #[rstest]
    fn test_erase_range_counts_and_keeps_invariants() {
        let mut tree = tree_of(true, 0..20);
        let begin = tree.find(&5);
        let end = tree.find(&15);
        assert_eq!(tree.erase_range(begin, end), 10);
        assert_eq!(keys(&tree), (0..5).chain(15..20).collect::<Vec<_>>());
        assert!(tree.verify().is_ok());
    }

    #[rstest]
    fn test_erase_range_to_end() {
        let mut tree = tree_of(true, 0..10);
        let begin = tree.begin();
        let end = tree.end();
        assert_eq!(tree.erase_range(begin, end), 10);
        assert!(tree.is_empty());
    }

    #[rstest]
    #[should_panic(expected = "cannot erase the end position")]
    fn test_erase_at_end_panics() {
        let mut tree = tree_of(true, [1]);
        let end = tree.end();
        tree.erase_at(end);
    }

    #[rstest]
    fn test_try_erase_at_reports_misuse() {
        let mut tree = tree_of(true, [1, 2]);
        let end = tree.end();
        assert_eq!(tree.try_erase_at(end), Err(UsageError::EraseEnd));

        let one = tree.find(&1);
        tree.erase_at(one);
        assert_eq!(tree.try_erase_at(one), Err(UsageError::StalePosition));
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    fn test_clear_keeps_capacity_and_reuses_slots() {
        let mut tree = tree_of(true, 0..30);
        let capacity = tree.capacity();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
        assert_eq!(tree.capacity(), capacity);

        tree.insert(Item(1));
        assert_eq!(tree.capacity(), capacity);
        assert!(tree.verify().is_ok());
    }

    #[rstest]
    fn test_freed_slots_are_reused_before_growth() {
        let mut tree = tree_of(true, 0..8);
        let capacity = tree.capacity();
        tree.erase(&3);
        tree.insert(Item(100));
        assert_eq!(tree.capacity(), capacity);
    }
}
