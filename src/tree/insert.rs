use std::cmp::Ordering;

use super::node::{Color, Link, NodeIndex, Side};
use super::{Comparator, NodeFactory, Position, Record, Tree};
use crate::error::DuplicateKey;

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    C: Comparator<R::Key>,
    F: NodeFactory<R>,
{
    /// Inserts `data`, returning its position and whether it was inserted.
    ///
    /// A unique tree that already holds an equal key is left untouched and
    /// the position of the existing record is returned with `false`; the
    /// rejected data is dropped. Use [`try_insert`](Self::try_insert) to get
    /// it back.
    pub fn insert(&mut self, data: F::Data) -> (Position, bool) {
        match self.try_insert(data) {
            Ok(position) => (position, true),
            Err(duplicate) => (duplicate.existing, false),
        }
    }

    /// Inserts `data`, handing it back if a unique tree already holds its key.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] with the existing record's position and the
    /// rejected data.
    pub fn try_insert(&mut self, data: F::Data) -> Result<Position, DuplicateKey<F::Data>> {
        let (parent, side) = match self.find_slot(self.factory.key_of(&data)) {
            Ok(slot) => slot,
            Err(existing) => {
                tracing::trace!(len = self.len, "duplicate key rejected");
                return Err(DuplicateKey {
                    existing: self.position_of(existing),
                    data,
                });
            }
        };

        let record = self.factory.create(data);
        let node = self.arena.allocate(record);
        self.attach(node, parent, side);
        self.len += 1;
        self.rebalance_after_insert(node);
        Ok(self.position_of(node))
    }

    /// Finds the empty child slot a new `key` goes into.
    ///
    /// Equal keys go left, so in a multi tree a new record precedes the
    /// records it equals. A unique tree reports the equal node instead.
    fn find_slot(&self, key: &R::Key) -> Result<(Link, Side), NodeIndex> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.header.root;
        while let Some(node) = current {
            parent = Some(node);
            side = match self.comparator.compare(key, self.arena.record(node).key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal if self.unique => return Err(node),
                Ordering::Equal => Side::Left,
            };
            current = self.arena.child(node, side);
        }
        Ok((parent, side))
    }

    fn attach(&mut self, node: NodeIndex, parent: Link, side: Side) {
        self.arena.set_parent(node, parent);
        let Some(parent) = parent else {
            self.header.root = Some(node);
            self.header.leftmost = Some(node);
            self.header.rightmost = Some(node);
            return;
        };
        self.arena.set_child(parent, side, Some(node));
        match side {
            Side::Left if self.header.leftmost == Some(parent) => {
                self.header.leftmost = Some(node);
            }
            Side::Right if self.header.rightmost == Some(parent) => {
                self.header.rightmost = Some(node);
            }
            _ => {}
        }
    }

    fn rebalance_after_insert(&mut self, mut node: NodeIndex) {
        loop {
            let Some(parent) = self.arena.parent(node) else {
                self.arena.set_color(node, Color::Black);
                return;
            };
            if self.arena.color(parent) == Color::Black {
                return;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grandparent) = self.arena.parent(parent) else {
                self.arena.set_color(parent, Color::Black);
                return;
            };
            let parent_side = self.arena.side_of(parent, grandparent);
            let uncle = self.arena.child(grandparent, parent_side.opposite());

            if let Some(uncle) = self.arena.red_node(uncle) {
                self.arena.set_color(parent, Color::Black);
                self.arena.set_color(uncle, Color::Black);
                self.arena.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut top = parent;
            if self.arena.side_of(node, parent) != parent_side {
                self.rotate_up(node);
                top = node;
            }
            self.arena.set_color(top, Color::Black);
            self.arena.set_color(grandparent, Color::Red);
            self.rotate_up(top);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    struct Tagged {
        key: u32,
        tag: char,
    }

    impl Record for Tagged {
        type Key = u32;
        fn key(&self) -> &u32 {
            &self.key
        }
    }

    fn tagged(key: u32, tag: char) -> Tagged {
        Tagged { key, tag }
    }

    #[rstest]
    #[case::ascending((0..64).collect())]
    #[case::descending((0..64).rev().collect())]
    #[case::zigzag(vec![10, 1, 9, 2, 8, 3, 7, 4, 6, 5])]
    fn test_insert_keeps_invariants(#[case] keys: Vec<u32>) {
        let mut tree: Tree<Tagged> = Tree::new(true);
        for &key in &keys {
            let (_, inserted) = tree.insert(tagged(key, 'x'));
            assert!(inserted);
            assert!(tree.verify().is_ok());
        }
        let mut expected = keys;
        expected.sort_unstable();
        let stored: Vec<_> = tree.iter().map(|record| record.key).collect();
        assert_eq!(stored, expected);
    }

    #[rstest]
    fn test_insert_tracks_bounds() {
        let mut tree: Tree<Tagged> = Tree::new(true);
        tree.insert(tagged(5, 'a'));
        tree.insert(tagged(2, 'b'));
        tree.insert(tagged(9, 'c'));
        tree.insert(tagged(7, 'd'));
        assert_eq!(tree.first().map(|record| record.key), Some(2));
        assert_eq!(tree.last().map(|record| record.key), Some(9));
    }

    #[rstest]
    fn test_unique_insert_rejects_equal_key_without_mutation() {
        let mut tree: Tree<Tagged> = Tree::new(true);
        let (first, _) = tree.insert(tagged(3, 'a'));
        let (existing, inserted) = tree.insert(tagged(3, 'b'));
        assert!(!inserted);
        assert_eq!(existing, first);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(first), Some(&tagged(3, 'a')));
    }

    #[rstest]
    fn test_try_insert_returns_rejected_data() {
        let mut tree: Tree<Tagged> = Tree::new(true);
        let first = tree.try_insert(tagged(3, 'a')).unwrap();
        let Err(DuplicateKey { existing, data }) = tree.try_insert(tagged(3, 'b')) else {
            panic!("duplicate key was accepted");
        };
        assert_eq!(existing, first);
        assert_eq!(data, tagged(3, 'b'));
    }

    #[rstest]
    fn test_multi_insert_places_new_duplicate_first() {
        let mut tree: Tree<Tagged> = Tree::new(false);
        tree.insert(tagged(1, 'a'));
        tree.insert(tagged(1, 'b'));
        tree.insert(tagged(0, 'z'));
        tree.insert(tagged(1, 'c'));
        let tags: String = tree.iter().map(|record| record.tag).collect();
        assert_eq!(tags, "zcba");
        assert!(tree.verify().is_ok());
    }

    #[rstest]
    fn test_insert_positions_survive_later_inserts() {
        let mut tree: Tree<Tagged> = Tree::new(true);
        let positions: Vec<_> = (0..100).map(|key| (key, tree.insert(tagged(key, 'p')).0)).collect();
        for (key, position) in positions {
            assert_eq!(tree.key(position), Some(&key));
        }
    }
}
