use std::iter::FusedIterator;

use super::node::{Arena, Link, Side};
use super::{NodeFactory, Position, Record, Tree};
use crate::error::UsageError;

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    /// The position after `position`. The largest record steps to `end()`.
    ///
    /// # Panics
    ///
    /// Panics on `end()`, or if `position` is stale or foreign.
    #[must_use]
    pub fn next(&self, position: Position) -> Position {
        self.try_next(position)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// The position before `position`. `end()` steps to the largest record.
    ///
    /// # Panics
    ///
    /// Panics on `begin()` (including `end()` of an empty tree), or if
    /// `position` is stale or foreign.
    #[must_use]
    pub fn prev(&self, position: Position) -> Position {
        self.try_prev(position)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    /// Checked [`next`](Self::next).
    ///
    /// # Errors
    ///
    /// [`UsageError::NextOfEnd`] on `end()`, and the errors of position
    /// resolution for stale or foreign positions.
    pub fn try_next(&self, position: Position) -> Result<Position, UsageError> {
        let node = self.resolve(position)?.ok_or(UsageError::NextOfEnd)?;
        Ok(self.position_of_link(self.arena.step(node, Side::Right)))
    }

    /// Checked [`prev`](Self::prev).
    ///
    /// # Errors
    ///
    /// [`UsageError::PrevOfBegin`] on `begin()`, and the errors of position
    /// resolution for stale or foreign positions.
    pub fn try_prev(&self, position: Position) -> Result<Position, UsageError> {
        let previous = match self.resolve(position)? {
            None => self.header.rightmost,
            Some(node) => self.arena.step(node, Side::Left),
        };
        previous
            .map(|node| self.position_of(node))
            .ok_or(UsageError::PrevOfBegin)
    }

    /// In-order iterator over the records.
    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            arena: &self.arena,
            front: self.header.leftmost,
            back: self.header.rightmost,
            remaining: self.len,
        }
    }

    /// In-order iterator over `[begin, end)`.
    ///
    /// # Panics
    ///
    /// Panics if either position is stale or foreign.
    pub fn range(&self, begin: Position, end: Position) -> Range<'_, R> {
        Range {
            arena: &self.arena,
            current: self.locate(begin),
            stop: self.locate(end),
        }
    }
}

impl<'a, R, C, F> IntoIterator for &'a Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    type Item = &'a R;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the records of a [`Tree`].
///
/// Created by [`Tree::iter`].
pub struct Iter<'a, R> {
    arena: &'a Arena<R>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<R> Clone for Iter<'_, R> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.front = self.arena.step(node, Side::Right);
        self.remaining -= 1;
        Some(self.arena.record(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R> DoubleEndedIterator for Iter<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.back = self.arena.step(node, Side::Left);
        self.remaining -= 1;
        Some(self.arena.record(node))
    }
}

impl<R> ExactSizeIterator for Iter<'_, R> {}

impl<R> FusedIterator for Iter<'_, R> {}

/// In-order iterator over a span of positions.
///
/// Created by [`Tree::range`].
pub struct Range<'a, R> {
    arena: &'a Arena<R>,
    current: Link,
    stop: Link,
}

impl<R> Clone for Range<'_, R> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            current: self.current,
            stop: self.stop,
        }
    }
}

impl<'a, R> Iterator for Range<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.stop {
            return None;
        }
        let node = self.current?;
        self.current = self.arena.step(node, Side::Right);
        Some(self.arena.record(node))
    }
}

impl<R> FusedIterator for Range<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    struct Num(u16);

    impl Record for Num {
        type Key = u16;
        fn key(&self) -> &u16 {
            &self.0
        }
    }

    fn tree_of(keys: &[u16]) -> Tree<Num> {
        let mut tree = Tree::new(true);
        for &key in keys {
            tree.insert(Num(key));
        }
        tree
    }

    #[rstest]
    fn test_next_walks_forward_to_end() {
        let tree = tree_of(&[3, 1, 2]);
        let mut position = tree.begin();
        let mut seen = Vec::new();
        while position != tree.end() {
            seen.push(*tree.key(position).unwrap());
            position = tree.next(position);
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_prev_walks_backward_from_end() {
        let tree = tree_of(&[3, 1, 2]);
        let mut position = tree.end();
        let mut seen = Vec::new();
        while position != tree.begin() {
            position = tree.prev(position);
            seen.push(*tree.key(position).unwrap());
        }
        assert_eq!(seen, vec![3, 2, 1]);
    }

    #[rstest]
    #[should_panic(expected = "end of tree has no next position")]
    fn test_next_of_end_panics() {
        let tree = tree_of(&[1]);
        let _ = tree.next(tree.end());
    }

    #[rstest]
    #[should_panic(expected = "begin of tree has no previous position")]
    fn test_prev_of_begin_panics() {
        let tree = tree_of(&[1, 2]);
        let _ = tree.prev(tree.begin());
    }

    #[rstest]
    #[should_panic(expected = "begin of tree has no previous position")]
    fn test_prev_of_end_on_empty_tree_panics() {
        let tree = tree_of(&[]);
        let _ = tree.prev(tree.end());
    }

    #[rstest]
    fn test_try_next_and_try_prev_report_misuse() {
        let tree = tree_of(&[1]);
        assert_eq!(tree.try_next(tree.end()), Err(UsageError::NextOfEnd));
        assert_eq!(tree.try_prev(tree.begin()), Err(UsageError::PrevOfBegin));
        assert_eq!(tree.try_prev(tree.end()), Ok(tree.begin()));
    }

    #[rstest]
    fn test_iter_is_double_ended_and_exact() {
        let tree = tree_of(&[5, 1, 4, 2, 3]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&Num(1)));
        assert_eq!(iter.next_back(), Some(&Num(5)));
        assert_eq!(iter.len(), 3);
        let middle: Vec<_> = iter.map(|num| num.0).collect();
        assert_eq!(middle, vec![2, 3, 4]);

        let reversed: Vec<_> = tree.iter().rev().map(|num| num.0).collect();
        assert_eq!(reversed, vec![5, 4, 3, 2, 1]);
    }

    #[rstest]
    fn test_iter_meets_in_the_middle() {
        let tree = tree_of(&[1, 2]);
        let mut iter = tree.iter();
        assert_eq!(iter.next_back(), Some(&Num(2)));
        assert_eq!(iter.next(), Some(&Num(1)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[rstest]
    fn test_range_is_half_open() {
        let tree = tree_of(&[10, 20, 30, 40]);
        let keys: Vec<_> = tree
            .range(tree.find(&20), tree.find(&40))
            .map(|num| num.0)
            .collect();
        assert_eq!(keys, vec![20, 30]);
        assert_eq!(tree.range(tree.begin(), tree.begin()).count(), 0);
        assert_eq!(tree.range(tree.begin(), tree.end()).count(), 4);
    }

    #[rstest]
    fn test_into_iterator_for_reference() {
        let tree = tree_of(&[2, 1]);
        let mut total = 0;
        for num in &tree {
            total += num.0;
        }
        assert_eq!(total, 3);
    }
}
