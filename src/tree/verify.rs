use std::cmp::Ordering;

use super::node::{Color, NodeIndex, Side};
use super::{Comparator, NodeFactory, Record, Tree};
use crate::error::CorruptionError;

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    C: Comparator<R::Key>,
    F: NodeFactory<R>,
{
    /// Checks every structural invariant and returns the black height.
    ///
    /// Checked: the root is black and has no parent, no red node has a red
    /// child, every root-to-sentinel path has the same number of black
    /// nodes, every child links back to its parent, keys are in order
    /// (strictly in a unique tree), the length matches the reachable nodes,
    /// and the cached minimum and maximum are the real ones.
    ///
    /// # Errors
    ///
    /// Returns the first [`CorruptionError`] found.
    pub fn verify(&self) -> Result<usize, CorruptionError> {
        let Some(root) = self.header.root else {
            if self.len != 0 {
                return Err(CorruptionError::LengthMismatch {
                    recorded: self.len,
                    counted: 0,
                });
            }
            if self.header.leftmost.is_some() {
                return Err(CorruptionError::BoundsMismatch { which: "leftmost" });
            }
            if self.header.rightmost.is_some() {
                return Err(CorruptionError::BoundsMismatch { which: "rightmost" });
            }
            return Ok(0);
        };

        if self.arena.parent(root).is_some() {
            return Err(CorruptionError::RootHasParent);
        }
        if self.arena.color(root) == Color::Red {
            return Err(CorruptionError::RedRoot);
        }

        let (black_height, counted) = self.verify_subtree(root)?;
        if counted != self.len {
            return Err(CorruptionError::LengthMismatch {
                recorded: self.len,
                counted,
            });
        }
        if self.header.leftmost != Some(self.arena.extreme(root, Side::Left)) {
            return Err(CorruptionError::BoundsMismatch { which: "leftmost" });
        }
        if self.header.rightmost != Some(self.arena.extreme(root, Side::Right)) {
            return Err(CorruptionError::BoundsMismatch { which: "rightmost" });
        }

        for (rank, (left, right)) in self.iter().zip(self.iter().skip(1)).enumerate() {
            let ordering = self.comparator.compare(left.key(), right.key());
            if ordering == Ordering::Greater || (self.unique && ordering == Ordering::Equal) {
                return Err(CorruptionError::OrderViolation { rank: rank + 1 });
            }
        }

        Ok(black_height)
    }

    /// Returns `(black height, node count)` of the subtree at `node`.
    fn verify_subtree(&self, node: NodeIndex) -> Result<(usize, usize), CorruptionError> {
        let mut heights = [0; 2];
        let mut count = 1;
        for side in [Side::Left, Side::Right] {
            let Some(child) = self.arena.child(node, side) else {
                continue;
            };
            if self.arena.parent(child) != Some(node) {
                return Err(CorruptionError::ParentMismatch {
                    parent: node.0,
                    child: child.0,
                });
            }
            if self.arena.color(node) == Color::Red && self.arena.color(child) == Color::Red {
                return Err(CorruptionError::AdjacentRed {
                    parent: node.0,
                    child: child.0,
                });
            }
            let (height, nodes) = self.verify_subtree(child)?;
            heights[side as usize] = height;
            count += nodes;
        }
        let [left, right] = heights;
        if left != right {
            return Err(CorruptionError::BlackHeightMismatch {
                node: node.0,
                left,
                right,
            });
        }
        Ok((left + usize::from(self.arena.color(node) == Color::Black), count))
    }
}
