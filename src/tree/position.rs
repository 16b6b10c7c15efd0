use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one tree instance. Clones get a fresh identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct TreeId(u64);

impl TreeId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Target {
    End,
    Node { index: usize, generation: u32 },
}

/// A handle to one record of a tree, or to the tree's end.
///
/// Positions are plain values: they borrow nothing, so the tree can be
/// mutated while positions are held. A position stays valid across every
/// insertion and across erasure of any *other* record. Using a position after
/// its own record was erased, or on a tree that did not produce it, panics
/// (or returns a [`UsageError`](crate::error::UsageError) from the `try_*`
/// methods).
///
/// Two positions are equal when they name the same record, or the end of the
/// same tree. Equal keys do not make positions equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    tree: TreeId,
    target: Target,
}

impl Position {
    pub(crate) const fn end(tree: TreeId) -> Self {
        Self {
            tree,
            target: Target::End,
        }
    }

    pub(crate) const fn node(tree: TreeId, index: usize, generation: u32) -> Self {
        Self {
            tree,
            target: Target::Node { index, generation },
        }
    }

    /// Whether this is an end position.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self.target, Target::End)
    }

    pub(crate) const fn tree(&self) -> TreeId {
        self.tree
    }

    pub(crate) const fn target(&self) -> Target {
        self.target
    }
}
