//! Node links and the slot arena that stores them next to caller records.
//!
//! Every record lives in a [`Slot`] together with its [`Links`]. A link is an
//! `Option<NodeIndex>`: `None` is the sentinel, so an empty subtree, the
//! parent of the root and "end of sequence" are all the same value and no
//! slot is ever spent on the sentinel itself.
//!
//! The arena grows in spans. When no free slot is left it adds
//! `clamp(capacity, MIN_SPAN, max_span)` slots (rounded down to a multiple of
//! [`SPAN_ALIGNMENT`]) in one reservation, so small trees grow in small steps
//! and large trees in steps of at most `max_span`. Released slots go on a free
//! list and are handed out again before the arena grows.
//!
//! Each slot carries a generation counter that is bumped on release. A
//! [`Position`](super::Position) records the generation it was made with,
//! which is how a position to an erased record is told apart from a position
//! to whatever record reuses the slot later.

use crate::config::{MIN_SPAN, SPAN_ALIGNMENT};

/// Node color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Child direction. Also used as the direction of in-order stepping:
/// `Right` walks toward larger keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Index of an occupied arena slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeIndex(pub(crate) usize);

/// A child or parent link. `None` is the sentinel.
pub(crate) type Link = Option<NodeIndex>;

/// Structural part of a node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Links {
    pub(crate) children: [Link; 2],
    pub(crate) parent: Link,
    pub(crate) color: Color,
}

impl Links {
    /// Links of a freshly created node: no neighbours, red.
    const DETACHED: Self = Self {
        children: [None, None],
        parent: None,
        color: Color::Red,
    };
}

#[derive(Clone)]
struct Slot<R> {
    generation: u32,
    links: Links,
    record: Option<R>,
}

impl<R> Slot<R> {
    const fn vacant() -> Self {
        Self {
            generation: 0,
            links: Links::DETACHED,
            record: None,
        }
    }
}

/// Number of slots the next growth step adds to an arena of `capacity` slots.
const fn next_span(capacity: usize, max_span: usize) -> usize {
    let span = if capacity < MIN_SPAN {
        MIN_SPAN
    } else if capacity > max_span {
        max_span
    } else {
        capacity
    };
    span / SPAN_ALIGNMENT * SPAN_ALIGNMENT
}

/// Slot storage for one tree.
#[derive(Clone)]
pub(crate) struct Arena<R> {
    slots: Vec<Slot<R>>,
    free: Vec<usize>,
    max_span: usize,
}

impl<R> Arena<R> {
    pub(crate) fn new(max_span: usize, initial_capacity: usize) -> Self {
        let mut arena = Self {
            slots: Vec::new(),
            free: Vec::new(),
            max_span,
        };
        if initial_capacity > 0 {
            arena.extend_by(initial_capacity);
        }
        arena
    }

    /// Total number of slots, occupied or not.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores `record` in a free slot with detached red links.
    pub(crate) fn allocate(&mut self, record: R) -> NodeIndex {
        if self.free.is_empty() {
            self.grow();
        }
        let Some(index) = self.free.pop() else {
            unreachable!("arena grew but the free list is still empty")
        };
        let slot = &mut self.slots[index];
        slot.links = Links::DETACHED;
        slot.record = Some(record);
        NodeIndex(index)
    }

    /// Takes the record out of `index`, invalidating positions that name it.
    pub(crate) fn release(&mut self, index: NodeIndex) -> R {
        let slot = &mut self.slots[index.0];
        let Some(record) = slot.record.take() else {
            unreachable!("released slot {} holds no record", index.0)
        };
        slot.generation = slot.generation.wrapping_add(1);
        slot.links = Links::DETACHED;
        self.free.push(index.0);
        record
    }

    /// Releases every occupied slot, passing each record to `sink`.
    ///
    /// Returns the number of records released. Capacity is kept.
    pub(crate) fn release_all(&mut self, mut sink: impl FnMut(R)) -> usize {
        let mut released = 0;
        for slot in &mut self.slots {
            if let Some(record) = slot.record.take() {
                slot.generation = slot.generation.wrapping_add(1);
                slot.links = Links::DETACHED;
                sink(record);
                released += 1;
            }
        }
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev());
        released
    }

    fn grow(&mut self) {
        let span = next_span(self.slots.len(), self.max_span);
        self.extend_by(span);
        tracing::debug!(span, capacity = self.slots.len(), "arena grew");
    }

    fn extend_by(&mut self, count: usize) {
        let start = self.slots.len();
        self.slots.reserve_exact(count);
        self.slots.extend((0..count).map(|_| Slot::vacant()));
        // Lowest index on top so slots are handed out in ascending order.
        self.free.extend((start..start + count).rev());
    }

    /// Whether `index` is occupied and still carries `generation`.
    pub(crate) fn is_live(&self, index: usize, generation: u32) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.generation == generation && slot.record.is_some())
    }

    #[inline]
    pub(crate) fn generation(&self, index: NodeIndex) -> u32 {
        self.slots[index.0].generation
    }

    #[inline]
    pub(crate) fn record(&self, index: NodeIndex) -> &R {
        match &self.slots[index.0].record {
            Some(record) => record,
            None => unreachable!("linked slot {} holds no record", index.0),
        }
    }

    #[inline]
    pub(crate) fn record_mut(&mut self, index: NodeIndex) -> &mut R {
        match &mut self.slots[index.0].record {
            Some(record) => record,
            None => unreachable!("linked slot {} holds no record", index.0),
        }
    }

    #[inline]
    pub(crate) fn links(&self, index: NodeIndex) -> &Links {
        &self.slots[index.0].links
    }

    #[inline]
    pub(crate) fn child(&self, index: NodeIndex, side: Side) -> Link {
        self.slots[index.0].links.children[side.index()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, index: NodeIndex, side: Side, child: Link) {
        self.slots[index.0].links.children[side.index()] = child;
    }

    #[inline]
    pub(crate) fn parent(&self, index: NodeIndex) -> Link {
        self.slots[index.0].links.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, index: NodeIndex, parent: Link) {
        self.slots[index.0].links.parent = parent;
    }

    #[inline]
    pub(crate) fn color(&self, index: NodeIndex) -> Color {
        self.slots[index.0].links.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, index: NodeIndex, color: Color) {
        self.slots[index.0].links.color = color;
    }

    /// The sentinel counts as black.
    #[inline]
    pub(crate) fn is_red(&self, link: Link) -> bool {
        link.is_some_and(|index| self.color(index) == Color::Red)
    }

    /// `link` if it names a red node.
    #[inline]
    pub(crate) fn red_node(&self, link: Link) -> Link {
        link.filter(|&index| self.color(index) == Color::Red)
    }

    /// Which side of `parent` holds `child`.
    #[inline]
    pub(crate) fn side_of(&self, child: NodeIndex, parent: NodeIndex) -> Side {
        if self.child(parent, Side::Right) == Some(child) {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// The outermost node of the subtree at `index` in direction `side`.
    pub(crate) fn extreme(&self, mut index: NodeIndex, side: Side) -> NodeIndex {
        while let Some(child) = self.child(index, side) {
            index = child;
        }
        index
    }

    /// In-order neighbour of `index` in direction `side`, or the sentinel
    /// when `index` is the last node that way.
    pub(crate) fn step(&self, index: NodeIndex, side: Side) -> Link {
        if let Some(child) = self.child(index, side) {
            return Some(self.extreme(child, side.opposite()));
        }
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            if self.child(parent, side) == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }
}
