//! The red-black tree engine.
//!
//! [`Tree`] stores caller records in an index arena and keeps them ordered
//! by key with red-black balancing. It knows nothing about what a record is
//! beyond the [`Record`] capability: the comparator orders keys and the
//! [`NodeFactory`] creates and destroys records.
//!
//! - [`Tree`]: the engine
//! - [`Position`]: a copyable handle to a record or to the end
//! - [`Iter`], [`Range`]: borrowing in-order iterators
//! - [`Record`], [`ValueRecord`], [`Comparator`], [`NodeFactory`]: capabilities
//!
//! # Sentinel
//!
//! Every link is an `Option<NodeIndex>`, with `None` standing for the
//! sentinel. The tree header holds the root and the cached minimum and
//! maximum, so `begin()`, `end()` and `prev(end())` never search.
//!
//! # Examples
//!
//! ```rust
//! use rbtree::tree::{Record, Tree};
//!
//! #[derive(Debug)]
//! struct Session {
//!     id: u64,
//!     user: &'static str,
//! }
//!
//! impl Record for Session {
//!     type Key = u64;
//!     fn key(&self) -> &u64 {
//!         &self.id
//!     }
//! }
//!
//! let mut sessions: Tree<Session> = Tree::new(true);
//! let (alice, inserted) = sessions.insert(Session { id: 7, user: "alice" });
//! assert!(inserted);
//! sessions.insert(Session { id: 3, user: "bob" });
//!
//! // Rejected: the key 7 is taken.
//! let (existing, inserted) = sessions.insert(Session { id: 7, user: "carol" });
//! assert!(!inserted);
//! assert_eq!(existing, alice);
//!
//! assert_eq!(sessions.get(sessions.begin()).map(|s| s.user), Some("bob"));
//! assert_eq!(sessions.next(sessions.begin()), alice);
//! assert_eq!(sessions.next(alice), sessions.end());
//! assert!(sessions.verify().is_ok());
//! ```

mod capability;
mod erase;
mod insert;
mod iter;
mod node;
mod position;
mod search;
mod verify;

use std::fmt;

pub use capability::{Comparator, NaturalOrder, NodeFactory, Record, RecordFactory, ValueRecord};
pub use iter::{Iter, Range};
pub use position::Position;

use crate::config::TreeConfig;
use crate::error::{ConfigError, UsageError};
use node::{Arena, Link, NodeIndex, Side};
use position::{Target, TreeId};

/// Root and cached bounds. All `None` when the tree is empty.
#[derive(Clone, Copy, Debug, Default)]
struct Header {
    root: Link,
    leftmost: Link,
    rightmost: Link,
}

/// An ordered collection of records with red-black balancing.
///
/// - `R`: the stored record type
/// - `C`: the key comparator, [`NaturalOrder`] by default
/// - `F`: the record factory, [`RecordFactory`] (insert finished records) by
///   default
///
/// A unique tree rejects a record whose key compares equal to a stored one.
/// A multi tree accepts it and places it first among the equal keys.
///
/// Dropping the tree passes every remaining record to the factory's
/// [`destroy`](NodeFactory::destroy).
pub struct Tree<R, C = NaturalOrder, F = RecordFactory>
where
    R: Record,
    F: NodeFactory<R>,
{
    id: TreeId,
    arena: Arena<R>,
    header: Header,
    len: usize,
    unique: bool,
    comparator: C,
    factory: F,
}

// =============================================================================
// Construction
// =============================================================================

impl<R> Tree<R>
where
    R: Record,
    R::Key: Ord,
{
    /// Creates an empty tree ordered by the key's [`Ord`].
    #[must_use]
    pub fn new(unique: bool) -> Self {
        Self::with_parts(unique, NaturalOrder, RecordFactory)
    }
}

impl<R> Default for Tree<R>
where
    R: Record,
    R::Key: Ord,
{
    fn default() -> Self {
        Self::new(true)
    }
}

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    /// Creates an empty tree with the given comparator and factory.
    #[must_use]
    pub fn with_parts(unique: bool, comparator: C, factory: F) -> Self {
        let config = TreeConfig {
            unique,
            ..TreeConfig::default()
        };
        Self::from_valid_config(config, comparator, factory)
    }

    /// Creates an empty tree from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` does not pass
    /// [`TreeConfig::validate`].
    pub fn with_config(config: TreeConfig, comparator: C, factory: F) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self::from_valid_config(config, comparator, factory))
    }

    fn from_valid_config(config: TreeConfig, comparator: C, factory: F) -> Self {
        Self {
            id: TreeId::fresh(),
            arena: Arena::new(config.max_span, config.initial_capacity),
            header: Header::default(),
            len: 0,
            unique: config.unique,
            comparator,
            factory,
        }
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    /// Number of records.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no records.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether equal keys are rejected.
    #[inline]
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// Number of arena slots, occupied or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// The comparator.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The record factory.
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Position of the smallest record, or `end()` when empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.position_of_link(self.header.leftmost)
    }

    /// The end position. It follows the largest record.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::end(self.id)
    }

    /// The smallest record.
    #[must_use]
    pub fn first(&self) -> Option<&R> {
        self.header.leftmost.map(|node| self.arena.record(node))
    }

    /// The largest record.
    #[must_use]
    pub fn last(&self) -> Option<&R> {
        self.header.rightmost.map(|node| self.arena.record(node))
    }

    /// The record at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or belongs to another tree.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&R> {
        self.locate(position).map(|node| self.arena.record(node))
    }

    /// The key at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or belongs to another tree.
    #[must_use]
    pub fn key(&self, position: Position) -> Option<&R::Key> {
        self.get(position).map(Record::key)
    }

    /// Whether `position` is `end()` or names a live record of this tree.
    #[must_use]
    pub fn is_valid(&self, position: Position) -> bool {
        self.resolve(position).is_ok()
    }

    /// Resolves a position to a link.
    ///
    /// # Errors
    ///
    /// [`UsageError::ForeignPosition`] for a position of another tree and
    /// [`UsageError::StalePosition`] for a position whose record was erased.
    fn resolve(&self, position: Position) -> Result<Link, UsageError> {
        if position.tree() != self.id {
            return Err(UsageError::ForeignPosition);
        }
        match position.target() {
            Target::End => Ok(None),
            Target::Node { index, generation } => {
                if self.arena.is_live(index, generation) {
                    Ok(Some(NodeIndex(index)))
                } else {
                    Err(UsageError::StalePosition)
                }
            }
        }
    }

    /// Like [`resolve`](Self::resolve), panicking on misuse.
    fn locate(&self, position: Position) -> Link {
        self.resolve(position)
            .unwrap_or_else(|error| panic!("{error}"))
    }

    fn position_of(&self, node: NodeIndex) -> Position {
        Position::node(self.id, node.0, self.arena.generation(node))
    }

    fn position_of_link(&self, link: Link) -> Position {
        link.map_or_else(|| self.end(), |node| self.position_of(node))
    }
}

impl<R, C, F> Tree<R, C, F>
where
    R: ValueRecord,
    F: NodeFactory<R>,
{
    /// The value at `position`, or `None` for `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or belongs to another tree.
    #[must_use]
    pub fn value(&self, position: Position) -> Option<&R::Value> {
        self.get(position).map(ValueRecord::value)
    }

    /// The value at `position` for in-place mutation, or `None` for `end()`.
    ///
    /// The key is not reachable through this reference, so the order of the
    /// tree cannot change.
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or belongs to another tree.
    pub fn value_mut(&mut self, position: Position) -> Option<&mut R::Value> {
        let node = self.locate(position)?;
        Some(self.arena.record_mut(node).value_mut())
    }

    /// Replaces the value at `position`, returning the old one.
    ///
    /// Returns `None`, and drops `value`, when `position` is `end()`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is stale or belongs to another tree.
    pub fn set_value(&mut self, position: Position, value: R::Value) -> Option<R::Value> {
        self.value_mut(position)
            .map(|slot| std::mem::replace(slot, value))
    }
}

// =============================================================================
// Structural helpers
// =============================================================================

impl<R, C, F> Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    /// Points whatever held `old` (a child slot of `parent`, or the root) at
    /// `new`. Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: Link, old: NodeIndex, new: Link) {
        match parent {
            None => self.header.root = new,
            Some(parent) => {
                let side = self.arena.side_of(old, parent);
                self.arena.set_child(parent, side, new);
            }
        }
    }

    /// Rotates `pivot` above its parent.
    ///
    /// The parent becomes the child of `pivot` on the side opposite the one
    /// `pivot` hung from, and the inner subtree of `pivot` moves over to the
    /// old parent.
    fn rotate_up(&mut self, pivot: NodeIndex) {
        let Some(parent) = self.arena.parent(pivot) else {
            return;
        };
        let grandparent = self.arena.parent(parent);
        let side = self.arena.side_of(pivot, parent);
        let inner = self.arena.child(pivot, side.opposite());

        self.arena.set_child(parent, side, inner);
        if let Some(inner) = inner {
            self.arena.set_parent(inner, Some(parent));
        }

        self.replace_child(grandparent, parent, Some(pivot));
        self.arena.set_parent(pivot, grandparent);

        self.arena.set_child(pivot, side.opposite(), Some(parent));
        self.arena.set_parent(parent, Some(pivot));
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

impl<R, C, F> Drop for Tree<R, C, F>
where
    R: Record,
    F: NodeFactory<R>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<R, C, F> Clone for Tree<R, C, F>
where
    R: Record + Clone,
    C: Clone,
    F: NodeFactory<R> + Clone,
{
    /// Copies records, links and arena layout into a tree with a new
    /// identity. Positions of the original do not work on the clone.
    fn clone(&self) -> Self {
        Self {
            id: TreeId::fresh(),
            arena: self.arena.clone(),
            header: self.header,
            len: self.len,
            unique: self.unique,
            comparator: self.comparator.clone(),
            factory: self.factory.clone(),
        }
    }
}

impl<R, C, F> fmt::Debug for Tree<R, C, F>
where
    R: Record + fmt::Debug,
    F: NodeFactory<R>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}
