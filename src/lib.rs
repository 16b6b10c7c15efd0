//! # rbtree
//!
//! An ordered container library built on a red-black tree whose nodes live
//! next to the caller's records in an index arena.
//!
//! ## Overview
//!
//! - **Engine**: [`tree::Tree`] stores any [`tree::Record`], orders it with a
//!   [`tree::Comparator`], and builds and disposes of records through a
//!   [`tree::NodeFactory`]. Search, insertion and deletion are O(log n).
//! - **Positions**: [`tree::Position`] is a copyable handle that stays valid
//!   while other records are inserted and erased.
//! - **Containers**: [`collections::Set`], [`collections::MultiSet`],
//!   [`collections::Map`] and [`collections::MultiMap`].
//! - **Shared access**: [`collections::SafeSet`] and
//!   [`collections::SafeMultiSet`] put a set behind one reader/writer lock.
//!
//! ## Feature Flags
//!
//! - `safe` (default): the lock-guarded sets
//! - `serde`: `Serialize`/`Deserialize` for [`config::TreeConfig`]
//! - `full`: all of the above
//!
//! ## Example
//!
//! ```rust
//! use rbtree::prelude::*;
//!
//! let mut set: Set<i32> = [5, 3, 8].into_iter().collect();
//! let (_, inserted) = set.insert(3);
//! assert!(!inserted);
//! assert_eq!(set.len(), 3);
//!
//! let mut position = set.begin();
//! let mut keys: Vec<&i32> = Vec::new();
//! while position != set.end() {
//!     keys.extend(set.key(position));
//!     position = set.next(position);
//! }
//! assert_eq!(keys, [&3, &5, &8]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use rbtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collections::*;
    pub use crate::config::TreeConfig;
    pub use crate::error::{ConfigError, CorruptionError, DuplicateKey, UsageError};
    pub use crate::tree::{
        Comparator, NaturalOrder, NodeFactory, Position, Record, RecordFactory, Tree, ValueRecord,
    };
}

pub mod collections;
pub mod config;
pub mod error;
pub mod tree;
