//! Ordered containers built on the tree engine.
//!
//! - [`Set`] / [`MultiSet`]: ordered keys, distinct or repeated
//! - [`Map`] / [`MultiMap`]: ordered key/value pairs, distinct or repeated keys
//! - [`SafeSet`] / [`SafeMultiSet`]: a set behind one reader/writer lock
//!   (feature `safe`)
//!
//! Every container hands out [`Position`](crate::tree::Position)s that stay
//! valid while other elements come and go.
//!
//! # Examples
//!
//! ```rust
//! use rbtree::collections::MultiSet;
//!
//! let mut set: MultiSet<i32> = [5, 3, 8, 3, 1].into_iter().collect();
//!
//! let lower = set.lower_bound(&3);
//! let upper = set.upper_bound(&3);
//! assert_eq!(set.key(lower), Some(&3));
//! assert_eq!(set.key(upper), Some(&5));
//! assert_eq!(set.range(lower, upper).count(), 2);
//!
//! set.erase(&3);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 5, 8]);
//! ```

mod map;
#[cfg(feature = "safe")]
mod safe_set;
mod set;

pub use map::{Iter as MapIter, Map, MapBase, MultiMap, Pair};
#[cfg(feature = "safe")]
pub use safe_set::{SafeMultiSet, SafeSet, SafeSetBase};
pub use set::{Iter as SetIter, MultiSet, Set, SetBase};
