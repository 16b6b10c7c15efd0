//! Tree construction settings.
//!
//! [`TreeConfig`] carries the uniqueness mode and the arena growth policy.
//! Settings built through the builder methods are always valid; settings
//! that arrive some other way (a struct literal, or deserialization with the
//! `serde` feature) are checked by [`TreeConfig::validate`], which
//! [`Tree::with_config`](crate::tree::Tree::with_config) calls.
//!
//! # Example
//!
//! ```rust
//! use rbtree::config::TreeConfig;
//!
//! let config = TreeConfig::multi().with_max_span(100).with_initial_capacity(64);
//! assert!(!config.unique);
//! assert_eq!(config.max_span, 96);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;

/// Smallest arena span, in slots.
pub const MIN_SPAN: usize = 8;

/// Spans are multiples of this many slots.
pub const SPAN_ALIGNMENT: usize = 8;

/// Largest span used when none is configured.
pub const DEFAULT_MAX_SPAN: usize = 1024;

/// Settings for a [`Tree`](crate::tree::Tree).
///
/// # Fields
///
/// - `unique`: reject keys that compare equal to a stored key
/// - `max_span`: upper bound on how many slots one arena growth step adds
/// - `initial_capacity`: slots reserved up front
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    /// Whether equal keys are rejected.
    pub unique: bool,
    /// Maximum number of slots added by one arena growth step.
    pub max_span: usize,
    /// Number of slots to allocate when the tree is built.
    pub initial_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            unique: true,
            max_span: DEFAULT_MAX_SPAN,
            initial_capacity: 0,
        }
    }
}

impl TreeConfig {
    /// Default settings for a unique-key tree.
    #[must_use]
    pub fn unique() -> Self {
        Self::default()
    }

    /// Default settings for a multi-key tree.
    #[must_use]
    pub fn multi() -> Self {
        Self {
            unique: false,
            ..Self::default()
        }
    }

    /// Sets the maximum growth span.
    ///
    /// The value is rounded down to a multiple of [`SPAN_ALIGNMENT`] and
    /// raised to [`MIN_SPAN`] if smaller.
    #[must_use]
    pub fn with_max_span(mut self, max_span: usize) -> Self {
        self.max_span = (max_span / SPAN_ALIGNMENT * SPAN_ALIGNMENT).max(MIN_SPAN);
        self
    }

    /// Sets the number of slots allocated up front.
    #[must_use]
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SpanTooSmall`] if `max_span` is below
    /// [`MIN_SPAN`], and [`ConfigError::SpanNotAligned`] if it is not a
    /// multiple of [`SPAN_ALIGNMENT`].
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.max_span < MIN_SPAN {
            return Err(ConfigError::SpanTooSmall {
                value: self.max_span,
                minimum: MIN_SPAN,
            });
        }
        if self.max_span % SPAN_ALIGNMENT != 0 {
            return Err(ConfigError::SpanNotAligned {
                value: self.max_span,
                alignment: SPAN_ALIGNMENT,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_default_is_unique_with_default_span() {
        let config = TreeConfig::default();
        assert!(config.unique);
        assert_eq!(config.max_span, DEFAULT_MAX_SPAN);
        assert_eq!(config.initial_capacity, 0);
    }

    #[rstest]
    fn test_multi_clears_unique_flag() {
        assert!(!TreeConfig::multi().unique);
    }

    #[rstest]
    #[case(0, 8)]
    #[case(7, 8)]
    #[case(8, 8)]
    #[case(15, 8)]
    #[case(16, 16)]
    #[case(1000, 1000)]
    #[case(1001, 1000)]
    fn test_with_max_span_normalizes(#[case] requested: usize, #[case] expected: usize) {
        let config = TreeConfig::default().with_max_span(requested);
        assert_eq!(config.max_span, expected);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_validate_rejects_small_span() {
        let config = TreeConfig {
            max_span: 4,
            ..TreeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpanTooSmall {
                value: 4,
                minimum: MIN_SPAN
            })
        );
    }

    #[rstest]
    fn test_validate_rejects_unaligned_span() {
        let config = TreeConfig {
            max_span: 20,
            ..TreeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpanNotAligned {
                value: 20,
                alignment: SPAN_ALIGNMENT
            })
        );
    }
}
