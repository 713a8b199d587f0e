//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`CacheError::InvalidArgument`]: returned by fallible constructors
//!   when a configuration parameter is out of range (zero capacity, zero
//!   shard count, and so on). Raised before any cache state is allocated.
//! - [`CacheError::NotFound`]: returned by explicit `remove` on the engines
//!   that surface missing keys as an error.
//!
//! Internal invariant violations (a stale list handle, an empty minimum
//! frequency bucket) are programmer errors and panic via `expect` or
//! `debug_assert!`; they are never propagated as values.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::CacheError;
//! use evictkit::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<u64, String>, CacheError> = LruCache::new(100);
//! assert!(cache.is_ok());
//!
//! // Zero capacity is caught without panicking.
//! let bad = LruCache::<u64, String>::new(0);
//! assert!(matches!(bad, Err(CacheError::InvalidArgument(_))));
//! ```

use std::fmt;

/// Error returned by cache constructors and explicit removals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A construction parameter is out of range. Carries a human-readable
    /// description of which parameter failed validation.
    InvalidArgument(String),
    /// An explicit `remove` named a key that is not resident.
    NotFound,
}

impl CacheError {
    /// Creates an `InvalidArgument` error with the given description.
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::NotFound => f.write_str("key not found"),
        }
    }
}

impl std::error::Error for CacheError {}
