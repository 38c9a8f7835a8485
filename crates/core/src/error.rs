//! Error taxonomy shared by every datastore operation.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | `NotFound` | `get` / `get_size` on an absent key, nothing else |
//! | `InvalidKey` | `Key::raw` on a string that is not normalized |
//! | `InvalidQuery` | malformed query fields (never clamped) |
//! | `Config` | backend options that cannot be honored |
//! | `Backend` / `Io` | underlying storage failures, always propagated |

use crate::key::Key;
use thiserror::Error;

/// Size reported alongside `NotFound` by size lookups
pub const MISSING_SIZE: i64 = -1;

/// All datastore errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Key is not present
    #[error("datastore: key not found: {key}")]
    NotFound {
        /// The key that was looked up
        key: Key,
    },

    /// Key string is not in normalized form
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// The rejected input
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// Query fields are malformed
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Backend options are inconsistent
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Opaque backend failure
    #[error("backend failure: {0}")]
    Backend(String),

    /// I/O failure inside a backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for datastore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a `NotFound` for `key`
    pub fn not_found(key: &Key) -> Self {
        Error::NotFound { key: key.clone() }
    }

    /// Wrap any displayable backend error
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Error::Backend(err.to_string())
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is an invalid-query error.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Error::InvalidQuery(_))
    }

    /// Check if this error came from the backend itself.
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend(_) | Error::Io(_))
    }
}

/// Sentinel channel for size lookups
///
/// A size lookup reports absence twice: as `Err(NotFound)` and as a size of
/// [`MISSING_SIZE`]. Callers that only look at the number use this.
///
/// ```
/// use datastore_core::{Error, Key, SizeResultExt, MISSING_SIZE};
///
/// let found: datastore_core::Result<usize> = Ok(16);
/// assert_eq!(found.size_or_missing(), 16);
///
/// let missing: datastore_core::Result<usize> = Err(Error::not_found(&Key::new("/x")));
/// assert_eq!(missing.size_or_missing(), MISSING_SIZE);
/// ```
pub trait SizeResultExt {
    /// The size, or `-1` when the lookup failed
    fn size_or_missing(&self) -> i64;
}

impl SizeResultExt for Result<usize> {
    fn size_or_missing(&self) -> i64 {
        match self {
            Ok(size) => i64::try_from(*size).unwrap_or(i64::MAX),
            Err(_) => MISSING_SIZE,
        }
    }
}
