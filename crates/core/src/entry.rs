//! Query result rows

use crate::key::Key;

/// A materialized `(key, value, size)` row produced by query execution
///
/// `size` is the logical stored size of the value. In keys-only results the
/// value is empty but `size` still reports what is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry key
    pub key: Key,
    /// Stored bytes (empty in keys-only results)
    pub value: Vec<u8>,
    /// Length of the stored value
    pub size: usize,
}

impl Entry {
    /// Entry carrying its value; `size` is the value length
    pub fn new(key: Key, value: Vec<u8>) -> Self {
        let size = value.len();
        Self { key, value, size }
    }

    /// Entry without a value that still reports the stored size
    pub fn key_only(key: Key, size: usize) -> Self {
        Self {
            key,
            value: Vec::new(),
            size,
        }
    }

    /// Drop the value, keeping key and size
    pub fn into_key_only(self) -> Self {
        Self::key_only(self.key, self.size)
    }
}
