//! The backend contract
//!
//! Per key the contract is a three-state machine:
//!
//! ```text
//! Absent --put--> Present(v) --put--> Present(v') --delete--> Absent
//! ```
//!
//! `get`, `has` and `get_size` only observe. A read that starts after a
//! `put` to the same key has returned must see that write; concurrent puts
//! to one key settle on one of the written values.

use datastore_core::{Key, Result};
use datastore_query::{Query, Results};
use std::sync::Arc;

/// Key-value storage with a query entry point
///
/// Implementations may execute queries however they like (index scans,
/// pushed-down filters, ...) as long as the output equals
/// [`datastore_query::naive::execute`] over the same contents, modulo order
/// when the query has no orders.
pub trait Datastore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &Key, value: &[u8]) -> Result<()>;

    /// Exact bytes last stored under `key`
    ///
    /// Absent keys report `Error::NotFound` and nothing else.
    fn get(&self, key: &Key) -> Result<Vec<u8>>;

    /// Whether a value is currently stored under `key`
    ///
    /// Absence is `Ok(false)`, never `NotFound`.
    fn has(&self, key: &Key) -> Result<bool>;

    /// Length of the stored value
    ///
    /// Absent keys report `Error::NotFound`; see
    /// [`SizeResultExt`](datastore_core::SizeResultExt) for the `-1` sentinel.
    fn get_size(&self, key: &Key) -> Result<usize>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &Key) -> Result<()>;

    /// Run `query` against a point-in-time view of the contents
    fn query(&self, query: Query) -> Result<Results>;
}

impl<D: Datastore + ?Sized> Datastore for Arc<D> {
    fn put(&self, key: &Key, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        (**self).get(key)
    }

    fn has(&self, key: &Key) -> Result<bool> {
        (**self).has(key)
    }

    fn get_size(&self, key: &Key) -> Result<usize> {
        (**self).get_size(key)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        (**self).delete(key)
    }

    fn query(&self, query: Query) -> Result<Results> {
        (**self).query(query)
    }
}

impl<D: Datastore + ?Sized> Datastore for Box<D> {
    fn put(&self, key: &Key, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        (**self).get(key)
    }

    fn has(&self, key: &Key) -> Result<bool> {
        (**self).has(key)
    }

    fn get_size(&self, key: &Key) -> Result<usize> {
        (**self).get_size(key)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        (**self).delete(key)
    }

    fn query(&self, query: Query) -> Result<Results> {
        (**self).query(query)
    }
}
