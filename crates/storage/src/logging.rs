//! Tracing wrapper around any datastore
//!
//! `LoggingDatastore` forwards every operation to the wrapped store and
//! emits a `debug!` event per call. Failures other than `NotFound` are
//! logged at `warn!`; `NotFound` is an ordinary outcome and stays at debug.

use crate::traits::Datastore;
use datastore_core::{Key, Result};
use datastore_query::{Query, Results};
use tracing::{debug, warn};

/// Datastore that logs each operation before delegating
#[derive(Debug)]
pub struct LoggingDatastore<D> {
    name: String,
    inner: D,
}

impl<D: Datastore> LoggingDatastore<D> {
    /// Wrap `inner`, tagging its events with `name`
    pub fn new(name: impl Into<String>, inner: D) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Name used in log events
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the wrapped store
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Unwrap back into the wrapped store
    pub fn into_inner(self) -> D {
        self.inner
    }

    fn log_outcome<T>(&self, op: &str, key: &Key, result: &Result<T>) {
        match result {
            Ok(_) => debug!("{}: {} {}", self.name, op, key),
            Err(e) if e.is_not_found() => debug!("{}: {} {} (not found)", self.name, op, key),
            Err(e) => warn!("{}: {} {} failed: {}", self.name, op, key, e),
        }
    }
}

impl<D: Datastore> Datastore for LoggingDatastore<D> {
    fn put(&self, key: &Key, value: &[u8]) -> Result<()> {
        let result = self.inner.put(key, value);
        self.log_outcome("put", key, &result);
        result
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        let result = self.inner.get(key);
        self.log_outcome("get", key, &result);
        result
    }

    fn has(&self, key: &Key) -> Result<bool> {
        let result = self.inner.has(key);
        self.log_outcome("has", key, &result);
        result
    }

    fn get_size(&self, key: &Key) -> Result<usize> {
        let result = self.inner.get_size(key);
        self.log_outcome("get_size", key, &result);
        result
    }

    fn delete(&self, key: &Key) -> Result<()> {
        let result = self.inner.delete(key);
        self.log_outcome("delete", key, &result);
        result
    }

    fn query(&self, query: Query) -> Result<Results> {
        debug!("{}: query {}", self.name, query);
        let result = self.inner.query(query);
        if let Err(e) = &result {
            warn!("{}: query failed: {}", self.name, e);
        }
        result
    }
}
