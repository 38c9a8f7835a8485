//! Convenient imports for the datastore.
//!
//! ```
//! use datastore::prelude::*;
//!
//! let store = ShardedDatastore::new();
//! store.put(&Key::new("/k"), b"v")?;
//! assert!(store.has(&Key::new("/k"))?);
//! # Ok::<(), datastore::Error>(())
//! ```

// Contract and backends
pub use datastore_storage::{
    Datastore, LoggingDatastore, MapDatastore, ShardedDatastore, StoreOptions,
};

// Error handling
pub use datastore_core::{Error, Result, SizeResultExt};

// Core types
pub use datastore_core::{Entry, Key};

// Query model
pub use datastore_query::{Filter, Op, Order, Predicate, Query, QueryRequest, Results};
