//! # Datastore
//!
//! Key-value datastore contract with a backend-agnostic query layer.
//!
//! Backends store opaque byte values under hierarchical keys and answer
//! queries built from a prefix, filters, orders and a page window. What a
//! query returns is defined by the naive executor; every backend must
//! produce the same output for the same contents.
//!
//! ## Quick Start
//!
//! ```
//! use datastore::prelude::*;
//!
//! let store = MapDatastore::new();
//! store.put(&Key::new("/users/alice"), b"42")?;
//! store.put(&Key::new("/users/bob"), b"7")?;
//!
//! let query = Query::new()
//!     .with_prefix("/users")
//!     .order(Order::ByValue)
//!     .limit(1);
//! let first = store.query(query)?.rest()?;
//! assert_eq!(first[0].key, Key::new("/users/alice"));
//! # Ok::<(), datastore::Error>(())
//! ```
//!
//! ## Crates
//!
//! - [`datastore_core`] - keys, entries, errors
//! - [`datastore_query`] - filters, orders, queries, result streams, naive executor
//! - [`datastore_storage`] - the [`Datastore`] trait and in-memory backends

#![warn(missing_docs)]

pub mod prelude;

pub use datastore_core;
pub use datastore_query;
pub use datastore_storage;

// Re-export main entry points
pub use datastore_core::{Entry, Error, Key, Result, SizeResultExt, MISSING_SIZE};
pub use datastore_query::{Filter, Op, Order, Query, QueryRequest, Results};
pub use datastore_storage::{
    Datastore, LoggingDatastore, MapDatastore, ShardedDatastore, StoreOptions,
};
