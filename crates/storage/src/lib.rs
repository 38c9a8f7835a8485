//! Storage backends for the datastore
//!
//! This crate implements the `Datastore` contract with:
//! - MapDatastore: BTreeMap-based storage with RwLock, key-ordered scans
//! - ShardedDatastore: DashMap sharded by namespace, unordered scans
//! - LoggingDatastore: tracing wrapper around any backend
//! - StoreOptions: sizing for the sharded backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod logging;
pub mod map;
pub mod sharded;
pub mod traits;

pub use config::StoreOptions;
pub use logging::LoggingDatastore;
pub use map::MapDatastore;
pub use sharded::ShardedDatastore;
pub use traits::Datastore;
