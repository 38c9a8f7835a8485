//! Core types for the datastore contract
//!
//! - [`Key`]: normalized path-like identifier
//! - [`Entry`]: `(key, value, size)` row produced by queries
//! - [`Error`]: the error taxonomy every operation reports through

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod key;

pub use entry::Entry;
pub use error::{Error, Result, SizeResultExt, MISSING_SIZE};
pub use key::Key;
