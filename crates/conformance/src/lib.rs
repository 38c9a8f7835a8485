//! Conformance suite for datastore backends
//!
//! Backends call these scenarios from their own tests:
//!
//! ```no_run
//! use datastore_conformance::run_all;
//! use datastore_storage::MapDatastore;
//!
//! run_all(MapDatastore::new);
//! ```
//!
//! Query scenarios compare against `datastore_query::naive`, which defines
//! correct query output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fixtures;
pub mod suite;

pub use fixtures::{dataset, rand_value};
pub use suite::{
    init_test_logging, run_all, subtest_basic_put_get, subtest_empty_value, subtest_filter,
    subtest_idempotent_delete, subtest_keys_only_sizes, subtest_many_keys_and_query,
    subtest_not_founds, subtest_order, subtest_overwrite, subtest_pagination, subtest_prefix,
    subtest_query,
};
