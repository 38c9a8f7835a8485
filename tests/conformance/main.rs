//! Conformance Test Suite
//!
//! Runs every conformance scenario against every reference backend, then
//! checks cross-backend agreement and the `QueryRequest` boundary.
//!
//! ## Key Verification Points
//!
//! 1. Point operations follow the absent/present state machine
//! 2. Query output equals the naive executor over the same contents
//! 3. Wrappers (`Arc`, `Box`, `LoggingDatastore`) change nothing observable
//! 4. Untrusted query descriptions are validated, never clamped
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all conformance tests
//! cargo test --test conformance
//!
//! # Run one backend only
//! cargo test --test conformance backends::sharded
//!
//! # With logs
//! RUST_LOG=debug cargo test --test conformance -- --nocapture
//! ```

use datastore::prelude::*;
use datastore_conformance::init_test_logging;

// Test modules
pub mod agreement;
pub mod backends;
pub mod concurrency;
pub mod requests;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

fn boxed<D: Datastore + 'static>(store: D) -> Box<dyn Datastore> {
    Box::new(store)
}

/// One fresh instance of every reference backend, with a label
pub fn all_backends() -> Vec<(&'static str, Box<dyn Datastore>)> {
    init_test_logging();
    vec![
        ("map", boxed(MapDatastore::new())),
        ("sharded", boxed(ShardedDatastore::new())),
        (
            "sharded_small",
            boxed(ShardedDatastore::with_options(&StoreOptions::small()).unwrap()),
        ),
        (
            "logging_map",
            boxed(LoggingDatastore::new("test", MapDatastore::new())),
        ),
    ]
}

/// Load `entries` into `store`
pub fn load(store: &dyn Datastore, entries: &[Entry]) {
    for e in entries {
        store.put(&e.key, &e.value).unwrap();
    }
}

/// Run `query` and sort the output by key when the query has no orders
pub fn query_normalized(store: &dyn Datastore, query: &Query) -> Vec<Entry> {
    let mut out = store.query(query.clone()).unwrap().rest().unwrap();
    if query.orders.is_empty() {
        out.sort_by(|a, b| a.key.cmp(&b.key));
    }
    out
}
