//! Conformance scenarios per backend

use crate::*;
use datastore_conformance::run_all;
use std::sync::Arc;

#[test]
fn map() {
    init_test_logging();
    run_all(MapDatastore::new);
}

#[test]
fn sharded() {
    init_test_logging();
    run_all(ShardedDatastore::new);
}

#[test]
fn sharded_with_options() {
    init_test_logging();
    run_all(|| ShardedDatastore::with_options(&StoreOptions::concurrent()).unwrap());
}

#[test]
fn logging_map() {
    init_test_logging();
    run_all(|| LoggingDatastore::new("map", MapDatastore::new()));
}

#[test]
fn logging_sharded() {
    init_test_logging();
    run_all(|| LoggingDatastore::new("sharded", ShardedDatastore::new()));
}

#[test]
fn arc_wrapped() {
    init_test_logging();
    run_all(|| Arc::new(MapDatastore::new()));
}

#[test]
fn boxed_trait_object() {
    init_test_logging();
    run_all(|| -> Box<dyn Datastore> { Box::new(ShardedDatastore::new()) });
}

// =============================================================================
// Scenarios on one shared store
// =============================================================================

#[test]
fn scenarios_leave_store_empty() {
    use datastore_conformance::suite::*;

    // Query scenarios delete what they load, so they can share one store
    let store = MapDatastore::new();
    subtest_order(&store);
    subtest_filter(&store);
    subtest_many_keys_and_query(&store);
    subtest_pagination(&store);
    assert!(store.is_empty());
}

// =============================================================================
// The suite rejects backends that get filters wrong
// =============================================================================

/// Backend that rewrites filters before delegating to a correct store
struct RewritingDatastore {
    inner: MapDatastore,
    rewrite: fn(Filter) -> Filter,
}

impl RewritingDatastore {
    fn new(rewrite: fn(Filter) -> Filter) -> Self {
        Self {
            inner: MapDatastore::new(),
            rewrite,
        }
    }
}

impl Datastore for RewritingDatastore {
    fn put(&self, key: &Key, value: &[u8]) -> Result<()> {
        self.inner.put(key, value)
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        self.inner.get(key)
    }

    fn has(&self, key: &Key) -> Result<bool> {
        self.inner.has(key)
    }

    fn get_size(&self, key: &Key) -> Result<usize> {
        self.inner.get_size(key)
    }

    fn delete(&self, key: &Key) -> Result<()> {
        self.inner.delete(key)
    }

    fn query(&self, mut query: Query) -> Result<Results> {
        query.filters = query.filters.into_iter().map(self.rewrite).collect();
        self.inner.query(query)
    }
}

/// `KeyPrefix` evaluated as a raw string prefix
fn raw_string_prefix(filter: Filter) -> Filter {
    match filter {
        Filter::KeyPrefix { prefix } => {
            Filter::custom(move |e: &Entry| e.key.as_str().starts_with(prefix.as_str()))
        }
        other => other,
    }
}

/// `<=` on keys evaluated as `<`
fn strict_key_less_or_equal(filter: Filter) -> Filter {
    match filter {
        Filter::KeyCompare {
            op: Op::LessThanOrEqual,
            key,
        } => Filter::key_compare(Op::LessThan, key),
        other => other,
    }
}

#[test]
fn test_rewriting_backend_passes_when_faithful() {
    datastore_conformance::subtest_prefix(&RewritingDatastore::new(|f| f));
    datastore_conformance::subtest_filter(&RewritingDatastore::new(|f| f));
}

#[test]
#[should_panic(expected = "FILTER")]
fn test_raw_string_prefix_filter_rejected() {
    datastore_conformance::subtest_prefix(&RewritingDatastore::new(raw_string_prefix));
}

#[test]
#[should_panic(expected = "expected")]
fn test_wrong_key_operator_rejected() {
    datastore_conformance::subtest_filter(&RewritingDatastore::new(strict_key_less_or_equal));
}
