//! Conformance scenarios
//!
//! Each `subtest_*` drives one backend through a deterministic scenario and
//! panics with a descriptive message on the first violation, so they can be
//! called straight from `#[test]` functions. Query scenarios load the
//! [`dataset`](crate::fixtures::dataset), run the query, compare the output
//! with the naive executor over the same entries and delete everything again.
//!
//! Backends that need isolation between scenarios should go through
//! [`run_all`], which builds a fresh store per scenario.

use crate::fixtures::{dataset, rand_value};
use datastore_core::{Entry, Key, SizeResultExt, MISSING_SIZE};
use datastore_query::filter::Predicate;
use datastore_query::{naive, order, Filter, Op, Order, Query};
use datastore_storage::Datastore;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness, honoring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run every scenario against a fresh store from `factory`
pub fn run_all<D, F>(factory: F)
where
    D: Datastore,
    F: Fn() -> D,
{
    let run = |name: &str, subtest: fn(&D)| {
        info!("running subtest {}", name);
        let store = factory();
        subtest(&store);
    };

    run("basic_put_get", subtest_basic_put_get::<D>);
    run("not_founds", subtest_not_founds::<D>);
    run("order", subtest_order::<D>);
    run("filter", subtest_filter::<D>);
    run("many_keys_and_query", subtest_many_keys_and_query::<D>);
    run("overwrite", subtest_overwrite::<D>);
    run("idempotent_delete", subtest_idempotent_delete::<D>);
    run("empty_value", subtest_empty_value::<D>);
    run("pagination", subtest_pagination::<D>);
    run("keys_only_sizes", subtest_keys_only_sizes::<D>);
    run("prefix", subtest_prefix::<D>);
}

// ============================================================================
// Point operations
// ============================================================================

fn assert_size<D: Datastore + ?Sized>(ds: &D, key: &Key, expected: usize, when: &str) {
    match ds.get_size(key) {
        Ok(size) => assert_eq!(
            size, expected,
            "incorrect size {}: expected {}, got {}",
            when, expected, size
        ),
        Err(e) => panic!("error getting size {}: {}", when, e),
    }
}

fn assert_missing<D: Datastore + ?Sized>(ds: &D, key: &Key, when: &str) {
    match ds.get(key) {
        Err(e) if e.is_not_found() => {}
        Err(e) => panic!("wrong error on get {}: {}", when, e),
        Ok(v) => panic!("expected NotFound on get {}, got {} bytes", when, v.len()),
    }
    match ds.has(key) {
        Ok(have) => assert!(!have, "has returned true for {} {}", key, when),
        Err(e) => panic!("error calling has {}: {}", when, e),
    }
    let size = ds.get_size(key);
    match &size {
        Err(e) if e.is_not_found() => {}
        Err(e) => panic!("wrong error getting size {}: {}", when, e),
        Ok(s) => panic!("expected error getting size {}, got {}", when, s),
    }
    assert_eq!(
        size.size_or_missing(),
        MISSING_SIZE,
        "expected missing size to be -1 {}",
        when
    );
}

/// Put, observe, delete and observe absence of one key
pub fn subtest_basic_put_get<D: Datastore + ?Sized>(ds: &D) {
    let k = Key::new("foo");
    let val = b"Hello Datastore!";

    ds.put(&k, val)
        .unwrap_or_else(|e| panic!("error putting to datastore: {}", e));

    let have = ds
        .has(&k)
        .unwrap_or_else(|e| panic!("error calling has on key we just put: {}", e));
    assert!(have, "should have key foo, has returned false");
    assert_size(ds, &k, val.len(), "after put");

    let out = ds
        .get(&k)
        .unwrap_or_else(|e| panic!("error getting value after put: {}", e));
    assert_eq!(out, val, "value received on get wasn't what we expected");

    let have = ds
        .has(&k)
        .unwrap_or_else(|e| panic!("error calling has after get: {}", e));
    assert!(have, "should have key foo, has returned false");
    assert_size(ds, &k, val.len(), "after get");

    ds.delete(&k)
        .unwrap_or_else(|e| panic!("error calling delete: {}", e));
    assert_missing(ds, &k, "after delete");
}

/// Every read of a never-written key reports absence
pub fn subtest_not_founds<D: Datastore + ?Sized>(ds: &D) {
    assert_missing(ds, &Key::new("notreal"), "for key that doesn't exist");
}

/// A second put replaces the first
pub fn subtest_overwrite<D: Datastore + ?Sized>(ds: &D) {
    let k = Key::new("/overwrite");
    ds.put(&k, b"first").unwrap();
    ds.put(&k, b"second value").unwrap();

    assert_eq!(ds.get(&k).unwrap(), b"second value", "overwrite lost");
    assert_size(ds, &k, 12, "after overwrite");

    let all = ds.query(Query::new()).unwrap().rest().unwrap();
    assert_eq!(all.len(), 1, "overwrite produced {} entries", all.len());
}

/// Deleting an absent key, or the same key twice, succeeds
pub fn subtest_idempotent_delete<D: Datastore + ?Sized>(ds: &D) {
    let k = Key::new("/never");
    ds.delete(&k)
        .unwrap_or_else(|e| panic!("delete of absent key failed: {}", e));

    ds.put(&k, b"v").unwrap();
    ds.delete(&k).unwrap();
    ds.delete(&k)
        .unwrap_or_else(|e| panic!("second delete failed: {}", e));
    assert_missing(ds, &k, "after double delete");
}

/// An empty value is present, not absent
pub fn subtest_empty_value<D: Datastore + ?Sized>(ds: &D) {
    let k = Key::new("/empty");
    ds.put(&k, b"").unwrap();

    assert!(ds.has(&k).unwrap(), "empty value reported absent");
    assert!(ds.get(&k).unwrap().is_empty(), "empty value came back non-empty");
    assert_size(ds, &k, 0, "of empty value");

    let all = ds.query(Query::new()).unwrap().rest().unwrap();
    assert_eq!(all.len(), 1, "empty value missing from query");
    assert_eq!(all[0].size, 0);
}

// ============================================================================
// Query scenarios
// ============================================================================

/// Orders, alone and chained, must match the naive executor element by element
pub fn subtest_order<D: Datastore + ?Sized>(ds: &D) {
    let chains: Vec<Vec<Order>> = vec![
        vec![Order::ByKey],
        vec![Order::ByKeyDescending],
        vec![Order::ByValue],
        vec![Order::ByValueDescending],
        vec![Order::ByValue, Order::ByKey],
        vec![Order::by_function(|a, b| a.value.cmp(&b.value))],
    ];
    for orders in chains {
        let mut q = Query::new();
        for o in orders {
            q = q.order(o);
        }
        subtest_query(ds, q);
    }
}

/// Keeps entries whose key has an even number of bytes
#[derive(Debug, Clone, Copy)]
struct EvenKeyLength;

impl Predicate for EvenKeyLength {
    fn matches(&self, entry: &Entry) -> bool {
        entry.key.as_str().len() % 2 == 0
    }
}

/// Built-in and custom filters must select what the naive executor selects
///
/// Every operator is exercised for both key and value comparisons.
pub fn subtest_filter<D: Datastore + ?Sized>(ds: &D) {
    let mut filters = Vec::new();
    for op in Op::ALL {
        filters.push(Filter::key_compare(op, "/50key50"));
        filters.push(Filter::value_compare(op, rand_value()));
    }
    filters.push(Filter::key_compare(Op::Equal, "/0key0"));
    filters.push(Filter::key_compare(Op::LessThan, "/2"));
    filters.push(Filter::key_prefix("/0key0"));
    filters.push(Filter::custom(EvenKeyLength));

    for filter in filters {
        subtest_query(ds, Query::new().filter(filter));
    }
}

/// Keys-only query over the whole dataset
pub fn subtest_many_keys_and_query<D: Datastore + ?Sized>(ds: &D) {
    subtest_query(ds, Query::new().keys_only(true));
}

/// Offset and limit slice the ordered output; out-of-range offsets are empty
pub fn subtest_pagination<D: Datastore + ?Sized>(ds: &D) {
    let cases = [(0, 10), (10, 10), (95, 10), (100, 0), (250, 5), (0, 1000)];
    for (offset, limit) in cases {
        subtest_query(
            ds,
            Query::new().order(Order::ByKey).offset(offset).limit(limit),
        );
    }
    subtest_query(
        ds,
        Query::new()
            .order(Order::ByValueDescending)
            .offset(3)
            .limit(7)
            .keys_only(true),
    );
}

/// Keys-only output carries empty values and the stored sizes
pub fn subtest_keys_only_sizes<D: Datastore + ?Sized>(ds: &D) {
    let sizes = [0usize, 1, 17, 64, 300];
    for (i, size) in sizes.iter().enumerate() {
        ds.put(&Key::new(format!("/sized/{}", i)), &vec![7u8; *size])
            .unwrap();
    }

    let out = ds
        .query(Query::new().keys_only(true).order(Order::ByKey))
        .unwrap()
        .rest()
        .unwrap();
    assert_eq!(out.len(), sizes.len());
    for (entry, size) in out.iter().zip(sizes) {
        assert!(
            entry.value.is_empty(),
            "keys-only entry {} carried a value",
            entry.key
        );
        assert_eq!(entry.size, size, "wrong size for {}", entry.key);
    }
}

/// Query prefixes and `KeyPrefix` filters select whole-segment descendants only
pub fn subtest_prefix<D: Datastore + ?Sized>(ds: &D) {
    for k in ["/p", "/p/a", "/p/a/b", "/p/ab", "/p-a", "/pa", "/q/p/a"] {
        ds.put(&Key::new(k), k.as_bytes()).unwrap();
    }

    let cases: [(&str, &[&str]); 4] = [
        ("/p/a", &["/p/a", "/p/a/b"]),
        ("/p", &["/p", "/p/a", "/p/a/b", "/p/ab"]),
        ("/pa", &["/pa"]),
        ("/nothing", &[]),
    ];
    for (prefix, expected) in cases {
        let by_query = Query::new().with_prefix(prefix).order(Order::ByKey);
        let by_filter = Query::new()
            .filter(Filter::key_prefix(prefix))
            .order(Order::ByKey);
        for q in [by_query, by_filter] {
            let out = ds
                .query(q.clone())
                .unwrap_or_else(|e| panic!("calling query {}: {}", q, e))
                .rest()
                .unwrap();
            let keys: Vec<&str> = out.iter().map(|e| e.key.as_str()).collect();
            assert_eq!(keys, expected, "query {}", q);
        }
    }

    // The root prefix selects everything, either way
    let all = ds.query(Query::new().with_prefix("/")).unwrap().rest().unwrap();
    assert_eq!(all.len(), 7);
    let all = ds
        .query(Query::new().filter(Filter::key_prefix("/")))
        .unwrap()
        .rest()
        .unwrap();
    assert_eq!(all.len(), 7);
}

fn load<D: Datastore + ?Sized>(ds: &D) -> Vec<Entry> {
    let input = dataset();
    debug!("putting {} values", input.len());
    for (i, e) in input.iter().enumerate() {
        ds.put(&e.key, &e.value)
            .unwrap_or_else(|err| panic!("error on put[{}]: {}", i, err));
    }
    input
}

fn unload<D: Datastore + ?Sized>(ds: &D, input: &[Entry]) {
    debug!("deleting all keys");
    for e in input {
        ds.delete(&e.key)
            .unwrap_or_else(|err| panic!("error deleting {}: {}", e.key, err));
    }
}

/// Load the dataset, run `q`, compare with the naive executor, clean up
pub fn subtest_query<D: Datastore + ?Sized>(ds: &D, q: Query) {
    let input = load(ds);

    debug!("getting values back");
    for (i, e) in input.iter().enumerate() {
        let val = ds
            .get(&e.key)
            .unwrap_or_else(|err| panic!("error on get[{}]: {}", i, err));
        assert_eq!(
            val, e.value,
            "input value didn't match the one returned from get"
        );
    }

    debug!("querying values: {}", q);
    let results = ds
        .query(q.clone())
        .unwrap_or_else(|e| panic!("calling query {}: {}", q, e));
    let mut actual = results
        .rest()
        .unwrap_or_else(|e| panic!("query result error: {}", e));

    debug!("verifying query output");
    let mut expected = naive::execute_to_vec(&q, input.clone())
        .unwrap_or_else(|e| panic!("naive query error: {}", e));
    assert_eq!(
        actual.len(),
        expected.len(),
        "query {}: expected {} results, got {}",
        q,
        expected.len(),
        actual.len()
    );

    if q.orders.is_empty() {
        order::sort(&[Order::ByKey], &mut actual);
        order::sort(&[Order::ByKey], &mut expected);
    }
    for (i, (a, e)) in actual.iter().zip(&expected).enumerate() {
        assert_eq!(
            a.key, e.key,
            "query {}: for result {}, expected key {}, got {}",
            q, i, e.key, a.key
        );
        if q.keys_only {
            assert!(a.value.is_empty(), "keys-only result {} has a value", a.key);
        } else {
            assert_eq!(a.value, e.value, "value mismatch for result {} (key={})", i, e.key);
        }
        assert_eq!(a.size, e.size, "size mismatch for result {} (key={})", i, e.key);
    }

    unload(ds, &input);
}
