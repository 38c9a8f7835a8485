//! Sharded in-memory backend
//!
//! Replaces RwLock + BTreeMap with DashMap + HashMap.
//! Sharded writes, O(1) lookups, no global ordering.
//!
//! # Design
//!
//! - DashMap: one entry per namespace (first key segment), lock-sharded
//! - FxHashMap: O(1) lookups, fast non-crypto hash
//! - Per-namespace: writers to different namespaces never contend
//!
//! Scans visit namespaces and keys in hash order, so queries without orders
//! come back in no particular order.

use crate::config::StoreOptions;
use crate::traits::Datastore;
use datastore_core::{Entry, Error, Key, Result};
use datastore_query::{naive, Query, Results};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Per-namespace shard containing that namespace's keys
#[derive(Debug, Default)]
struct Shard {
    data: FxHashMap<Key, Vec<u8>>,
}

impl Shard {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Namespace a key is stored under: its first segment, `""` for the root
fn namespace_of(key: &Key) -> &str {
    key.segments().next().unwrap_or("")
}

/// Sharded datastore - DashMap by namespace, HashMap within
///
/// # Thread Safety
///
/// - get(): read-locks one DashMap shard
/// - put(): write-locks only the target namespace's shard
/// - query(): copies matching entries out shard by shard; the returned
///   stream holds no lock
pub struct ShardedDatastore {
    shards: DashMap<String, Shard>,
}

impl ShardedDatastore {
    /// Create with default options
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
        }
    }

    /// Create with explicit sizing
    pub fn with_options(options: &StoreOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            shards: DashMap::with_capacity_and_shard_amount(
                options.initial_capacity,
                options.shard_amount,
            ),
        })
    }

    /// Get number of namespaces holding data
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Get total number of entries across all namespaces
    pub fn total_entries(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    /// Copy out entries `query` selects, visiting only the shard a prefix
    /// pins down when there is one
    fn scan(&self, query: &Query) -> Vec<Entry> {
        let collect = |shard: &Shard, out: &mut Vec<Entry>| {
            for (key, value) in &shard.data {
                let entry = Entry::new(key.clone(), value.clone());
                if query.matches(&entry) {
                    out.push(entry);
                }
            }
        };

        let mut out = Vec::new();
        match query.effective_prefix() {
            Some(prefix) => {
                if let Some(shard) = self.shards.get(namespace_of(prefix)) {
                    collect(&shard, &mut out);
                }
            }
            None => {
                for shard in self.shards.iter() {
                    collect(shard.value(), &mut out);
                }
            }
        }
        out
    }
}

impl Default for ShardedDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedDatastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedDatastore")
            .field("shard_count", &self.shard_count())
            .field("total_entries", &self.total_entries())
            .finish()
    }
}

impl Datastore for ShardedDatastore {
    fn put(&self, key: &Key, value: &[u8]) -> Result<()> {
        self.shards
            .entry(namespace_of(key).to_string())
            .or_default()
            .data
            .insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        self.shards
            .get(namespace_of(key))
            .and_then(|shard| shard.data.get(key).cloned())
            .ok_or_else(|| Error::not_found(key))
    }

    fn has(&self, key: &Key) -> Result<bool> {
        Ok(self
            .shards
            .get(namespace_of(key))
            .map(|shard| shard.data.contains_key(key))
            .unwrap_or(false))
    }

    fn get_size(&self, key: &Key) -> Result<usize> {
        self.shards
            .get(namespace_of(key))
            .and_then(|shard| shard.data.get(key).map(Vec::len))
            .ok_or_else(|| Error::not_found(key))
    }

    fn delete(&self, key: &Key) -> Result<()> {
        let namespace = namespace_of(key);
        let now_empty = match self.shards.get_mut(namespace) {
            Some(mut shard) => {
                shard.data.remove(key);
                shard.is_empty()
            }
            None => false,
        };
        if now_empty {
            // Re-checked under the map lock: a concurrent put may have refilled it
            self.shards.remove_if(namespace, |_, shard| shard.is_empty());
        }
        Ok(())
    }

    fn query(&self, query: Query) -> Result<Results> {
        let entries = self.scan(&query);
        debug!(query = %query, matched = entries.len(), "sharded query");

        let mut results = Results::with_entries(query.clone(), entries);
        if !query.orders.is_empty() {
            results = naive::naive_order(query.orders.clone(), results);
        }
        results = naive::naive_offset(query.offset, results);
        results = naive::naive_limit(query.limit, results);
        if query.keys_only {
            results = naive::naive_keys_only(results);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datastore_core::SizeResultExt;
    use datastore_query::{Filter, Op, Order};
    use std::sync::Arc;
    use std::thread;

    fn key(s: &str) -> Key {
        Key::new(s)
    }

    #[test]
    fn test_sharded_store_creation() {
        let store = ShardedDatastore::new();
        assert_eq!(store.shard_count(), 0);
        assert_eq!(store.total_entries(), 0);
    }

    #[test]
    fn test_with_options() {
        let store = ShardedDatastore::with_options(&StoreOptions::small()).unwrap();
        assert_eq!(store.shard_count(), 0);

        let bad = StoreOptions {
            shard_amount: 3,
            ..Default::default()
        };
        assert!(matches!(
            ShardedDatastore::with_options(&bad),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_debug_impl() {
        let store = ShardedDatastore::new();
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("ShardedDatastore"));
        assert!(debug_str.contains("shard_count"));
    }

    // ========================================================================
    // Get/Put/Delete Operations
    // ========================================================================

    #[test]
    fn test_put_and_get() {
        let store = ShardedDatastore::new();
        store.put(&key("/users/alice"), b"42").unwrap();

        assert_eq!(store.get(&key("/users/alice")).unwrap(), b"42");
        assert_eq!(store.get_size(&key("/users/alice")).unwrap(), 2);
        assert!(store.has(&key("/users/alice")).unwrap());
    }

    #[test]
    fn test_get_nonexistent() {
        let store = ShardedDatastore::new();
        assert!(store.get(&key("/nope")).unwrap_err().is_not_found());
        assert!(!store.has(&key("/nope")).unwrap());
        assert_eq!(store.get_size(&key("/nope")).size_or_missing(), -1);
    }

    #[test]
    fn test_overwrite() {
        let store = ShardedDatastore::new();
        store.put(&key("/k"), b"1").unwrap();
        store.put(&key("/k"), b"2").unwrap();
        assert_eq!(store.get(&key("/k")).unwrap(), b"2");
        assert_eq!(store.total_entries(), 1);
    }

    #[test]
    fn test_delete_drops_empty_namespace() {
        let store = ShardedDatastore::new();
        store.put(&key("/ns/a"), b"x").unwrap();
        store.put(&key("/ns/b"), b"y").unwrap();
        store.put(&key("/other"), b"z").unwrap();
        assert_eq!(store.shard_count(), 2);

        store.delete(&key("/ns/a")).unwrap();
        assert_eq!(store.shard_count(), 2);
        store.delete(&key("/ns/b")).unwrap();
        assert_eq!(store.shard_count(), 1);
        assert_eq!(store.total_entries(), 1);

        // Deleting again is fine
        store.delete(&key("/ns/b")).unwrap();
    }

    #[test]
    fn test_namespaces_isolated() {
        let store = ShardedDatastore::new();
        store.put(&key("/run1/key"), b"1").unwrap();
        store.put(&key("/run2/key"), b"2").unwrap();
        store.put(&key("/"), b"root").unwrap();

        assert_eq!(store.get(&key("/run1/key")).unwrap(), b"1");
        assert_eq!(store.get(&key("/run2/key")).unwrap(), b"2");
        assert_eq!(store.get(&Key::root()).unwrap(), b"root");
        assert_eq!(store.shard_count(), 3);
        assert_eq!(store.total_entries(), 3);
    }

    #[test]
    fn test_concurrent_writes_different_namespaces() {
        let store = Arc::new(ShardedDatastore::new());

        // 10 threads, each with its own namespace, writing 100 keys
        let handles: Vec<_> = (0..10)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let k = Key::new(format!("/ns{}/key{}", t, i));
                        store.put(&k, &[i as u8]).unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.shard_count(), 10);
        assert_eq!(store.total_entries(), 1000);
    }

    // ========================================================================
    // Query Execution
    // ========================================================================

    #[test]
    fn test_prefix_query_visits_one_namespace() {
        let store = ShardedDatastore::new();
        store.put(&key("/a/x"), b"1").unwrap();
        store.put(&key("/a/y/z"), b"2").unwrap();
        store.put(&key("/ab/x"), b"3").unwrap();
        store.put(&key("/a"), b"4").unwrap();

        let out = store
            .query(Query::new().with_prefix("/a/y").order(Order::ByKey))
            .unwrap()
            .rest()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, key("/a/y/z"));

        let out = store
            .query(Query::new().with_prefix("/a").order(Order::ByKey))
            .unwrap()
            .rest()
            .unwrap();
        let keys: Vec<_> = out.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["/a", "/a/x", "/a/y/z"]);
    }

    #[test]
    fn test_unordered_query_is_set_equal() {
        let store = ShardedDatastore::new();
        for i in 0..20 {
            store.put(&key(&format!("/{}key{}", i, i)), &[i as u8]).unwrap();
        }

        let q = Query::new().filter(Filter::value_compare(Op::GreaterThanOrEqual, vec![10]));
        let mut out = store.query(q).unwrap().rest().unwrap();
        out.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|e| e.value[0] >= 10));
    }

    #[test]
    fn test_ordered_paged_keys_only() {
        let store = ShardedDatastore::new();
        for i in 0..10u8 {
            store.put(&key(&format!("/k{}", i)), &vec![i; i as usize + 1]).unwrap();
        }

        let q = Query::new()
            .order(Order::ByKeyDescending)
            .offset(2)
            .limit(3)
            .keys_only(true);
        let out = store.query(q).unwrap().rest().unwrap();
        let keys: Vec<_> = out.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["/k7", "/k6", "/k5"]);
        assert!(out.iter().all(|e| e.value.is_empty()));
        assert_eq!(out[0].size, 8);
    }
}
