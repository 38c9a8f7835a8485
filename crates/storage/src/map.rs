//! Ordered in-memory backend
//!
//! `MapDatastore` keeps every entry in one `BTreeMap` behind a `RwLock`.
//! Queries take the read lock only long enough to copy the matching entries
//! out, so a result stream never blocks writers.
//!
//! # Query execution
//!
//! - Prefix queries scan only the key range starting at the prefix
//! - Prefix and filters are evaluated during the scan
//! - Key orders reuse the map order instead of sorting
//! - Keys-only queries that never look at values skip copying them

use crate::traits::Datastore;
use datastore_core::{Entry, Error, Key, Result};
use datastore_query::order::{self, Order};
use datastore_query::{Query, Results};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory datastore ordered by key
#[derive(Debug, Default)]
pub struct MapDatastore {
    data: RwLock<BTreeMap<Key, Vec<u8>>>,
}

impl MapDatastore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Copy out the entries `query` selects, in key order
    fn scan(&self, query: &Query, with_values: bool) -> Vec<Entry> {
        let data = self.data.read();
        let candidates: Box<dyn Iterator<Item = (&Key, &Vec<u8>)> + '_> =
            match query.effective_prefix() {
                // Everything under the prefix shares its leading bytes,
                // so the scan can stop at the first key that does not.
                Some(prefix) => Box::new(
                    data.range(prefix.clone()..)
                        .take_while(move |(k, _)| k.as_str().starts_with(prefix.as_str())),
                ),
                None => Box::new(data.iter()),
            };

        candidates
            .filter_map(|(key, value)| {
                let entry = if with_values {
                    Entry::new(key.clone(), value.clone())
                } else {
                    Entry::key_only(key.clone(), value.len())
                };
                query.matches(&entry).then_some(entry)
            })
            .collect()
    }
}

impl Datastore for MapDatastore {
    fn put(&self, key: &Key, value: &[u8]) -> Result<()> {
        self.data.write().insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::not_found(key))
    }

    fn has(&self, key: &Key) -> Result<bool> {
        Ok(self.data.read().contains_key(key))
    }

    fn get_size(&self, key: &Key) -> Result<usize> {
        self.data
            .read()
            .get(key)
            .map(Vec::len)
            .ok_or_else(|| Error::not_found(key))
    }

    fn delete(&self, key: &Key) -> Result<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn query(&self, query: Query) -> Result<Results> {
        let orders = order::effective_orders(&query.orders).to_vec();
        let needs_values = !query.keys_only
            || !query.filters.is_empty()
            || orders.iter().any(|o| !o.is_key_order());

        let mut entries = self.scan(&query, needs_values);
        debug!(query = %query, matched = entries.len(), "map query");

        match orders.as_slice() {
            [] | [Order::ByKey] => {}
            [Order::ByKeyDescending] => entries.reverse(),
            chain => order::sort(chain, &mut entries),
        }

        let keys_only = query.keys_only;
        let take = if query.limit == 0 {
            usize::MAX
        } else {
            query.limit
        };
        let page = entries
            .into_iter()
            .skip(query.offset)
            .take(take)
            .map(move |entry| {
                Ok(if keys_only {
                    entry.into_key_only()
                } else {
                    entry
                })
            });

        Ok(Results::new(query, page))
    }
}
