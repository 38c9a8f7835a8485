//! Naive reference query executor
//!
//! Full-scan execution that defines correct query output. Every backend,
//! however it executes a query internally, must produce what this produces
//! (modulo order when the query has no orders).
//!
//! ## Execution Sequence
//!
//! ```text
//! 1. prefix + filters (AND)   lazy
//! 2. orders (stable, chained) materializes the stream
//! 3. offset                   lazy
//! 4. limit                    lazy, 0 = unbounded
//! 5. keys-only                lazy, size preserved
//! ```
//!
//! Errors already present in the input are passed through, never dropped.

use crate::filter::{Filter, Predicate};
use crate::order::{self, Order};
use crate::query::Query;
use crate::results::Results;
use datastore_core::{Entry, Key, Result};
use tracing::{debug, trace};

/// Keep entries the filter accepts
pub fn naive_filter(filter: Filter, results: Results) -> Results {
    let query = results.query().clone();
    Results::new(
        query,
        results.filter(move |item| match item {
            Ok(entry) => filter.matches(entry),
            Err(_) => true,
        }),
    )
}

/// Keep entries at or below `prefix`
pub fn naive_prefix(prefix: Key, results: Results) -> Results {
    naive_filter(Filter::KeyPrefix { prefix }, results)
}

/// Materialize and stable-sort by the order chain
///
/// An error anywhere in the input replaces the output with that error.
pub fn naive_order(orders: Vec<Order>, results: Results) -> Results {
    let query = results.query().clone();
    match results.rest() {
        Ok(mut entries) => {
            order::sort(&orders, &mut entries);
            Results::with_entries(query, entries)
        }
        Err(err) => Results::with_error(query, err),
    }
}

/// Skip the first `offset` entries
pub fn naive_offset(offset: usize, results: Results) -> Results {
    let query = results.query().clone();
    let mut skipped = 0;
    Results::new(
        query,
        results.filter(move |item| match item {
            Ok(_) if skipped < offset => {
                skipped += 1;
                false
            }
            _ => true,
        }),
    )
}

/// Take at most `limit` entries; zero leaves the stream unbounded
pub fn naive_limit(limit: usize, results: Results) -> Results {
    if limit == 0 {
        return results;
    }
    let query = results.query().clone();
    Results::new(query, results.take(limit))
}

/// Strip values, keeping sizes
pub fn naive_keys_only(results: Results) -> Results {
    let query = results.query().clone();
    Results::new(query, results.map(|item| item.map(Entry::into_key_only)))
}

/// Apply every part of `query` to `results`
pub fn naive_query_apply(query: &Query, results: Results) -> Results {
    debug!(query = %query, "naive query apply");

    let mut results = Results::new(query.clone(), results);
    if let Some(prefix) = query.effective_prefix() {
        results = naive_prefix(prefix.clone(), results);
    }
    for filter in &query.filters {
        results = naive_filter(filter.clone(), results);
    }
    if !query.orders.is_empty() {
        trace!(orders = query.orders.len(), "sorting");
        results = naive_order(query.orders.clone(), results);
    }
    if query.offset > 0 {
        results = naive_offset(query.offset, results);
    }
    if query.limit > 0 {
        results = naive_limit(query.limit, results);
    }
    if query.keys_only {
        results = naive_keys_only(results);
    }
    results
}

/// Execute `query` over a full snapshot of entries
pub fn execute(query: &Query, entries: Vec<Entry>) -> Results {
    naive_query_apply(query, Results::with_entries(query.clone(), entries))
}

/// Execute `query` over a snapshot and materialize the output
pub fn execute_to_vec(query: &Query, entries: Vec<Entry>) -> Result<Vec<Entry>> {
    execute(query, entries).rest()
}
