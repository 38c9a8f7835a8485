//! Result orderings
//!
//! Orders form a priority chain: the first order decides, entries it deems
//! equal fall through to the next one. Sorting is stable, so entries equal
//! under every order keep their incoming relative order.

use datastore_core::Entry;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Two-entry comparator used by [`Order::ByFunction`]
pub type Comparator = dyn Fn(&Entry, &Entry) -> Ordering + Send + Sync;

/// Ordering over entries
#[derive(Clone)]
pub enum Order {
    /// Ascending byte-wise key order
    ByKey,
    /// Descending byte-wise key order
    ByKeyDescending,
    /// Ascending byte-wise value order
    ByValue,
    /// Descending byte-wise value order
    ByValueDescending,
    /// Arbitrary comparator
    ByFunction(Arc<Comparator>),
}

impl Order {
    /// Wrap a comparator closure
    ///
    /// ```
    /// use datastore_query::Order;
    ///
    /// let by_size = Order::by_function(|a, b| a.size.cmp(&b.size));
    /// # let _ = by_size;
    /// ```
    pub fn by_function<F>(compare: F) -> Self
    where
        F: Fn(&Entry, &Entry) -> Ordering + Send + Sync + 'static,
    {
        Order::ByFunction(Arc::new(compare))
    }

    /// Compare two entries under this order alone
    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            Order::ByKey => a.key.cmp(&b.key),
            Order::ByKeyDescending => b.key.cmp(&a.key),
            Order::ByValue => a.value.cmp(&b.value),
            Order::ByValueDescending => b.value.cmp(&a.value),
            Order::ByFunction(compare) => compare(a, b),
        }
    }

    /// Key orders are total: keys are unique, so nothing after one can matter
    pub fn is_key_order(&self) -> bool {
        matches!(self, Order::ByKey | Order::ByKeyDescending)
    }
}

/// Compare under a chain of orders; first non-equal result wins
pub fn compare_chain(orders: &[Order], a: &Entry, b: &Entry) -> Ordering {
    orders
        .iter()
        .map(|order| order.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable sort of `entries` by the order chain. Empty chains leave input as is.
pub fn sort(orders: &[Order], entries: &mut [Entry]) {
    if orders.is_empty() {
        return;
    }
    entries.sort_by(|a, b| compare_chain(orders, a, b));
}

/// Chain up to and including the first key order
///
/// Orders after a key order can never break a tie, so backends can drop them.
pub fn effective_orders(orders: &[Order]) -> &[Order] {
    match orders.iter().position(Order::is_key_order) {
        Some(idx) => &orders[..=idx],
        None => orders,
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::ByKey => f.write_str("KEY"),
            Order::ByKeyDescending => f.write_str("KEY DESC"),
            Order::ByValue => f.write_str("VALUE"),
            Order::ByValueDescending => f.write_str("VALUE DESC"),
            Order::ByFunction(_) => f.write_str("FN"),
        }
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::ByKey => f.write_str("ByKey"),
            Order::ByKeyDescending => f.write_str("ByKeyDescending"),
            Order::ByValue => f.write_str("ByValue"),
            Order::ByValueDescending => f.write_str("ByValueDescending"),
            Order::ByFunction(_) => f.write_str("ByFunction(..)"),
        }
    }
}
