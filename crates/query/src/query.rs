//! Declarative query description

use crate::filter::{Filter, Predicate};
use crate::order::Order;
use datastore_core::{Entry, Key};
use std::fmt;

/// What to select, in which order, and how much of it
///
/// Filters are ANDed. `offset` and `limit` apply after filtering and
/// ordering; a `limit` of zero means unbounded. With no orders the result
/// order is unspecified.
///
/// # Examples
///
/// ```
/// use datastore_query::{Filter, Op, Order, Query};
///
/// let q = Query::new()
///     .with_prefix("/users")
///     .filter(Filter::key_compare(Op::GreaterThan, "/users/m"))
///     .order(Order::ByValue)
///     .order(Order::ByKey)
///     .offset(10)
///     .limit(5)
///     .keys_only(true);
///
/// assert_eq!(
///     q.to_string(),
///     "SELECT keys FROM \"/users\" FILTER [KEY > \"/users/m\"] ORDER [VALUE, KEY] OFFSET 10 LIMIT 5"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Restrict the scan to keys at or below this key
    pub prefix: Option<Key>,
    /// Predicates every result must satisfy
    pub filters: Vec<Filter>,
    /// Order chain; empty means unspecified order
    pub orders: Vec<Order>,
    /// Return keys and sizes only
    pub keys_only: bool,
    /// Results to skip
    pub offset: usize,
    /// Maximum results, 0 for unbounded
    pub limit: usize,
}

impl Query {
    /// Query selecting everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix
    pub fn with_prefix(mut self, prefix: impl Into<Key>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Add a filter
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append an order to the chain
    pub fn order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Set keys-only mode
    pub fn keys_only(mut self, keys_only: bool) -> Self {
        self.keys_only = keys_only;
        self
    }

    /// Set the offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set the limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// True if no order was requested
    pub fn is_unordered(&self) -> bool {
        self.orders.is_empty()
    }

    /// Prefix restriction, ignoring a prefix of `/`
    pub fn effective_prefix(&self) -> Option<&Key> {
        self.prefix.as_ref().filter(|p| !p.is_root())
    }

    /// Prefix and every filter accept the entry
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(prefix) = self.effective_prefix() {
            if !entry.key.has_prefix(prefix) {
                return false;
            }
        }
        self.filters.iter().all(|f| f.matches(entry))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT keys")?;
        if !self.keys_only {
            f.write_str(",vals")?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, " FROM {:?}", prefix.as_str())?;
        }
        if !self.filters.is_empty() {
            f.write_str(" FILTER [")?;
            for (i, filter) in self.filters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", filter)?;
            }
            f.write_str("]")?;
        }
        if !self.orders.is_empty() {
            f.write_str(" ORDER [")?;
            for (i, order) in self.orders.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", order)?;
            }
            f.write_str("]")?;
        }
        if self.offset > 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }
        if self.limit > 0 {
            write!(f, " LIMIT {}", self.limit)?;
        }
        Ok(())
    }
}
