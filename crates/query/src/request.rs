//! Loosely typed query descriptions
//!
//! [`QueryRequest`] is what a transport hands over: plain strings, op names
//! and signed integers, deserializable with serde. Converting it into a
//! [`Query`] validates every field and reports problems as
//! [`Error::InvalidQuery`]; nothing is clamped or silently repaired.
//!
//! ```
//! use datastore_query::{Query, QueryRequest};
//!
//! let req = QueryRequest {
//!     prefix: Some("/users".to_string()),
//!     offset: -1,
//!     ..Default::default()
//! };
//! let err = Query::try_from(req).unwrap_err();
//! assert!(err.is_invalid_query());
//! ```

use crate::filter::{Filter, Op};
use crate::order::Order;
use crate::query::Query;
use datastore_core::{Error, Key, Result};
use serde::{Deserialize, Serialize};

/// Untrusted query description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryRequest {
    /// Normalized prefix key
    pub prefix: Option<String>,
    /// Filters, ANDed
    pub filters: Vec<FilterSpec>,
    /// Order chain
    pub orders: Vec<OrderSpec>,
    /// Keys and sizes only
    pub keys_only: bool,
    /// Must not be negative
    pub offset: i64,
    /// Must not be negative; 0 is unbounded
    pub limit: i64,
}

/// Built-in filter description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterSpec {
    /// See [`Filter::KeyCompare`]
    KeyCompare {
        /// Operator, symbolic (`<=`) or named (`less_than_or_equal`)
        op: String,
        /// Normalized reference key
        key: String,
    },
    /// See [`Filter::KeyPrefix`]
    KeyPrefix {
        /// Normalized prefix key
        prefix: String,
    },
    /// See [`Filter::ValueCompare`]
    ValueCompare {
        /// Operator, symbolic or named
        op: String,
        /// Reference bytes
        value: Vec<u8>,
    },
}

/// Built-in order description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSpec {
    /// [`Order::ByKey`]
    ByKey,
    /// [`Order::ByKeyDescending`]
    ByKeyDescending,
    /// [`Order::ByValue`]
    ByValue,
    /// [`Order::ByValueDescending`]
    ByValueDescending,
}

fn parse_op(op: &str) -> Result<Op> {
    Op::parse(op).ok_or_else(|| Error::InvalidQuery(format!("unknown operator '{}'", op)))
}

fn parse_key(field: &str, key: String) -> Result<Key> {
    Key::raw(key).map_err(|e| Error::InvalidQuery(format!("{}: {}", field, e)))
}

fn non_negative(field: &str, n: i64) -> Result<usize> {
    usize::try_from(n)
        .map_err(|_| Error::InvalidQuery(format!("{} must not be negative, got {}", field, n)))
}

impl TryFrom<FilterSpec> for Filter {
    type Error = Error;

    fn try_from(spec: FilterSpec) -> Result<Self> {
        match spec {
            FilterSpec::KeyCompare { op, key } => Ok(Filter::KeyCompare {
                op: parse_op(&op)?,
                key: parse_key("filter key", key)?,
            }),
            FilterSpec::KeyPrefix { prefix } => Ok(Filter::KeyPrefix {
                prefix: parse_key("filter prefix", prefix)?,
            }),
            FilterSpec::ValueCompare { op, value } => Ok(Filter::ValueCompare {
                op: parse_op(&op)?,
                value,
            }),
        }
    }
}

impl From<OrderSpec> for Order {
    fn from(spec: OrderSpec) -> Self {
        match spec {
            OrderSpec::ByKey => Order::ByKey,
            OrderSpec::ByKeyDescending => Order::ByKeyDescending,
            OrderSpec::ByValue => Order::ByValue,
            OrderSpec::ByValueDescending => Order::ByValueDescending,
        }
    }
}

impl TryFrom<QueryRequest> for Query {
    type Error = Error;

    fn try_from(req: QueryRequest) -> Result<Self> {
        let prefix = req
            .prefix
            .map(|p| parse_key("prefix", p))
            .transpose()?;
        let filters = req
            .filters
            .into_iter()
            .map(Filter::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Query {
            prefix,
            filters,
            orders: req.orders.into_iter().map(Order::from).collect(),
            keys_only: req.keys_only,
            offset: non_negative("offset", req.offset)?,
            limit: non_negative("limit", req.limit)?,
        })
    }
}
