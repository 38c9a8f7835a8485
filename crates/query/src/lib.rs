//! Query layer for the datastore contract
//!
//! This crate implements the backend-agnostic query model:
//! - [`Filter`] / [`Predicate`]: entry predicates, built-in and custom
//! - [`Order`]: chainable comparators
//! - [`Query`]: filters + orders + pagination + keys-only
//! - [`Results`]: single-pass result stream
//! - [`naive`]: the reference executor every backend is measured against
//! - [`QueryRequest`]: serde-friendly, validated query description

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod filter;
pub mod naive;
pub mod order;
pub mod query;
pub mod request;
pub mod results;

pub use filter::{Filter, Op, Predicate};
pub use naive::{naive_query_apply, execute, execute_to_vec};
pub use order::{compare_chain, sort, Comparator, Order};
pub use query::Query;
pub use request::{FilterSpec, OrderSpec, QueryRequest};
pub use results::Results;
