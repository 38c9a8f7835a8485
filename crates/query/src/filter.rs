//! Query filters
//!
//! Built-in filters compare keys or values against a reference; anything else
//! goes through [`Filter::Custom`]. Every variant is evaluated through the
//! same [`Predicate::matches`] entry point, so executors never special-case
//! built-ins.

use datastore_core::{Entry, Key};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Comparison operator shared by key and value filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl Op {
    /// All operators, in declaration order
    pub const ALL: [Op; 6] = [
        Op::Equal,
        Op::NotEqual,
        Op::LessThan,
        Op::LessThanOrEqual,
        Op::GreaterThan,
        Op::GreaterThanOrEqual,
    ];

    /// Whether an `actual.cmp(reference)` outcome satisfies this operator
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Op::Equal => ordering == Ordering::Equal,
            Op::NotEqual => ordering != Ordering::Equal,
            Op::LessThan => ordering == Ordering::Less,
            Op::LessThanOrEqual => ordering != Ordering::Greater,
            Op::GreaterThan => ordering == Ordering::Greater,
            Op::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }

    /// Compare `actual` against `reference`
    pub fn compare<T: Ord + ?Sized>(self, actual: &T, reference: &T) -> bool {
        self.accepts(actual.cmp(reference))
    }

    /// Symbolic form (`==`, `<=`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Equal => "==",
            Op::NotEqual => "!=",
            Op::LessThan => "<",
            Op::LessThanOrEqual => "<=",
            Op::GreaterThan => ">",
            Op::GreaterThanOrEqual => ">=",
        }
    }

    /// Parse either the symbolic or the snake_case name
    pub fn parse(s: &str) -> Option<Op> {
        match s {
            "==" | "equal" => Some(Op::Equal),
            "!=" | "not_equal" => Some(Op::NotEqual),
            "<" | "less_than" => Some(Op::LessThan),
            "<=" | "less_than_or_equal" => Some(Op::LessThanOrEqual),
            ">" | "greater_than" => Some(Op::GreaterThan),
            ">=" | "greater_than_or_equal" => Some(Op::GreaterThanOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pure predicate over one entry
///
/// Implementations must not have side effects: executors may evaluate
/// filters in any order and any number of times.
pub trait Predicate: Send + Sync {
    /// True if the entry should be kept
    fn matches(&self, entry: &Entry) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Entry) -> bool + Send + Sync,
{
    fn matches(&self, entry: &Entry) -> bool {
        self(entry)
    }
}

/// Entry filter
#[derive(Clone)]
pub enum Filter {
    /// Compare the entry key with a reference key
    KeyCompare {
        /// Operator
        op: Op,
        /// Reference key
        key: Key,
    },
    /// Keep keys at or below `prefix` (segment-aware)
    KeyPrefix {
        /// Prefix key
        prefix: Key,
    },
    /// Byte-wise comparison of the stored value with a reference value
    ValueCompare {
        /// Operator
        op: Op,
        /// Reference bytes
        value: Vec<u8>,
    },
    /// Arbitrary caller-supplied predicate
    Custom(Arc<dyn Predicate>),
}

impl Filter {
    /// `KeyCompare` filter
    pub fn key_compare(op: Op, key: impl Into<Key>) -> Self {
        Filter::KeyCompare {
            op,
            key: key.into(),
        }
    }

    /// `KeyPrefix` filter
    pub fn key_prefix(prefix: impl Into<Key>) -> Self {
        Filter::KeyPrefix {
            prefix: prefix.into(),
        }
    }

    /// `ValueCompare` filter
    pub fn value_compare(op: Op, value: impl Into<Vec<u8>>) -> Self {
        Filter::ValueCompare {
            op,
            value: value.into(),
        }
    }

    /// Wrap any predicate (closures included)
    ///
    /// ```
    /// use datastore_core::{Entry, Key};
    /// use datastore_query::{Filter, Predicate};
    ///
    /// let even = Filter::custom(|e: &Entry| e.key.as_str().len() % 2 == 0);
    /// assert!(even.matches(&Entry::new(Key::new("/abc"), vec![])));
    /// assert!(!even.matches(&Entry::new(Key::new("/ab"), vec![])));
    /// ```
    pub fn custom<P: Predicate + 'static>(predicate: P) -> Self {
        Filter::Custom(Arc::new(predicate))
    }
}

impl Predicate for Filter {
    fn matches(&self, entry: &Entry) -> bool {
        match self {
            Filter::KeyCompare { op, key } => op.compare(&entry.key, key),
            Filter::KeyPrefix { prefix } => entry.key.has_prefix(prefix),
            Filter::ValueCompare { op, value } => {
                op.compare(entry.value.as_slice(), value.as_slice())
            }
            Filter::Custom(predicate) => predicate.matches(entry),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::KeyCompare { op, key } => write!(f, "KEY {} {:?}", op, key.as_str()),
            Filter::KeyPrefix { prefix } => write!(f, "PREFIX({:?})", prefix.as_str()),
            Filter::ValueCompare { op, value } => {
                write!(f, "VALUE {} <{} bytes>", op, value.len())
            }
            Filter::Custom(_) => f.write_str("CUSTOM"),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::KeyCompare { op, key } => f
                .debug_struct("KeyCompare")
                .field("op", op)
                .field("key", key)
                .finish(),
            Filter::KeyPrefix { prefix } => {
                f.debug_struct("KeyPrefix").field("prefix", prefix).finish()
            }
            Filter::ValueCompare { op, value } => f
                .debug_struct("ValueCompare")
                .field("op", op)
                .field("value", value)
                .finish(),
            Filter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
