//! Single-pass result streams

use crate::query::Query;
use datastore_core::{Entry, Error, Result};
use std::fmt;

type EntryIter = Box<dyn Iterator<Item = Result<Entry>> + Send>;

/// Lazy, forward-only sequence of query results
///
/// The stream ends either when the underlying source is exhausted or right
/// after the first error it yields. It holds whatever snapshot its producer
/// handed it and never a backend lock.
pub struct Results {
    query: Query,
    inner: EntryIter,
    done: bool,
}

impl Results {
    /// Stream over any iterator of results
    pub fn new<I>(query: Query, iter: I) -> Self
    where
        I: IntoIterator<Item = Result<Entry>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            query,
            inner: Box::new(iter.into_iter()),
            done: false,
        }
    }

    /// Stream over already materialized entries
    pub fn with_entries(query: Query, entries: Vec<Entry>) -> Self {
        Self::new(query, entries.into_iter().map(Ok))
    }

    /// Stream that fails immediately
    pub fn with_error(query: Query, err: Error) -> Self {
        Self::new(query, std::iter::once(Err(err)))
    }

    /// The query this stream answers
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Drain the rest of the stream
    ///
    /// Returns the first error instead of the entries if one occurs.
    pub fn rest(self) -> Result<Vec<Entry>> {
        self.collect()
    }
}

impl Iterator for Results {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Some(Ok(entry)) => Some(Ok(entry)),
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl fmt::Debug for Results {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results")
            .field("query", &self.query.to_string())
            .field("done", &self.done)
            .finish()
    }
}
