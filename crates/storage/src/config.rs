//! Backend options

use datastore_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sizing options for the in-memory backends
///
/// Missing fields fall back to [`StoreOptions::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    /// Namespaces to pre-allocate room for
    pub initial_capacity: usize,
    /// Number of lock shards; a power of two greater than one
    pub shard_amount: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            initial_capacity: 0,
            shard_amount: 16,
        }
    }
}

impl StoreOptions {
    /// Few shards, no pre-allocation (tests, small datasets)
    pub fn small() -> Self {
        StoreOptions {
            initial_capacity: 0,
            shard_amount: 4,
        }
    }

    /// Many shards for heavily concurrent writers
    pub fn concurrent() -> Self {
        StoreOptions {
            initial_capacity: 1024,
            shard_amount: 64,
        }
    }

    /// Reject options the backends cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.shard_amount <= 1 || !self.shard_amount.is_power_of_two() {
            return Err(Error::Config(format!(
                "shard_amount must be a power of two greater than 1, got {}",
                self.shard_amount
            )));
        }
        Ok(())
    }
}
