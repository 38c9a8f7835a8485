//! Shared test data

use datastore_core::{Entry, Key};
use rand::RngCore;

/// Length of every generated value
pub const VALUE_LEN: usize = 64;

/// Number of entries in [`dataset`]
pub const DATASET_SIZE: usize = 100;

/// Fresh random 64-byte value
pub fn rand_value() -> Vec<u8> {
    let mut value = vec![0u8; VALUE_LEN];
    rand::thread_rng().fill_bytes(&mut value);
    value
}

/// Key of the `i`th dataset entry: `/{i}key{i}`
pub fn dataset_key(i: usize) -> Key {
    Key::new(format!("{}key{}", i, i))
}

/// 100 entries keyed `/0key0` .. `/99key99`, each with a random value
pub fn dataset() -> Vec<Entry> {
    (0..DATASET_SIZE)
        .map(|i| Entry::new(dataset_key(i), rand_value()))
        .collect()
}
