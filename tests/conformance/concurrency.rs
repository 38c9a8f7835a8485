//! Concurrent access through the trait

use crate::*;
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const KEYS_PER_THREAD: usize = 200;

fn concurrent_writers_then_query(store: Arc<dyn Datastore>) {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..KEYS_PER_THREAD {
                    let key = Key::new(format!("/t{}/k{:04}", t, i));
                    store.put(&key, &[t as u8; 8]).unwrap();
                    // Read-your-writes on the same thread
                    assert_eq!(store.get_size(&key).unwrap(), 8);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let all = store.query(Query::new().keys_only(true)).unwrap().rest().unwrap();
    assert_eq!(all.len(), THREADS * KEYS_PER_THREAD);

    let one = store
        .query(Query::new().with_prefix("/t3").order(Order::ByKey))
        .unwrap()
        .rest()
        .unwrap();
    assert_eq!(one.len(), KEYS_PER_THREAD);
    assert!(one.iter().all(|e| e.value == vec![3u8; 8]));
}

#[test]
fn test_map_concurrent_writers() {
    concurrent_writers_then_query(Arc::new(MapDatastore::new()));
}

#[test]
fn test_sharded_concurrent_writers() {
    concurrent_writers_then_query(Arc::new(ShardedDatastore::new()));
}

#[test]
fn test_query_while_writing() {
    let store: Arc<dyn Datastore> = Arc::new(ShardedDatastore::new());
    for i in 0..100 {
        store.put(&Key::new(format!("/seed/{}", i)), b"x").unwrap();
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..1000 {
                store.put(&Key::new(format!("/live/{}", i)), b"y").unwrap();
            }
        })
    };

    // Every snapshot sees all of the seed keys, whatever the writer is doing
    for _ in 0..20 {
        let seed = store
            .query(Query::new().with_prefix("/seed"))
            .unwrap()
            .rest()
            .unwrap();
        assert_eq!(seed.len(), 100);
    }
    writer.join().unwrap();
}
