//! Cross-backend agreement on randomized contents

use crate::*;
use datastore::datastore_query::naive;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_entries(seed: u64, count: usize) -> Vec<Entry> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut entries: Vec<Entry> = (0..count)
        .map(|_| {
            let depth = rng.gen_range(1..=3);
            let path: Vec<String> = (0..depth)
                .map(|_| format!("{}", rng.gen_range(0..6u8)))
                .collect();
            let value: Vec<u8> = (0..rng.gen_range(0..4)).map(|_| rng.gen()).collect();
            Entry::new(Key::new(path.join("/")), value)
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));
    entries.dedup_by(|a, b| a.key == b.key);
    entries
}

fn queries() -> Vec<Query> {
    vec![
        Query::new(),
        Query::new().with_prefix("/1"),
        Query::new().with_prefix("/1/2").keys_only(true),
        Query::new().order(Order::ByValue).order(Order::ByKeyDescending),
        Query::new()
            .filter(Filter::value_compare(Op::GreaterThan, vec![100]))
            .order(Order::ByKey)
            .offset(2)
            .limit(5),
        Query::new()
            .filter(Filter::key_compare(Op::NotEqual, "/3"))
            .filter(Filter::key_prefix("/3"))
            .order(Order::ByValueDescending)
            .order(Order::ByKey),
        Query::new().order(Order::ByKey).offset(1000),
    ]
}

#[test]
fn test_backends_agree_with_naive() {
    for seed in 0..8 {
        let entries = random_entries(seed, 60);
        for (name, store) in all_backends() {
            load(store.as_ref(), &entries);
            for q in queries() {
                let mut expected = naive::execute_to_vec(&q, entries.clone()).unwrap();
                if q.orders.is_empty() {
                    expected.sort_by(|a, b| a.key.cmp(&b.key));
                }
                let actual = query_normalized(store.as_ref(), &q);
                assert_eq!(actual, expected, "backend {} seed {} query {}", name, seed, q);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_map_and_sharded_agree(
        seed in any::<u64>(),
        count in 0usize..80,
        offset in 0usize..20,
        limit in 0usize..20,
    ) {
        let entries = random_entries(seed, count);
        let map = MapDatastore::new();
        let sharded = ShardedDatastore::new();
        load(&map, &entries);
        load(&sharded, &entries);

        let q = Query::new()
            .order(Order::ByValue)
            .order(Order::ByKey)
            .offset(offset)
            .limit(limit);
        prop_assert_eq!(query_normalized(&map, &q), query_normalized(&sharded, &q));
    }
}
