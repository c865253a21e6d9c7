use std::time::Duration;

use critbit::{tests_common::generate_key_fixed_length, FixedTree, PodMap};
use criterion::{criterion_group, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench(c: &mut Criterion) {
    let keys: Vec<_> = generate_key_fixed_length(4, 8).collect();

    let mut group = c.benchmark_group("fixed_length");
    group.warm_up_time(Duration::from_secs(5));
    group.measurement_time(Duration::from_secs(15));

    group.bench_function("insert", |b| {
        b.iter_batched(
            || FixedTree::new(4, 8),
            |mut tree| {
                for (idx, key) in keys.iter().enumerate() {
                    tree.insert(key, &(idx as u64).to_ne_bytes()).unwrap();
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });

    let mut tree = FixedTree::new(4, 8);
    for (idx, key) in keys.iter().enumerate() {
        tree.insert(key, &(idx as u64).to_ne_bytes()).unwrap();
    }
    let middle_key = keys[keys.len() / 2].as_slice();
    group.bench_function("get", |b| b.iter(|| tree.get(middle_key).unwrap()));
    group.bench_function("prefix", |b| {
        b.iter(|| tree.prefix(&middle_key[..2]).unwrap().count())
    });

    let mut rng = StdRng::seed_from_u64(69420);
    let random: Vec<u64> = (0..10_000).map(|_| rng.random()).collect();
    group.bench_function("pod_map/insert_random", |b| {
        b.iter_batched(
            PodMap::<u64, u64>::new,
            |mut map| {
                for &key in &random {
                    map.insert(key, key).unwrap();
                }
                map
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(bench_fixed_length_group, bench);
