use std::ffi::CString;

use critbit::{
    tests_common::{generate_keys_skewed, generate_string_keys},
    StringTree,
};
use criterion::{criterion_group, BatchSize, Criterion, Throughput};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

fn gen_group(c: &mut Criterion, group: &str, keys: Vec<CString>) {
    let mut group = c.benchmark_group(group);
    group.warm_up_time(std::time::Duration::from_secs(5));
    group.measurement_time(std::time::Duration::from_secs(15));
    group.throughput(Throughput::Bytes(
        keys.iter().map(|k| k.as_bytes_with_nul().len() as u64).sum(),
    ));
    group.bench_function("insert", |b| {
        b.iter_batched(
            || StringTree::new(),
            |mut tree| {
                for (idx, key) in keys.iter().enumerate() {
                    tree.insert(key, idx).unwrap();
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("insert_remove", |b| {
        b.iter_batched(
            || StringTree::new(),
            |mut tree| {
                for (idx, key) in keys.iter().enumerate() {
                    tree.insert(key, idx).unwrap();
                }
                for key in &keys {
                    tree.remove(key).unwrap();
                }
                tree
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench(c: &mut Criterion) {
    let skewed: Vec<_> = generate_keys_skewed(u8::MAX as usize).collect();
    let dense: Vec<_> = generate_string_keys(10_000).collect();
    let mut shuffled = dense.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(69420));

    gen_group(c, "generated_insert/skewed", skewed);
    gen_group(c, "generated_insert/dense_sorted", dense);
    gen_group(c, "generated_insert/dense_shuffled", shuffled);
}

criterion_group!(bench_generated_insert_group, bench);
