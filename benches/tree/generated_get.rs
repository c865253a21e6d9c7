use std::{ffi::CString, time::Duration};

use critbit::{
    tests_common::{generate_keys_skewed, generate_string_keys},
    StringTree,
};
use criterion::{criterion_group, measurement::Measurement, BenchmarkGroup, Criterion};
use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};

fn run_benchmarks<M: Measurement>(
    group: &mut BenchmarkGroup<M>,
    keys: &[CString],
    tree: &StringTree<usize>,
) {
    let (first_key, middle_key, last_key) = (
        keys[0].as_c_str(),
        keys[keys.len() / 2].as_c_str(),
        keys[keys.len() - 1].as_c_str(),
    );
    group.bench_function("search/first_key", |b| {
        b.iter(|| tree.get(first_key).unwrap())
    });
    group.bench_function("search/middle_key", |b| {
        b.iter(|| tree.get(middle_key).unwrap())
    });
    group.bench_function("search/last_key", |b| {
        b.iter(|| tree.get(last_key).unwrap())
    });
    group.bench_function("minimum", |b| b.iter(|| tree.first_key_value().unwrap()));
    group.bench_function("maximum", |b| b.iter(|| tree.last_key_value().unwrap()));

    let mut rng = StdRng::seed_from_u64(69420);
    let searches: Vec<_> = keys.choose_multiple(&mut rng, 500).cloned().collect();
    group.bench_function("search/random", |b| {
        b.iter(|| {
            for search in &searches {
                std::hint::black_box(tree.get(search));
            }
        })
    });
}

fn setup_tree_run_benches(
    c: &mut Criterion,
    keys: impl Iterator<Item = CString>,
    group_name: &str,
) {
    let keys: Vec<_> = keys.collect();

    let mut tree = StringTree::new();
    for (idx, key) in keys.iter().enumerate() {
        tree.insert(key, idx).unwrap();
    }

    let mut group = c.benchmark_group(group_name);
    group.warm_up_time(Duration::from_secs(5));
    group.measurement_time(Duration::from_secs(15));
    run_benchmarks(&mut group, &keys, &tree);
}

fn bench(c: &mut Criterion) {
    // number of keys = 255
    setup_tree_run_benches(
        c,
        generate_keys_skewed(u8::MAX as usize),
        "generated_get/skewed",
    );
    setup_tree_run_benches(c, generate_string_keys(50_000), "generated_get/dense");
}

criterion_group!(bench_generated_get_group, bench);
