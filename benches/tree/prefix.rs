use std::{convert::Infallible, ops::ControlFlow, time::Duration};

use critbit::{tests_common::generate_string_keys, StringTree};
use criterion::{criterion_group, Criterion};

fn bench(c: &mut Criterion) {
    let mut tree = StringTree::new();
    for (idx, key) in generate_string_keys(50_000).enumerate() {
        tree.insert(&key, idx).unwrap();
    }

    let mut group = c.benchmark_group("prefix");
    group.warm_up_time(Duration::from_secs(5));
    group.measurement_time(Duration::from_secs(15));

    for (name, prefix) in [
        ("empty", &[][..]),
        ("one_byte", &[0x05][..]),
        ("two_bytes", &[0x05, 0x80][..]),
        ("missing", &[0xFF, 0xFF, 0xFF][..]),
    ] {
        group.bench_function(format!("for_each/{name}"), |b| {
            b.iter(|| {
                let mut sum = 0;
                tree.for_each_prefixed(prefix, |_, value| {
                    sum += *value;
                    Ok::<_, Infallible>(ControlFlow::Continue(()))
                })
                .unwrap();
                sum
            })
        });
        group.bench_function(format!("iter/{name}"), |b| {
            b.iter(|| tree.prefix(prefix).map(|(_, value)| *value).sum::<usize>())
        });
    }
}

criterion_group!(bench_prefix_group, bench);
