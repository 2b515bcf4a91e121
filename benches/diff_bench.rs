use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use strata::core::batch::write_in_batches;
use strata::core::constants::BATCH_LIMIT;
use strata::core::domain::{Diff, Secret, Secrets};

/// Build a set of `size` secrets; every `stride`-th value is altered by `tag`.
fn generate_set(size: usize, stride: usize, tag: &str) -> Secrets {
    (0..size)
        .map(|i| {
            let value = if i % stride == 0 {
                format!("enc-{i}-{tag}")
            } else {
                format!("enc-{i}")
            };
            Secret::new(format!("KEY_{i:05}"), value)
        })
        .collect()
}

/// Benchmark diffing sets where a tenth of the values changed.
fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [10, 100, 1_000, 10_000] {
        let local = generate_set(size, 10, "local");
        let remote = generate_set(size, 10, "remote");

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::new("compute", size),
            &(local, remote),
            |b, (local, remote)| {
                b.iter(|| black_box(Diff::compute(black_box(local), black_box(remote))));
            },
        );
    }

    group.finish();
}

/// Benchmark splitting writes into store-sized batches.
fn bench_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("batches");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    for size in [25, 1_000, 10_000] {
        let ops: Vec<Secret> = generate_set(size, 1, "x").into_iter().collect();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("write", size), &ops, |b, ops| {
            b.iter(|| {
                let mut items = 0;
                let chunks = write_in_batches(black_box(ops), BATCH_LIMIT, |chunk| {
                    items += chunk.len();
                    Ok(())
                })
                .unwrap();
                black_box((chunks, items));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_diff, bench_batches);
criterion_main!(benches);
