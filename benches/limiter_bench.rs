//! Benchmarks for slot acquisition and submission throughput.
//!
//! Both benchmarks size the bucket so the fast path is always taken; they
//! measure coordination overhead, not waiting time.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use prometheus_rate_limiter::{LeakyBucket, Outcome, RateLimiterBuilder};
use tokio::runtime::Runtime;

fn bench_bucket_acquire(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("bucket_acquire");
    for batch in [64_u64, 256, 1024] {
        group.throughput(Throughput::Elements(batch));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.to_async(&rt).iter(|| async move {
                let bucket = LeakyBucket::new(
                    usize::MAX,
                    Duration::from_secs(1),
                    Duration::from_secs(60),
                );
                for _ in 0..batch {
                    bucket.acquire().await.unwrap();
                }
                black_box(bucket.fill_level());
            });
        });
    }
    group.finish();
}

fn bench_submit_fast_path(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("submit_fast_path");
    for batch in [16_u64, 64, 256] {
        group.throughput(Throughput::Elements(batch));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.to_async(&rt).iter(|| async move {
                let limiter = RateLimiterBuilder::new()
                    .with_request_rate(1_000_000)
                    .with_interval(Duration::from_secs(1))
                    .with_timeout(Duration::from_secs(60))
                    .build()
                    .unwrap();
                for i in 0..batch {
                    let value = limiter
                        .submit(move || async move { Outcome::<u64, String>::Success(i) })
                        .await
                        .unwrap();
                    black_box(value);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_bucket_acquire, bench_submit_fast_path);
criterion_main!(benches);
