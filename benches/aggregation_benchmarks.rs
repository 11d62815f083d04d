//! Benchmarks for windowed aggregation over the store backends

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::StreamExt;
use loadgrid::aggregator::{AggregationQuery, ResultAggregator};
use loadgrid::results::{DescriptiveStats, ResultRecord};
use loadgrid::store::{JsonlResultStore, MemoryResultStore, ResultStore};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// `count` records over three event names, 10ms apart
fn records(count: usize) -> Vec<ResultRecord> {
    let names = ["login", "search", "logout"];
    (0..count)
        .map(|i| {
            let start = i as i64 * 10;
            let duration = (i % 97) as i64;
            ResultRecord::new(names[i % names.len()], start, start + duration, i % 13 != 0)
        })
        .collect()
}

async fn drain(aggregator: &ResultAggregator, query: AggregationQuery) -> usize {
    aggregator
        .buckets(query)
        .fold(0, |n, bucket| async move { n + bucket.unwrap().entries.len() })
        .await
}

fn bench_memory_aggregation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("aggregate_memory");
    group.measurement_time(Duration::from_secs(5));

    for count in [1_000usize, 10_000, 100_000] {
        let store = Arc::new(MemoryResultStore::new());
        rt.block_on(store.append(records(count))).unwrap();
        let aggregator = ResultAggregator::new(store);

        for smoothing in [1i64, 10] {
            let query = AggregationQuery::with_smoothing(0, 1_000, smoothing, true).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("smoothing_{smoothing}"), count),
                &query,
                |b, query| b.to_async(&rt).iter(|| drain(&aggregator, *query)),
            );
        }
    }

    group.finish();
}

fn bench_jsonl_aggregation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonlResultStore::new(dir.path().join("bench.jsonl")));
    rt.block_on(store.append(records(10_000))).unwrap();
    let aggregator = ResultAggregator::new(store);
    let query = AggregationQuery::new(0, 10_000, 10_000, true).unwrap();

    c.benchmark_group("aggregate_jsonl")
        .sample_size(10)
        .bench_function("10k_records", |b| {
            b.to_async(&rt).iter(|| drain(&aggregator, query))
        });
}

fn bench_stats(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i % 250) as f64).collect();

    c.benchmark_group("descriptive_stats")
        .bench_function("add_10k", |b| {
            b.iter(|| {
                let mut stats = DescriptiveStats::new();
                for v in &values {
                    stats.add(*v);
                }
                black_box(stats.std_dev())
            })
        })
        .bench_function("collect_10k", |b| {
            b.iter(|| {
                let stats: DescriptiveStats = values.iter().copied().collect();
                black_box(stats.mean())
            })
        });
}

criterion_group!(
    benches,
    bench_memory_aggregation,
    bench_jsonl_aggregation,
    bench_stats
);
criterion_main!(benches);
