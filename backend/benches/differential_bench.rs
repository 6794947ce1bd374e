use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use traffic_twin::algorithms::{classify, AlignedPair};
use traffic_twin::models::{Interval, MetricTable};
use traffic_twin::services::{rank_top_n, window_difference};

/// Two runs over `streets` edges and `intervals` five-minute intervals; the
/// perturbed run drops every seventh street.
fn tables(streets: usize, intervals: u64) -> (MetricTable, MetricTable) {
    let mut without = MetricTable::edges(&["edge_traveltime"]);
    let mut with = MetricTable::edges(&["edge_traveltime"]);
    for slot in 0..intervals {
        let interval = Interval::new(slot * 300, (slot + 1) * 300).unwrap();
        for s in 0..streets {
            let base = (s % 97) as f64 + slot as f64 * 0.5;
            without
                .push_row(interval, format!("edge_{}", s), vec![Some(base)])
                .unwrap();
            if s % 7 != 0 {
                with.push_row(interval, format!("edge_{}", s), vec![Some(base * 1.3)])
                    .unwrap();
            }
        }
    }
    (without, with)
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");

    for streets in [500usize, 5_000] {
        let (without, with) = tables(streets, 48);
        group.bench_with_input(BenchmarkId::new("pivot_and_align", streets), &streets, |b, _| {
            b.iter(|| AlignedPair::build(black_box(&without), black_box(&with), "edge_traveltime"));
        });
    }

    group.finish();
}

fn bench_window_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("differential");

    let (without, with) = tables(5_000, 48);
    let pair = AlignedPair::build(&without, &with, "edge_traveltime").unwrap();
    let all: Vec<String> = without.timeline().tokens();
    let morning: Vec<String> = all[12..24].to_vec();

    group.bench_function("full_range", |b| {
        b.iter(|| window_difference(black_box(&pair), black_box(&all)));
    });
    group.bench_function("twelve_intervals", |b| {
        b.iter(|| window_difference(black_box(&pair), black_box(&morning)));
    });

    let record = window_difference(&pair, &all);
    group.bench_function("rank_top_15", |b| {
        b.iter(|| rank_top_n(black_box(&record), 15));
    });

    let differences: Vec<f64> = record.values().map(|e| e.difference).collect();
    group.bench_function("classify", |b| {
        b.iter(|| classify(black_box(&differences)));
    });

    group.finish();
}

criterion_group!(benches, bench_alignment, bench_window_difference);
criterion_main!(benches);
