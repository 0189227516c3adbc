//! Benchmarks for the power-quality pipeline
//!
//! Run with: cargo bench -p pq-core --bench pipeline_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pq_core::prelude::*;
use std::f64::consts::PI;

fn distorted_waveform(channels: usize, n: usize, fs: f64) -> Waveform {
    let names = (0..channels).map(|c| format!("ch{}", c)).collect();
    let columns = (0..channels)
        .map(|c| {
            let phase = c as f64 * 2.0 * PI / 3.0;
            (0..n)
                .map(|i| {
                    let t = i as f64 / fs;
                    (2.0 * PI * 60.0 * t + phase).sin()
                        + 0.04 * (2.0 * PI * 300.0 * t + phase).sin()
                        + 0.02 * (2.0 * PI * 420.0 * t + phase).sin()
                })
                .collect()
        })
        .collect();
    Waveform::new(names, columns).unwrap()
}

fn bench_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectrum");
    let fs = 10_000.0;

    for n in [2_000usize, 10_000, 60_000].iter() {
        let wf = distorted_waveform(1, *n, fs);
        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("single_channel", n), n, |b, _| {
            b.iter(|| spectrum(black_box(&wf), fs).unwrap())
        });
    }

    group.finish();
}

fn bench_subgroups(c: &mut Criterion) {
    let wf = distorted_waveform(3, 10_000, 10_000.0);
    let grid = harmonics(&spectrum(&wf, 10_000.0).unwrap()).unwrap();

    c.bench_function("harmonic_subgroups_3ch", |b| {
        b.iter(|| harmonic_subgroups(black_box(&grid), SupplyFrequency::Hz60).unwrap())
    });
    c.bench_function("interharmonic_subgroups_3ch", |b| {
        b.iter(|| interharmonic_subgroups(black_box(&grid), SupplyFrequency::Hz60).unwrap())
    });
}

fn bench_analyzer(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzer");
    let fs = 10_000.0;
    let analyzer = PowerQualityAnalyzer::new(fs, 60.0).unwrap();

    for channels in [1usize, 3, 6].iter() {
        let wf = distorted_waveform(*channels, 10_000, fs);
        group.bench_with_input(BenchmarkId::new("analyze", channels), channels, |b, _| {
            b.iter(|| analyzer.analyze(black_box(&wf)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spectrum, bench_subgroups, bench_analyzer);
criterion_main!(benches);
