//! Benchmarks for the stroke oscillator.

use std::{hint::black_box, time::Duration};

use criterion::Criterion;
use motion_follow::dsp::StrokeOscillator;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let mut osc = StrokeOscillator::new();
    let mut now = Duration::ZERO;
    group.bench_function("advance", |b| {
        b.iter(|| {
            now += Duration::from_millis(16);
            osc.advance(black_box(0.4), black_box(2.0), black_box(0.6), now)
        })
    });

    group.finish();
}
