//! Benchmarks for the beat detector.

use std::{hint::black_box, time::Duration};

use criterion::Criterion;
use motion_follow::dsp::BeatDetector;

pub fn bench_beat(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/beat");

    // Square wave loudness: an onset every other update, beat list always full
    let mut detector = BeatDetector::new();
    let mut now = Duration::ZERO;
    let mut high = false;
    group.bench_function("alternating", |b| {
        b.iter(|| {
            now += Duration::from_millis(5);
            high = !high;
            detector.update(black_box(if high { 1.0 } else { 0.0 }), now)
        })
    });

    // Flat loudness: no onsets, only window pruning
    let mut detector = BeatDetector::new();
    let mut now = Duration::ZERO;
    group.bench_function("flat", |b| {
        b.iter(|| {
            now += Duration::from_millis(5);
            detector.update(black_box(0.5), now)
        })
    });

    group.finish();
}
