//! Benchmarks for the envelope follower.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use motion_follow::dsp::{EnvelopeFollower, Quantizer, Smoothing};

use crate::{sine_frame, FRAME_SIZES};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in FRAME_SIZES {
        let frame = sine_frame(size, 0.5);

        // Weighted average over the history
        let mut follower = EnvelopeFollower::new(4.0, Quantizer::default());
        group.bench_with_input(BenchmarkId::new("weighted", size), &size, |b, _| {
            b.iter(|| follower.process(black_box(&frame)))
        });

        // Trend min/max over the history
        let mut follower =
            EnvelopeFollower::new(4.0, Quantizer::default()).with_smoothing(Smoothing::Trend);
        group.bench_with_input(BenchmarkId::new("trend", size), &size, |b, _| {
            b.iter(|| follower.process(black_box(&frame)))
        });

        // No quantization
        let mut follower = EnvelopeFollower::new(4.0, Quantizer::Raw);
        group.bench_with_input(BenchmarkId::new("raw", size), &size, |b, _| {
            b.iter(|| follower.process(black_box(&frame)))
        });
    }

    group.finish();
}
