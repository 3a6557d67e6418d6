//! Benchmarks for the per-frame and per-tick pipeline paths.
//!
//! Run with: cargo bench
//!
//! Every frame has to be processed well before the next one arrives.
//! Reference frame periods at 48kHz sample rate:
//!   - 128 samples  = 2.67ms
//!   - 256 samples  = 5.33ms
//!   - 512 samples  = 10.67ms
//!   - 1024 samples = 21.33ms
//!
//! Benchmark groups:
//!   - dsp/*        Envelope follower, beat detector, oscillator
//!   - scenarios/*  Whole sessions fed with synthetic audio

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Analyser frame lengths worth measuring.
pub const FRAME_SIZES: &[usize] = &[128, 256, 512, 1024];

/// Byte frame of a sine burst at `amplitude` (0..=1) around the 128 midpoint.
pub fn sine_frame(len: usize, amplitude: f64) -> Vec<u8> {
    (0..len)
        .map(|i| {
            let phase = i as f64 / len as f64 * std::f64::consts::TAU * 4.0;
            (128.0 + 127.0 * amplitude * phase.sin()).round() as u8
        })
        .collect()
}

criterion_group!(
    benches,
    // Signal primitives
    dsp::bench_envelope,
    dsp::bench_beat,
    dsp::bench_oscillator,
    // Whole pipeline
    scenarios::bench_session,
);
criterion_main!(benches);
