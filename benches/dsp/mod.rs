//! Benchmarks for the signal primitives.

mod beat;
mod envelope;
mod oscillator;

pub use beat::bench_beat;
pub use envelope::bench_envelope;
pub use oscillator::bench_oscillator;
