//! Benchmarks for a full session: frame processing plus output ticks.

use std::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion};
use motion_follow::{
    io::LineTransport,
    motion::{Mode, OutputGate},
    MotionSession, SessionConfig,
};

use crate::{sine_frame, FRAME_SIZES};

/// Frames per output tick (256 samples @ 48kHz ≈ 5.3ms, tick every 50ms)
const FRAMES_PER_TICK: usize = 10;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &size in FRAME_SIZES {
        // Loud and quiet frames alternate so beats keep firing
        let loud = sine_frame(size, 0.9);
        let quiet = sine_frame(size, 0.1);
        let frame_period = Duration::from_secs_f64(size as f64 / 48_000.0);

        for mode in [Mode::Envelope, Mode::Oscillator] {
            let config = SessionConfig::new().mode(mode).frame_len(size);
            let Ok(mut session) = MotionSession::start(config) else {
                continue;
            };
            let mut gate = OutputGate::new(LineTransport::new(std::io::sink()));
            let mut now = Duration::ZERO;
            let mut count = 0usize;

            let name = format!("{mode}");
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    now += frame_period;
                    count += 1;
                    let frame = if count % 4 < 2 { &loud } else { &quiet };
                    session.process_frame(black_box(frame), now);
                    if count % FRAMES_PER_TICK == 0 {
                        let update = session.tick();
                        gate.offer(update, true);
                    }
                })
            });
        }
    }

    group.finish();
}
