//! Whole-session benchmarks.
//!
//! These feed a session the way the binary does: frames at the capture
//! cadence with an output tick every few frames.

mod session;

pub use session::bench_session;
