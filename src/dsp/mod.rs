//! Low-level signal primitives for the audio-to-motion pipeline.
//!
//! Everything here performs a bounded amount of work per call. The only
//! growable buffer is the beat window, preallocated for typical frame rates,
//! so the primitives are safe to drive from a frame callback. They only do the
//! math; sequencing them into a session is the job of
//! [`crate::session::MotionSession`].

/// Rhythmic onset detection and tempo estimation.
pub mod beat;
/// RMS loudness follower with recency-weighted smoothing.
pub mod envelope;
/// Fixed-capacity ring of the most recent values.
pub mod history;
/// Tempo-locked skewed ramp oscillator.
pub mod oscillator;
/// Snapping of unit values onto discrete target levels.
pub mod quantizer;

pub use beat::BeatDetector;
pub use envelope::{EnvelopeFollower, EnvelopeReading, Smoothing};
pub use history::History;
pub use oscillator::StrokeOscillator;
pub use quantizer::Quantizer;

/// Replace non-finite values with zero so they never leak into state.
#[inline]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
