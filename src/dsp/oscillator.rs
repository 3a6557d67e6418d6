//! Tempo-locked skewed ramp oscillator.

/*
Stroke Oscillator
=================

In oscillator mode the actuator does not follow loudness directly. Instead a
low frequency oscillator runs at the detected tempo, and loudness only scales
how far each stroke travels.

Vocabulary
----------

  phase       Position inside one cycle, always in [0, 1). Advanced by
              frequency × elapsed seconds and wrapped by subtracting its floor.

  skew        Where in the cycle the waveform peaks. The ramp rises from
              phase 0 to phase = skew, then falls back by phase 1.

  amplitude   min(loudness × 2, 1). Quiet passages give short strokes.

  elapsed     True wall time between calls, NOT a fixed frame period. Frame
              callbacks jitter; integrating real time keeps the phase locked
              to the tempo regardless of frame rate. The very first call has
              no previous timestamp and assumes 1/30 s.


The Shape
---------

     1 ┐      ╱╲                skew = 0.0   ╲ falling ramp
       │    ╱    ╲              skew = 0.5   ╱╲ triangle
       │  ╱        ╲            skew = 1.0   ╱ rising ramp
     0 └╱────────────╲──→ phase
       0     skew     1

    phase < skew:   raw = phase / skew
    otherwise:      raw = (1 - phase) / (1 - skew)
    skew == 1:      raw = 1 - phase          (no falling segment exists)

The unipolar ramp is mapped to bipolar (raw × 2 - 1) and scaled by amplitude.


Smoothing
---------

At 30 frames per second a 2 Hz ramp is only 15 steps per cycle. The output is
the plain average of the last 10 values, which rounds the corners off the
staircase at the cost of a little peak height.
*/

use std::time::Duration;

use crate::{
    dsp::{finite_or_zero, history::History},
    HISTORY_LEN,
};

/// Elapsed time assumed for the first call, when no previous timestamp exists.
pub const FIRST_FRAME_DT: f64 = 1.0 / 30.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeOscillator {
    phase: f64,        // [0, 1)
    amplitude: f64,    // [0, 1]
    frequency_hz: f64, // tempo used on the last advance
    last_timestamp: Option<Duration>,
    history: History<HISTORY_LEN>,
}

impl StrokeOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` and return the smoothed output in [-1, 1].
    ///
    /// If `now` is not later than the previous call, nothing moves and the
    /// current output is returned unchanged.
    pub fn advance(&mut self, loudness: f64, tempo_hz: f64, skew: f64, now: Duration) -> f64 {
        let dt = match self.last_timestamp {
            None => FIRST_FRAME_DT,
            Some(last) if now > last => (now - last).as_secs_f64(),
            Some(_) => return self.value(),
        };

        self.frequency_hz = finite_or_zero(tempo_hz).max(0.0);
        self.phase += self.frequency_hz * dt;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        debug_assert!((0.0..1.0).contains(&self.phase));

        self.amplitude = (finite_or_zero(loudness).max(0.0) * 2.0).min(1.0);
        let instantaneous = unipolar_to_bipolar(skewed_ramp(self.phase, skew)) * self.amplitude;

        self.history.push(instantaneous);
        self.last_timestamp = Some(now);
        self.value()
    }

    /// Smoothed output: the mean of the recent instantaneous values.
    pub fn value(&self) -> f64 {
        self.history.mean()
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn last_timestamp(&self) -> Option<Duration> {
        self.last_timestamp
    }

    /// Zero all state, as at the start of a new session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unipolar skewed ramp in [0, 1] at `phase` (in [0, 1)).
///
/// `skew` is clamped to [0, 1]: 0 gives a falling ramp, 0.5 a triangle
/// peaking at phase 0.5, 1 a rising ramp.
pub fn skewed_ramp(phase: f64, skew: f64) -> f64 {
    let skew = finite_or_zero(skew).clamp(0.0, 1.0);
    let raw = if skew != 0.0 && phase < skew {
        phase / skew
    } else if skew != 1.0 {
        (1.0 - phase) / (1.0 - skew)
    } else {
        1.0 - phase
    };
    raw.clamp(0.0, 1.0)
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f64) -> f64 {
    (bipolar + 1.0) * 0.5
}

/// Convert unipolar signal (0.0 to 1.0) to bipolar (-1.0 to +1.0).
#[inline]
pub fn unipolar_to_bipolar(unipolar: f64) -> f64 {
    (unipolar * 2.0) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn triangle_is_symmetric_and_peaks_mid_cycle() {
        assert_eq!(skewed_ramp(0.5, 0.5), 1.0);
        assert_eq!(skewed_ramp(0.0, 0.5), 0.0);
        for &phase in &[0.1, 0.2, 0.25, 0.4] {
            let left = skewed_ramp(phase, 0.5);
            let right = skewed_ramp(1.0 - phase, 0.5);
            assert!((left - right).abs() < 1e-12, "asymmetric at {phase}");
        }
    }

    #[test]
    fn skew_extremes_are_ramps() {
        // falling ramp
        assert_eq!(skewed_ramp(0.0, 0.0), 1.0);
        assert!((skewed_ramp(0.75, 0.0) - 0.25).abs() < 1e-12);
        // rising ramp
        assert!((skewed_ramp(0.25, 1.0) - 0.25).abs() < 1e-12);
        assert!((skewed_ramp(0.9, 1.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn first_call_assumes_thirty_fps() {
        let mut osc = StrokeOscillator::new();
        osc.advance(1.0, 3.0, 0.5, secs(5.0));
        assert!((osc.phase() - 3.0 / 30.0).abs() < 1e-12);
        assert_eq!(osc.last_timestamp(), Some(secs(5.0)));
    }

    #[test]
    fn phase_advances_by_elapsed_time() {
        let mut osc = StrokeOscillator::new();
        osc.advance(1.0, 0.0, 0.5, secs(0.0));
        osc.advance(1.0, 0.5, 0.5, secs(0.5));
        assert!((osc.phase() - 0.25).abs() < 1e-12);
        assert_eq!(osc.frequency_hz(), 0.5);
    }

    #[test]
    fn whole_cycles_wrap_to_zero() {
        let mut osc = StrokeOscillator::new();
        osc.advance(1.0, 0.0, 0.6, secs(0.0));
        let start = skewed_ramp(osc.phase(), 0.6);
        osc.advance(1.0, 1.0, 0.6, secs(1.0));
        assert_eq!(osc.phase(), 0.0);
        assert_eq!(skewed_ramp(osc.phase(), 0.6), start);
    }

    #[test]
    fn stale_timestamp_does_not_move_phase() {
        let mut osc = StrokeOscillator::new();
        osc.advance(1.0, 2.0, 0.5, secs(1.0));
        let snapshot = osc.clone();
        let out = osc.advance(1.0, 2.0, 0.5, secs(1.0));
        assert_eq!(osc, snapshot);
        assert_eq!(out, snapshot.value());
        osc.advance(1.0, 2.0, 0.5, secs(0.5));
        assert_eq!(osc, snapshot);
    }

    #[test]
    fn amplitude_follows_loudness() {
        let mut osc = StrokeOscillator::new();
        osc.advance(0.2, 1.0, 0.5, secs(0.0));
        assert!((osc.amplitude() - 0.4).abs() < 1e-12);
        osc.advance(0.9, 1.0, 0.5, secs(0.1));
        assert_eq!(osc.amplitude(), 1.0);
        osc.advance(f64::NAN, 1.0, 0.5, secs(0.2));
        assert_eq!(osc.amplitude(), 0.0);
    }

    #[test]
    fn output_is_mean_of_window() {
        let mut osc = StrokeOscillator::new();
        // phase 0 on a triangle is the trough: -1 at full amplitude
        let out = osc.advance(1.0, 0.0, 0.5, secs(0.0));
        assert!((out - (-1.0 / HISTORY_LEN as f64)).abs() < 1e-12);
    }

    #[test]
    fn output_stays_in_range() {
        let mut osc = StrokeOscillator::new();
        for i in 0..2000 {
            let out = osc.advance(1.0, 3.7, 0.6, secs(i as f64 * 0.013));
            assert!((-1.0..=1.0).contains(&out));
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn bipolar_unipolar_roundtrip() {
        assert_eq!(bipolar_to_unipolar(-1.0), 0.0);
        assert_eq!(bipolar_to_unipolar(1.0), 1.0);
        assert_eq!(unipolar_to_bipolar(0.5), 0.0);
    }
}
