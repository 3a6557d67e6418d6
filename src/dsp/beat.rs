//! Onset detection on the per-frame loudness, and tempo estimation from the
//! onsets in a short trailing window.

/*
Beat Detection
==============

Vocabulary
----------

  excursion     A run of consecutive frames whose loudness keeps increasing.
                It ends on the first frame that is not louder than the last.

  rise          Total loudness gained during the current excursion, the sum
                of its positive frame-to-frame deltas.

  onset (beat)  An excursion whose rise reached the threshold (0.2 of the full
                loudness range). It is stamped with the time of the frame that
                ENDED the excursion.

  tempo         Onsets per second across the trailing 1.5 s window. It drives
                the oscillator frequency, so it is kept within 0.1..=4 Hz.


The State Machine
-----------------

                   delta > 0
           ┌──────────────────────┐     delta > 0: rise += delta
           │                      ↓   ┌────┐
      ┌─────────┐             ┌────────┐  │
      │ FALLING │             │ RISING │ ←┘
      └─────────┘             └────────┘
           ↑                      │
           └──────────────────────┘
             delta <= 0: if rise >= threshold, record onset
                         rise = 0 either way

A partial rise is discarded whenever an excursion ends short of the
threshold, even if the next frame starts climbing again.


Tempo From Onsets
-----------------

With n >= 2 onsets in the window:

    rate = (n - 1) / (newest - oldest)          onsets per second

A single onset gives no interval to measure, so the tempo falls back to
0.3 Hz. An empty window leaves the previous tempo in place.

Bursts of noisy onsets can produce absurd rates. Above 4 Hz the rate goes
through a fourth-root compressor before clamping:

    f(x) = x                               x <= 4
    f(x) = sign(x - 1) · |x - 1|^(1/4)     x >  4

    rate    5.0   10.0   20.0   50.0
    f(x)    1.41   1.73   2.09   2.65

so a flood of onsets slows the oscillator down instead of pinning it to the
ceiling.


Skew
----

Tempo also picks the waveform asymmetry: above 2 Hz a symmetric triangle
(skew 0.5), otherwise a skewed ramp (skew 0.6) with a sharper edge that reads
as a percussive attack at slow tempos.
*/

use std::{collections::VecDeque, ops::RangeInclusive, time::Duration};

use tracing::debug;

use crate::dsp::finite_or_zero;

/// Trailing window over which onsets count toward the tempo.
pub const BEAT_WINDOW: Duration = Duration::from_millis(1500);
/// Rise needed within one excursion to register an onset.
pub const DEFAULT_RISE_THRESHOLD: f64 = 0.2;
/// Tempo used when only a single onset is known.
pub const DEFAULT_TEMPO_HZ: f64 = 0.3;
/// Tempo estimates are clamped to this range.
pub const TEMPO_RANGE: RangeInclusive<f64> = 0.1..=4.0;

const FAST_TEMPO_HZ: f64 = 2.0;
const SYMMETRIC_SKEW: f64 = 0.5;
const PERCUSSIVE_SKEW: f64 = 0.6;
const COMPRESS_ABOVE_HZ: f64 = 4.0;
// An onset needs a rising and a falling frame, so 256-sample frames at 48 kHz
// fit at most ~140 onsets into one window
const BEAT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct BeatDetector {
    rise_threshold: f64,

    // Excursion tracking
    previous_loudness: f64,
    rising: bool,
    accumulated_rise: f64,

    // Onset times inside the trailing window, oldest first
    beats: VecDeque<Duration>,

    tempo_hz: f64,
    skew: f64,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_RISE_THRESHOLD)
    }

    /// Detector with a custom onset threshold (fraction of the loudness range).
    pub fn with_threshold(rise_threshold: f64) -> Self {
        Self {
            rise_threshold: finite_or_zero(rise_threshold).max(0.0),
            previous_loudness: 0.0,
            rising: false,
            accumulated_rise: 0.0,
            beats: VecDeque::with_capacity(BEAT_CAPACITY),
            tempo_hz: DEFAULT_TEMPO_HZ,
            skew: skew_for_tempo(DEFAULT_TEMPO_HZ),
        }
    }

    /// Feed one frame's raw loudness observed at `now` and return the tempo.
    pub fn update(&mut self, raw_loudness: f64, now: Duration) -> f64 {
        let loudness = finite_or_zero(raw_loudness);
        let delta = loudness - self.previous_loudness;

        if delta > 0.0 {
            if self.rising {
                self.accumulated_rise += delta;
            } else {
                self.rising = true;
                self.accumulated_rise = delta;
            }
        } else {
            if self.rising && self.accumulated_rise >= self.rise_threshold {
                self.beats.push_back(now);
                debug!(
                    at_ms = now.as_millis() as u64,
                    rise = self.accumulated_rise,
                    "onset detected"
                );
            }
            self.rising = false;
            self.accumulated_rise = 0.0;
        }

        self.prune(now);
        self.estimate_tempo();
        self.skew = skew_for_tempo(self.tempo_hz);
        self.previous_loudness = loudness;

        self.tempo_hz
    }

    /// Drop onsets older than the trailing window.
    fn prune(&mut self, now: Duration) {
        let horizon = now.saturating_sub(BEAT_WINDOW);
        while self.beats.front().is_some_and(|&t| t < horizon) {
            self.beats.pop_front();
        }
    }

    fn estimate_tempo(&mut self) {
        match (self.beats.front(), self.beats.back()) {
            (Some(&oldest), Some(&newest)) if self.beats.len() >= 2 => {
                let span = newest.saturating_sub(oldest).as_secs_f64();
                let rate = (self.beats.len() - 1) as f64 / span;
                let tempo = compress_tempo(rate);
                self.tempo_hz = if tempo.is_nan() {
                    *TEMPO_RANGE.end()
                } else {
                    tempo.clamp(*TEMPO_RANGE.start(), *TEMPO_RANGE.end())
                };
            }
            (Some(_), _) => self.tempo_hz = DEFAULT_TEMPO_HZ,
            _ => {}
        }
    }

    /// Current tempo estimate in Hz.
    pub fn tempo_hz(&self) -> f64 {
        self.tempo_hz
    }

    /// Waveform asymmetry matching the current tempo.
    pub fn skew(&self) -> f64 {
        self.skew
    }

    pub fn is_rising(&self) -> bool {
        self.rising
    }

    pub fn accumulated_rise(&self) -> f64 {
        self.accumulated_rise
    }

    pub fn previous_loudness(&self) -> f64 {
        self.previous_loudness
    }

    /// Number of onsets currently inside the window.
    pub fn beat_count(&self) -> usize {
        self.beats.len()
    }

    /// Onset times inside the window, oldest first.
    pub fn beats(&self) -> impl Iterator<Item = Duration> + '_ {
        self.beats.iter().copied()
    }

    pub fn rise_threshold(&self) -> f64 {
        self.rise_threshold
    }

    pub fn set_rise_threshold(&mut self, rise_threshold: f64) {
        self.rise_threshold = finite_or_zero(rise_threshold).max(0.0);
    }

    /// Return to the initial state, keeping the threshold.
    pub fn reset(&mut self) {
        self.previous_loudness = 0.0;
        self.rising = false;
        self.accumulated_rise = 0.0;
        self.beats.clear();
        self.tempo_hz = DEFAULT_TEMPO_HZ;
        self.skew = skew_for_tempo(DEFAULT_TEMPO_HZ);
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Fourth-root compression of onset rates above 4 Hz.
#[inline]
pub fn compress_tempo(rate: f64) -> f64 {
    if rate <= COMPRESS_ABOVE_HZ {
        rate
    } else {
        let excess = rate - 1.0;
        excess.signum() * excess.abs().powf(0.25)
    }
}

/// Waveform skew for a tempo: symmetric when fast, ramp-like when slow.
#[inline]
pub fn skew_for_tempo(tempo_hz: f64) -> f64 {
    if tempo_hz > FAST_TEMPO_HZ {
        SYMMETRIC_SKEW
    } else {
        PERCUSSIVE_SKEW
    }
}
