//! Loudness follower: one frame of byte samples in, one smoothed loudness out.

/*
Envelope Following
==================

The follower turns each analyser frame into a single number in [0, 1] that
tracks how loud the audio is right now.

Vocabulary
----------

  frame         N unsigned 8-bit time-domain samples (typically 256). 128 is
                the zero line, 0 and 255 the negative and positive peaks.

  RMS           Root mean square: sqrt(mean(x²)). A loudness proxy that is
                insensitive to the sign of the waveform.

  amplification Linear gain applied to the RMS (1..=10, default 4). Program
                material rarely exceeds 0.25 RMS, so gain is needed to use the
                full range. The product is clamped to 1.0.

  raw           The clamped, quantized per-frame loudness. The beat detector
                works on this value because onsets live in frame-to-frame
                deltas, which smoothing would blur.

  smoothed      The recency-weighted average of the last 10 raw values. This
                is what drives the actuator in envelope mode.


The Pipeline
------------

    bytes ──→ (s-128)/128 ──→ RMS ──→ ×gain ──→ min(1) ──→ quantize ──→ raw
                                                                        │
                                                     history (10) ←─────┘
                                                        │
                                                weighted mean ──→ smoothed


Weighted Moving Average
-----------------------

Slot i of the history (0 = oldest, 9 = newest) has weight i+1:

    smoothed = Σ value_i·(i+1) / Σ (i+1) = Σ value_i·(i+1) / 55

The newest frame counts ten times as much as the oldest, which removes
flicker while lagging far less than a plain average of the same length.
The history starts filled with zeros, so the first frames ramp up from
silence rather than jumping.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{finite_or_zero, history::History, quantizer::Quantizer},
    HISTORY_LEN,
};

/// Default linear gain applied to frame RMS.
pub const DEFAULT_AMPLIFICATION: f64 = 4.0;
/// Accepted amplification range.
pub const AMPLIFICATION_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

/// How the loudness history is collapsed into the smoothed value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Recency-weighted moving average.
    #[default]
    Weighted,
    /// Window maximum while loudness trends up, minimum otherwise.
    Trend,
}

/// Both loudness values produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvelopeReading {
    /// Clamped and quantized loudness of this frame alone.
    pub raw: f64,
    /// Smoothed loudness over the recent history.
    pub smoothed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeFollower {
    amplification: f64,
    quantizer: Quantizer,
    smoothing: Smoothing,
    history: History<HISTORY_LEN>,
    last: EnvelopeReading,
}

impl EnvelopeFollower {
    pub fn new(amplification: f64, quantizer: Quantizer) -> Self {
        Self {
            amplification: clamp_amplification(amplification),
            quantizer,
            smoothing: Smoothing::Weighted,
            history: History::new(),
            last: EnvelopeReading::default(),
        }
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Consume one frame and return its raw and smoothed loudness.
    pub fn process(&mut self, samples: &[u8]) -> EnvelopeReading {
        let loudness = frame_rms(samples) * self.amplification;
        let raw = self.quantizer.apply(loudness);

        self.history.push(raw);
        let smoothed = match self.smoothing {
            Smoothing::Weighted => self.history.weighted_mean(),
            Smoothing::Trend => self.history.trend_extreme(),
        };

        self.last = EnvelopeReading {
            raw,
            smoothed: finite_or_zero(smoothed).clamp(0.0, 1.0),
        };
        debug_assert!((0.0..=1.0).contains(&self.last.raw));
        self.last
    }

    /// The reading produced by the most recent frame.
    pub fn reading(&self) -> EnvelopeReading {
        self.last
    }

    pub fn history(&self) -> &History<HISTORY_LEN> {
        &self.history
    }

    pub fn amplification(&self) -> f64 {
        self.amplification
    }

    /// Set the gain, clamped to [`AMPLIFICATION_RANGE`].
    pub fn set_amplification(&mut self, amplification: f64) {
        self.amplification = clamp_amplification(amplification);
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    pub fn set_quantizer(&mut self, quantizer: Quantizer) {
        self.quantizer = quantizer;
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, smoothing: Smoothing) {
        self.smoothing = smoothing;
    }

    /// Forget all loudness history. Configuration is kept.
    pub fn reset(&mut self) {
        self.history.reset();
        self.last = EnvelopeReading::default();
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(DEFAULT_AMPLIFICATION, Quantizer::default())
    }
}

/// Root mean square of a byte frame, with samples normalized to [-1, 1].
///
/// An empty frame is silence.
pub fn frame_rms(samples: &[u8]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples
        .iter()
        .map(|&sample| {
            let normalized = (sample as f64 - 128.0) / 128.0;
            normalized * normalized
        })
        .sum();
    (sum / samples.len() as f64).sqrt()
}

fn clamp_amplification(amplification: f64) -> f64 {
    if amplification.is_nan() {
        return DEFAULT_AMPLIFICATION;
    }
    amplification.clamp(*AMPLIFICATION_RANGE.start(), *AMPLIFICATION_RANGE.end())
}
