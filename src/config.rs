//! Session configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        beat::DEFAULT_RISE_THRESHOLD,
        envelope::{AMPLIFICATION_RANGE, DEFAULT_AMPLIFICATION},
        Quantizer, Smoothing,
    },
    error::ConfigError,
    motion::Mode,
    DEFAULT_FRAME_LEN, DEFAULT_INTERVAL_MS,
};

/// Everything a session reads from the user. Read at the start of every
/// frame and tick; the pipeline never writes it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Which signal drives the actuator
    pub mode: Mode,
    /// Linear gain on frame RMS, 1..=10
    pub amplification: f64,
    /// Snapping of instantaneous loudness
    pub quantizer: Quantizer,
    /// How loudness history collapses into the smoothed value
    pub smoothing: Smoothing,
    /// Position polling period, also the device interval hint
    pub interval_ms: u32,
    /// Samples per analyser frame
    pub frame_len: usize,
    /// Rise within one excursion that counts as an onset
    pub rise_threshold: f64,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            amplification: DEFAULT_AMPLIFICATION,
            quantizer: Quantizer::default(),
            smoothing: Smoothing::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
            frame_len: DEFAULT_FRAME_LEN,
            rise_threshold: DEFAULT_RISE_THRESHOLD,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the gain, clamped to [1, 10].
    pub fn amplification(mut self, amplification: f64) -> Self {
        self.amplification = if amplification.is_nan() {
            DEFAULT_AMPLIFICATION
        } else {
            amplification.clamp(*AMPLIFICATION_RANGE.start(), *AMPLIFICATION_RANGE.end())
        };
        self
    }

    pub fn quantizer(mut self, quantizer: Quantizer) -> Self {
        self.quantizer = quantizer;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn frame_len(mut self, frame_len: usize) -> Self {
        self.frame_len = frame_len;
        self
    }

    pub fn rise_threshold(mut self, rise_threshold: f64) -> Self {
        self.rise_threshold = rise_threshold;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an amplification factor, rejecting values outside [1, 10].
pub fn parse_amplification(s: &str) -> Result<f64, ConfigError> {
    let s = s.trim();
    let value: f64 = s
        .parse()
        .map_err(|_| ConfigError::InvalidAmplification(s.to_string()))?;
    if AMPLIFICATION_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::AmplificationOutOfRange(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = SessionConfig::default();
        assert_eq!(config.mode, Mode::Envelope);
        assert_eq!(config.amplification, 4.0);
        assert_eq!(config.quantizer, Quantizer::levels(&[0.0, 1.0]));
        assert_eq!(config.interval_ms, 50);
        assert_eq!(config.frame_len, 256);
        assert_eq!(config.rise_threshold, 0.2);
    }

    #[test]
    fn builder_clamps_amplification() {
        assert_eq!(SessionConfig::new().amplification(40.0).amplification, 10.0);
        assert_eq!(SessionConfig::new().amplification(0.5).amplification, 1.0);
        assert_eq!(SessionConfig::new().amplification(f64::NAN).amplification, 4.0);
    }

    #[test]
    fn parses_amplification() {
        assert_eq!(parse_amplification(" 7 "), Ok(7.0));
        assert_eq!(
            parse_amplification("11"),
            Err(ConfigError::AmplificationOutOfRange(11.0))
        );
        assert_eq!(
            parse_amplification("loud"),
            Err(ConfigError::InvalidAmplification("loud".to_string()))
        );
    }
}
