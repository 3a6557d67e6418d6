//! The per-source session context.
//!
//! A `MotionSession` owns every piece of pipeline state for one audio source:
//! envelope history, beat detector, oscillator and position mapper. Callers
//! create one when a source is acquired, feed it frames as they arrive, tick
//! it on the output timer, and reset or drop it when the source goes away so
//! no phase or tempo leaks into the next source.
//!
//! Frames and ticks run on independent cadences. `process_frame` updates the
//! signal state as fast as frames arrive; `tick` only samples the latest
//! smoothed values.

use std::time::Duration;

use tracing::debug;

use crate::{
    config::SessionConfig,
    dsp::{
        beat::BeatDetector,
        envelope::{EnvelopeFollower, EnvelopeReading},
        oscillator::StrokeOscillator,
        Quantizer, Smoothing,
    },
    error::SessionError,
    motion::{Mode, MotionSignal, PositionMapper, PositionUpdate},
};

/// Everything one frame produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutput {
    pub loudness: EnvelopeReading,
    pub tempo_hz: f64,
    pub skew: f64,
    /// Smoothed oscillator output in [-1, 1]
    pub oscillator: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionSession {
    config: SessionConfig,
    envelope: EnvelopeFollower,
    beat: BeatDetector,
    oscillator: StrokeOscillator,
    position: PositionMapper,
    last: FrameOutput,
    frames: u64,
}

impl MotionSession {
    /// Create state for a source delivering `config.frame_len` samples per frame.
    ///
    /// Fails without creating any state when the source delivers nothing.
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        if config.frame_len == 0 {
            return Err(SessionError::MissingSource);
        }

        let envelope = EnvelopeFollower::new(config.amplification, config.quantizer.clone())
            .with_smoothing(config.smoothing);
        let beat = BeatDetector::with_threshold(config.rise_threshold);

        debug!(
            mode = %config.mode,
            amplification = config.amplification,
            quantizer = %config.quantizer,
            frame_len = config.frame_len,
            "session started"
        );

        Ok(Self {
            config,
            envelope,
            beat,
            oscillator: StrokeOscillator::new(),
            position: PositionMapper::new(),
            last: FrameOutput::default(),
            frames: 0,
        })
    }

    /// Run one frame captured at `now` through envelope, beat detector and
    /// oscillator.
    pub fn process_frame(&mut self, samples: &[u8], now: Duration) -> FrameOutput {
        let loudness = self.envelope.process(samples);
        let tempo_hz = self.beat.update(loudness.raw, now);
        let skew = self.beat.skew();
        let oscillator = self
            .oscillator
            .advance(loudness.smoothed, tempo_hz, skew, now);

        self.frames += 1;
        self.last = FrameOutput {
            loudness,
            tempo_hz,
            skew,
            oscillator,
        };
        self.last
    }

    /// Map the latest signals to a position under the configured mode.
    pub fn tick(&mut self) -> PositionUpdate {
        let signal = MotionSignal {
            loudness: self.last.loudness.smoothed,
            oscillator: self.last.oscillator,
        };
        self.position.tick(self.config.mode, signal)
    }

    /// Tick only while the source is playing.
    ///
    /// A paused source leaves change detection frozen, so the first tick
    /// after resuming compares against the last position the device saw.
    pub fn poll(&mut self, playing: bool) -> Option<PositionUpdate> {
        playing.then(|| self.tick())
    }

    /// Return all pipeline state to its initial values. Configuration is kept.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.beat.reset();
        self.oscillator.reset();
        self.position.reset();
        self.last = FrameOutput::default();
        self.frames = 0;
        debug!("session reset");
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
    }

    pub fn set_amplification(&mut self, amplification: f64) {
        self.envelope.set_amplification(amplification);
        self.config.amplification = self.envelope.amplification();
    }

    pub fn set_quantizer(&mut self, quantizer: Quantizer) {
        self.envelope.set_quantizer(quantizer.clone());
        self.config.quantizer = quantizer;
    }

    pub fn set_smoothing(&mut self, smoothing: Smoothing) {
        self.envelope.set_smoothing(smoothing);
        self.config.smoothing = smoothing;
    }

    pub fn set_rise_threshold(&mut self, rise_threshold: f64) {
        self.beat.set_rise_threshold(rise_threshold);
        self.config.rise_threshold = self.beat.rise_threshold();
    }

    /// Output of the most recent frame.
    pub fn last_frame(&self) -> FrameOutput {
        self.last
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn envelope(&self) -> &EnvelopeFollower {
        &self.envelope
    }

    pub fn beat(&self) -> &BeatDetector {
        &self.beat
    }

    pub fn oscillator(&self) -> &StrokeOscillator {
        &self.oscillator
    }

    pub fn position(&self) -> &PositionMapper {
        &self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn refuses_source_without_samples() {
        let config = SessionConfig::new().frame_len(0);
        assert!(matches!(
            MotionSession::start(config),
            Err(SessionError::MissingSource)
        ));
    }

    #[test]
    fn frames_feed_every_stage() {
        let mut session = MotionSession::start(SessionConfig::new().quantizer(Quantizer::Raw))
            .unwrap();
        let loud: Vec<u8> = (0..256).map(|i| if i % 2 == 0 { 160 } else { 96 }).collect();
        let out = session.process_frame(&loud, ms(0));
        assert!(out.loudness.raw > 0.0);
        assert_eq!(session.frames_processed(), 1);
        assert_eq!(session.oscillator().last_timestamp(), Some(ms(0)));
        assert_eq!(session.beat().previous_loudness(), out.loudness.raw);
    }

    #[test]
    fn setters_update_config_and_components() {
        let mut session = MotionSession::start(SessionConfig::new()).unwrap();
        session.set_amplification(12.0);
        assert_eq!(session.config().amplification, 10.0);
        assert_eq!(session.envelope().amplification(), 10.0);

        session.set_quantizer(Quantizer::Raw);
        assert!(session.envelope().quantizer().is_raw());

        session.set_mode(Mode::Oscillator);
        assert_eq!(session.mode(), Mode::Oscillator);
    }

    #[test]
    fn reset_clears_state_but_keeps_config() {
        let config = SessionConfig::new().mode(Mode::Oscillator).amplification(6.0);
        let fresh = MotionSession::start(config.clone()).unwrap();
        let mut session = fresh.clone();
        for i in 0..20 {
            let level = if i % 3 == 0 { 250 } else { 128 };
            session.process_frame(&[level; 256], ms(i * 16));
            session.tick();
        }
        assert_ne!(session, fresh);

        session.reset();
        assert_eq!(session, fresh);
        assert_eq!(session.config(), &config);
    }
}
