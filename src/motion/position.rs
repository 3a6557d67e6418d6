//! Position mapping.
//!
//! The actuator takes an integer target in `0..=9999`. In envelope mode
//! loudness is inverted so silence rests at 9999 and loud passages drive
//! toward 0. In oscillator mode the bipolar oscillator output is remapped to
//! unit range first. Each tick compares the new position against the one held
//! before the tick, which is what the output gate uses to suppress repeats.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{finite_or_zero, oscillator::bipolar_to_unipolar},
    error::ConfigError,
    POSITION_MAX,
};

/// Position held before the first tick.
pub const INITIAL_POSITION: u16 = 5000;
/// "Previous" position before the first tick; differs from
/// [`INITIAL_POSITION`] so the first tick always reports a change.
pub const INITIAL_PREVIOUS_POSITION: u16 = POSITION_MAX;

/// Which signal drives the actuator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Follow smoothed loudness directly.
    #[default]
    Envelope,
    /// Follow the tempo-locked oscillator.
    Oscillator,
}

impl Mode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Envelope => Self::Oscillator,
            Self::Oscillator => Self::Envelope,
        }
    }

    /// Unit-range value this mode derives from the signals.
    pub fn unit_value(self, signal: MotionSignal) -> f64 {
        match self {
            Self::Envelope => 1.0 - finite_or_zero(signal.loudness),
            Self::Oscillator => bipolar_to_unipolar(finite_or_zero(signal.oscillator)),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "envelope" | "env" => Ok(Self::Envelope),
            "oscillator" | "osc" => Ok(Self::Oscillator),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => f.write_str("envelope"),
            Self::Oscillator => f.write_str("oscillator"),
        }
    }
}

/// Latest values of both candidate signals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSignal {
    /// Smoothed loudness in [0, 1].
    pub loudness: f64,
    /// Smoothed oscillator output in [-1, 1].
    pub oscillator: f64,
}

/// Result of one mapping tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub position: u16,
    /// Whether `position` differs from the position before this tick.
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionMapper {
    current: u16,
    previous: u16,
}

impl PositionMapper {
    pub fn new() -> Self {
        Self {
            current: INITIAL_POSITION,
            previous: INITIAL_PREVIOUS_POSITION,
        }
    }

    /// Recompute the position from `signal` under `mode`.
    pub fn tick(&mut self, mode: Mode, signal: MotionSignal) -> PositionUpdate {
        self.previous = self.current;
        self.current = unit_to_position(mode.unit_value(signal));
        PositionUpdate {
            position: self.current,
            changed: self.current != self.previous,
        }
    }

    pub fn current(&self) -> u16 {
        self.current
    }

    pub fn previous(&self) -> u16 {
        self.previous
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PositionMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear rescale of a unit value onto `0..=POSITION_MAX`, rounding to nearest.
pub fn unit_to_position(value: f64) -> u16 {
    let clamped = finite_or_zero(value).clamp(0.0, 1.0);
    (clamped * POSITION_MAX as f64).round() as u16
}
