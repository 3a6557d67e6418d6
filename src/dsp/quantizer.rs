//! Snapping of unit loudness values onto a small set of target levels.

/*
Quantization
============

A motion device driven straight from loudness wanders continuously. Many
users prefer it to snap between a few discrete strokes instead: fully out and
fully in, or out / middle / in. The quantizer replaces a value in [0, 1] with
the nearest member of a target set.

  value     0.0 ────── 0.3 ────── 0.55 ────── 0.7 ────── 1.0
  targets   [0, 0.5, 1]
  output    0.0        0.5        0.5         0.5        1.0

Ties
----

The scan walks the targets in their given order and only replaces the
current best when a later target is STRICTLY closer. Equal distances keep the
earlier target, so `[0, 1]` maps 0.5 to 0 while `[1, 0]` maps it to 1. The
order of a target list is therefore part of its meaning and is preserved.

Presets
-------

    "0,1"          two strokes, full range (default)
    "0.2,1"        two strokes, never fully retracted
    "raw"          no quantization, only clamped to [0, 1]
    "0,0.5,1"      three strokes
    "0,0.3,0.7,1"  four strokes
*/

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::finite_or_zero, error::ConfigError, POSITION_MAX};

/// Built-in target sets, in the order a user cycles through them.
pub const PRESETS: &[&[f64]] = &[
    &[0.0, 1.0],
    &[0.2, 1.0],
    &[],
    &[0.0, 0.5, 1.0],
    &[0.0, 0.3, 0.7, 1.0],
];

/// Quantization policy for instantaneous loudness.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Quantizer {
    /// Pass values through, clamped to [0, 1].
    Raw,
    /// Snap onto the nearest of these levels (an empty list behaves like `Raw`).
    Levels(Vec<f64>),
}

impl Quantizer {
    /// Build a quantizer from a target list; an empty list disables snapping.
    pub fn levels(targets: &[f64]) -> Self {
        if targets.is_empty() {
            Self::Raw
        } else {
            Self::Levels(targets.to_vec())
        }
    }

    /// Quantize `value`. Non-finite input counts as silence.
    ///
    /// The result always lies in [0, 1], even for hand-built target lists
    /// holding out-of-range or non-finite levels.
    pub fn apply(&self, value: f64) -> f64 {
        let clamped = finite_or_zero(value).clamp(0.0, 1.0);
        match self {
            Self::Raw => clamped,
            Self::Levels(targets) => nearest(targets, clamped)
                .map_or(clamped, |target| finite_or_zero(target).clamp(0.0, 1.0)),
        }
    }

    /// The active target list (empty when snapping is disabled).
    pub fn targets(&self) -> &[f64] {
        match self {
            Self::Raw => &[],
            Self::Levels(targets) => targets,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.targets().is_empty()
    }

    /// The preset following this one, wrapping around. Custom lists restart at
    /// the first preset.
    pub fn next_preset(&self) -> Self {
        let index = PRESETS
            .iter()
            .position(|preset| *preset == self.targets())
            .map_or(0, |i| (i + 1) % PRESETS.len());
        Self::levels(PRESETS[index])
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::levels(PRESETS[0])
    }
}

/// First target that no later target is strictly closer to `value` than.
fn nearest(targets: &[f64], value: f64) -> Option<f64> {
    targets.iter().copied().reduce(|closest, current| {
        if (current - value).abs() < (closest - value).abs() {
            current
        } else {
            closest
        }
    })
}

impl FromStr for Quantizer {
    type Err = ConfigError;

    /// Parse `raw` or a comma separated list of levels such as `0,0.5,1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("raw") || s.is_empty() {
            return Ok(Self::Raw);
        }

        let mut targets = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(ConfigError::EmptyTarget);
            }
            let target: f64 = part
                .parse()
                .map_err(|_| ConfigError::InvalidTarget(part.to_string()))?;
            if !(0.0..=1.0).contains(&target) {
                return Err(ConfigError::InvalidTarget(part.to_string()));
            }
            targets.push(target);
        }
        Ok(Self::levels(&targets))
    }
}

/// Shows the targets as ascending device positions, e.g. `0, 5000, 9999`.
impl fmt::Display for Quantizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_raw() {
            return f.write_str("Raw");
        }
        let mut positions: Vec<u16> = self
            .targets()
            .iter()
            .map(|target| ((1.0 - target) * POSITION_MAX as f64).round() as u16)
            .collect();
        positions.sort_unstable();
        for (i, position) in positions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{position}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_only_clamps() {
        let q = Quantizer::Raw;
        assert_eq!(q.apply(-0.5), 0.0);
        assert_eq!(q.apply(0.42), 0.42);
        assert_eq!(q.apply(3.0), 1.0);
        assert_eq!(q.apply(f64::NAN), 0.0);
    }

    #[test]
    fn snaps_to_nearest_level() {
        let q = Quantizer::levels(&[0.0, 0.5, 1.0]);
        assert_eq!(q.apply(0.2), 0.0);
        assert_eq!(q.apply(0.3), 0.5);
        assert_eq!(q.apply(0.74), 0.5);
        assert_eq!(q.apply(0.76), 1.0);
        assert_eq!(q.apply(7.0), 1.0);
    }

    #[test]
    fn ties_keep_the_earlier_target() {
        assert_eq!(Quantizer::levels(&[0.0, 1.0]).apply(0.5), 0.0);
        assert_eq!(Quantizer::levels(&[1.0, 0.0]).apply(0.5), 1.0);
    }

    #[test]
    fn empty_levels_behave_like_raw() {
        let q = Quantizer::Levels(Vec::new());
        assert_eq!(q.apply(0.33), 0.33);
        assert!(q.is_raw());
    }

    #[test]
    fn hand_built_levels_stay_in_range() {
        assert_eq!(Quantizer::Levels(vec![1.5]).apply(0.0), 1.0);
        assert_eq!(Quantizer::Levels(vec![-0.5, 2.0]).apply(0.2), 0.0);
        assert_eq!(Quantizer::Levels(vec![f64::NAN]).apply(0.7), 0.0);
    }

    #[test]
    fn parses_presets_and_lists() {
        assert_eq!("raw".parse::<Quantizer>().unwrap(), Quantizer::Raw);
        assert_eq!(
            " 0, 0.3 ,0.7,1".parse::<Quantizer>().unwrap(),
            Quantizer::levels(&[0.0, 0.3, 0.7, 1.0])
        );
        assert_eq!(
            "0,,1".parse::<Quantizer>().unwrap_err(),
            ConfigError::EmptyTarget
        );
        assert!(matches!(
            "0,1.5".parse::<Quantizer>(),
            Err(ConfigError::InvalidTarget(_))
        ));
        assert!(matches!(
            "loud".parse::<Quantizer>(),
            Err(ConfigError::InvalidTarget(_))
        ));
    }

    #[test]
    fn next_preset_cycles() {
        let mut q = Quantizer::default();
        for _ in 0..PRESETS.len() {
            q = q.next_preset();
        }
        assert_eq!(q, Quantizer::default());
        assert_eq!(
            Quantizer::levels(&[0.1, 0.9]).next_preset(),
            Quantizer::levels(PRESETS[0])
        );
    }

    #[test]
    fn displays_as_positions() {
        assert_eq!(Quantizer::default().to_string(), "0, 9999");
        assert_eq!(Quantizer::levels(&[0.0, 0.5, 1.0]).to_string(), "0, 5000, 9999");
        assert_eq!(Quantizer::Raw.to_string(), "Raw");
    }
}
