//! Position commands as sent to the device.
//!
//! One command per line: `L0` (linear axis 0), the position as four digits,
//! then optionally `I` and the time in milliseconds the device should take to
//! get there. The digits are read as a fraction of the travel, so they must be
//! zero-padded: `L00050` is 0.5 % of travel while `L050` would be 50 %.
//!
//! ```
//! use motion_follow::motion::OutputCommand;
//! assert_eq!(OutputCommand::new(42, 50).encode(), "L00042I50\n");
//! assert_eq!(OutputCommand::probe(7311).encode(), "L07311\n");
//! ```

use std::fmt;

use crate::POSITION_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputCommand {
    position: u16,
    interval_ms: Option<u32>,
}

impl OutputCommand {
    /// Move to `position` over `interval_ms`. Positions above 9999 are clamped.
    pub fn new(position: u16, interval_ms: u32) -> Self {
        Self {
            position: position.min(POSITION_MAX),
            interval_ms: Some(interval_ms),
        }
    }

    /// A bare position without interval hint, used to check the link.
    pub fn probe(position: u16) -> Self {
        Self {
            position: position.min(POSITION_MAX),
            interval_ms: None,
        }
    }

    pub fn position(&self) -> u16 {
        self.position
    }

    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms
    }

    /// The newline-terminated line to write to the device.
    pub fn encode(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for OutputCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L0{:04}", self.position)?;
        if let Some(interval) = self.interval_ms {
            write!(f, "I{interval}")?;
        }
        Ok(())
    }
}
