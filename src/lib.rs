pub mod config;
pub mod dsp; // Envelope, beat and oscillator primitives
pub mod error;
pub mod io;
pub mod motion; // Position mapping and command output
pub mod session;

pub use config::SessionConfig;
pub use session::MotionSession;

/// Number of recent values kept by the envelope and oscillator smoothing windows.
pub const HISTORY_LEN: usize = 10;
/// Largest actuator position. Positions span `0..=POSITION_MAX`.
pub const POSITION_MAX: u16 = 9999;
/// Samples per analyser frame.
pub const DEFAULT_FRAME_LEN: usize = 256;
/// Position polling cadence, also sent to the device as the interval hint.
pub const DEFAULT_INTERVAL_MS: u32 = 50;
