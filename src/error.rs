//! Error types for session setup, configuration parsing and transports.
//!
//! None of these ever escape the per-frame or per-tick paths: signal math is
//! total, and transport failures are absorbed by the output gate.

/// Failure to start a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The audio source delivers no samples per frame.
    #[error("audio source not found or reports no samples per frame")]
    MissingSource,
}

/// Failure to deliver a command line to the device.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Underlying writer failed
    #[error("transport write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The device went away
    #[error("transport is closed")]
    Closed,
}

/// Invalid configuration text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A quantizer target that is not a number in [0, 1]
    #[error("invalid quantizer target '{0}': expected a number in [0, 1]")]
    InvalidTarget(String),

    /// A comma list containing an empty entry
    #[error("quantizer target list contains an empty entry")]
    EmptyTarget,

    /// Amplification that is not a number
    #[error("invalid amplification '{0}': expected a number in [1, 10]")]
    InvalidAmplification(String),

    /// Amplification outside [1, 10]
    #[error("amplification {0} is outside [1, 10]")]
    AmplificationOutOfRange(f64),

    /// Unrecognised mode name
    #[error("unknown mode '{0}': expected 'envelope' or 'oscillator'")]
    UnknownMode(String),
}
