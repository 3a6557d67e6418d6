//! Output gate: decides whether a position update reaches the device.
//!
//! Commands go out only while the source is playing and only when the
//! position changed. Delivery is fire-and-forget: a failed write is logged and
//! dropped, never retried, because the next change supersedes it anyway.

use tracing::{trace, warn};

use crate::{
    io::Transport,
    motion::{command::OutputCommand, position::PositionUpdate},
    DEFAULT_INTERVAL_MS,
};

/// What happened to an offered update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Written to the transport.
    Sent,
    /// Position did not change; nothing written.
    Unchanged,
    /// Source is paused; nothing written.
    Paused,
    /// The transport failed; the command was discarded.
    Dropped,
}

pub struct OutputGate<T> {
    transport: T,
    interval_ms: u32,
    sent: u64,
    dropped: u64,
}

impl<T: Transport> OutputGate<T> {
    pub fn new(transport: T) -> Self {
        Self::with_interval(transport, DEFAULT_INTERVAL_MS)
    }

    /// Gate whose commands carry `interval_ms` as the interval hint.
    pub fn with_interval(transport: T, interval_ms: u32) -> Self {
        Self {
            transport,
            interval_ms,
            sent: 0,
            dropped: 0,
        }
    }

    /// Emit a command for `update` if it changed and the source is playing.
    pub fn offer(&mut self, update: PositionUpdate, playing: bool) -> GateOutcome {
        if !playing {
            return GateOutcome::Paused;
        }
        if !update.changed {
            return GateOutcome::Unchanged;
        }
        self.send(OutputCommand::new(update.position, self.interval_ms))
    }

    /// Write a bare position, bypassing change detection.
    pub fn probe(&mut self, position: u16) -> GateOutcome {
        self.send(OutputCommand::probe(position))
    }

    fn send(&mut self, command: OutputCommand) -> GateOutcome {
        match self.transport.send_line(&command.encode()) {
            Ok(()) => {
                self.sent += 1;
                trace!(%command, "command sent");
                GateOutcome::Sent
            }
            Err(err) => {
                self.dropped += 1;
                warn!(%command, error = %err, "dropping command");
                GateOutcome::Dropped
            }
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }

    /// Commands written successfully.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Commands lost to transport failures.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
