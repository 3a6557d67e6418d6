//! From signal to device: position mapping, command text and output gating.

/// Wire format of position commands.
pub mod command;
/// Edge-triggered command emission.
pub mod gate;
/// Signal selection and rescaling to actuator positions.
pub mod position;

pub use command::OutputCommand;
pub use gate::{GateOutcome, OutputGate};
pub use position::{Mode, MotionSignal, PositionMapper, PositionUpdate};
