//! Cutting a sample stream into fixed-size analyser frames.
//!
//! The capture callback runs on the audio thread. It only pushes samples
//! into a lock-free ring; the session thread pops them here and assembles
//! byte frames, so all pipeline state is touched from one thread.

use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::io::converter::sample_to_byte;

/// Source of mono float samples, in arrival order.
pub trait SampleReceiver {
    fn pop(&mut self) -> Option<f32>;
}

#[cfg(feature = "rtrb")]
impl SampleReceiver for Consumer<f32> {
    fn pop(&mut self) -> Option<f32> {
        Consumer::pop(self).ok()
    }
}

impl SampleReceiver for VecDeque<f32> {
    fn pop(&mut self) -> Option<f32> {
        self.pop_front()
    }
}

pub struct FrameAssembler {
    frame: Vec<u8>,
    filled: usize,
}

impl FrameAssembler {
    /// Assembler producing frames of `frame_len` bytes (at least one).
    pub fn new(frame_len: usize) -> Self {
        Self {
            frame: vec![128; frame_len.max(1)],
            filled: 0,
        }
    }

    /// Pull samples until a frame is complete.
    ///
    /// Returns the frame when it fills up; returns `None` when the receiver
    /// runs dry first, keeping the partial frame for the next call.
    pub fn fill<R: SampleReceiver + ?Sized>(&mut self, rx: &mut R) -> Option<&[u8]> {
        while self.filled < self.frame.len() {
            let sample = rx.pop()?;
            self.frame[self.filled] = sample_to_byte(sample);
            self.filled += 1;
        }
        self.filled = 0;
        Some(&self.frame)
    }

    pub fn frame_len(&self) -> usize {
        self.frame.len()
    }

    /// Samples already collected toward the next frame.
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Discard any partial frame.
    pub fn clear(&mut self) {
        self.filled = 0;
    }
}
