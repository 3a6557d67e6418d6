// Purpose - external interfaces, format conversions

pub mod converter;
pub mod frames;

use std::io::Write;

use crate::error::TransportError;

pub use frames::{FrameAssembler, SampleReceiver};

/// Write-only line sink toward the motion device.
pub trait Transport {
    /// Deliver one complete, newline-terminated command line.
    fn send_line(&mut self, line: &str) -> Result<(), TransportError>;
}

/// Allow boxed transports to be used as transports (for dynamic dispatch)
impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).send_line(line)
    }
}

/// A missing transport rejects every line as closed.
impl<T: Transport> Transport for Option<T> {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        match self {
            Some(transport) => transport.send_line(line),
            None => Err(TransportError::Closed),
        }
    }
}

/// Transport over any byte writer: a serial device node, a socket, stdout.
///
/// Each line is written in full and flushed so it leaves immediately.
#[derive(Debug)]
pub struct LineTransport<W> {
    writer: W,
}

impl<W: Write> LineTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for LineTransport<W> {
    fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
