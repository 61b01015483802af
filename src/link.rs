use std::io::{Read, Write};

use serialport::SerialPort;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("serial write: {0}")]
    Write(#[source] std::io::Error),
    #[error("serial read: {0}")]
    Read(#[source] std::io::Error),
    #[error("serial status: {0}")]
    Status(#[source] serialport::Error),
}

/// Byte-oriented duplex channel: synchronous write, non-blocking
/// availability query, drain of whatever is currently readable.
pub trait Link {
    fn send(&mut self, buf: &[u8]) -> Result<(), LinkError>;
    fn bytes_available(&mut self) -> Result<usize, LinkError>;
    /// Append all currently available bytes to `out`, returning the count.
    /// Callers check `bytes_available` first; implementations may block
    /// briefly when invoked with nothing buffered.
    fn read_available(&mut self, out: &mut Vec<u8>) -> Result<usize, LinkError>;
}

/// Real serial device. Owns the port handle; dropping it closes the
/// device on every exit path, fault paths included.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    scratch: Vec<u8>,
}

impl SerialLink {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self {
            port,
            scratch: vec![0u8; 4096],
        }
    }
}

impl Link for SerialLink {
    fn send(&mut self, buf: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(buf).map_err(LinkError::Write)
    }

    fn bytes_available(&mut self) -> Result<usize, LinkError> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(LinkError::Status)
    }

    fn read_available(&mut self, out: &mut Vec<u8>) -> Result<usize, LinkError> {
        // the caller has just seen bytes_available() > 0, so a single
        // read returns the buffered bytes without waiting
        let n = self
            .port
            .read(&mut self.scratch)
            .map_err(LinkError::Read)?;
        out.extend_from_slice(&self.scratch[..n]);
        Ok(n)
    }
}
