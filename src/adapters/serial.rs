//! Serial port adapter.
//!
//! [`SerialLink`] wraps a `serialport` handle and implements both
//! [`Transport`] (raw bytes, for the node and the gateway) and
//! [`CommandLink`] (single command bytes, for the dashboard).
//!
//! Reads never block on an idle port: with nothing buffered, `read`
//! returns `Ok(0)` so poll loops keep their own cadence.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use log::{error, info};
use serialport::SerialPort;

use crate::app::ports::CommandLink;
use crate::error::LinkError;
use crate::protocol::{CommandByte, Transport};

pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open `path` at `baud_rate`, 8N1.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, LinkError> {
        match serialport::new(path, baud_rate)
            .timeout(timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()
        {
            Ok(port) => {
                info!("LINK | opened {} at {} baud", path, baud_rate);
                Ok(Self {
                    port,
                    name: path.to_string(),
                })
            }
            Err(e) => {
                error!("LINK | cannot open {}: {}", path, e);
                Err(LinkError::OpenFailed)
            }
        }
    }

    /// Second handle on the same port, for a reader thread.
    pub fn try_clone(&self) -> Result<Self, LinkError> {
        let port = self.port.try_clone().map_err(|e| {
            error!("LINK | cannot clone {}: {}", self.name, e);
            LinkError::OpenFailed
        })?;
        Ok(Self {
            port,
            name: self.name.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for SerialLink {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let pending = self.port.bytes_to_read().map_err(std::io::Error::from)?;
        if pending == 0 || buf.is_empty() {
            return Ok(0);
        }
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.port.write_all(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.port.flush()
    }

    fn available(&self) -> bool {
        self.port.bytes_to_read().is_ok_and(|n| n > 0)
    }
}

impl CommandLink for SerialLink {
    fn send(&mut self, command: CommandByte) -> Result<(), LinkError> {
        Transport::write(self, &[command.as_byte()])
            .and_then(|_| Transport::flush(self))
            .map_err(|e| {
                error!("LINK | write to {} failed: {}", self.name, e);
                LinkError::WriteFailed
            })
    }
}
