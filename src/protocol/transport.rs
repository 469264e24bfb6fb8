//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - USB / UART serial (`adapters::serial`, host feature)
//! - In-memory byte pipes ([`MemoryTransport`]) for tests and simulation
//!
//! The controller loop and the gateway relay are generic over
//! `Transport`, so swapping the physical link requires zero changes to
//! either.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}

/// A null transport that discards all writes and never reads.
/// Useful when a node runs without a peer attached.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

// ── In-memory pipe ───────────────────────────────────────────

type Pipe = Rc<RefCell<VecDeque<u8>>>;

/// One end of an in-memory full-duplex byte pipe.
///
/// Bytes written on one end become readable on the other, in order.
/// Single-threaded (`Rc`), matching the cooperative loops it stands in
/// for.
pub struct MemoryTransport {
    rx: Pipe,
    tx: Pipe,
}

impl MemoryTransport {
    /// Create two connected ends.
    pub fn pair() -> (Self, Self) {
        let a_to_b: Pipe = Rc::default();
        let b_to_a: Pipe = Rc::default();
        (
            Self {
                rx: Rc::clone(&b_to_a),
                tx: Rc::clone(&a_to_b),
            },
            Self {
                rx: a_to_b,
                tx: b_to_a,
            },
        )
    }

    /// Drain everything currently readable on this end.
    pub fn take_all(&mut self) -> Vec<u8> {
        self.rx.borrow_mut().drain(..).collect()
    }
}

impl Transport for MemoryTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut rx = self.rx.borrow_mut();
        let n = buf.len().min(rx.len());
        for (slot, byte) in buf.iter_mut().zip(rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.tx.borrow_mut().extend(data.iter().copied());
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx.borrow().is_empty()
    }
}
