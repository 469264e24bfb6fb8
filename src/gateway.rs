//! Gateway relay: transparent byte pass-through between two links.
//!
//! ```text
//!   device link ──▶ ┌─────────┐ ──▶ host link      (sensor lines)
//!   device link ◀── │  Relay  │ ◀── host link      (command bytes)
//!                   └─────────┘
//! ```
//!
//! Every [`Relay::poll`] moves whatever each side currently has available
//! to the other side, unmodified.  No line awareness, no batching beyond
//! the per-tick scratch buffer, no retries: a failed write drops those
//! bytes and is logged.
//!
//! A failed read means that side's port is gone.  The relay latches
//! [`RelayError`] and every later poll returns it without touching either
//! link again.

use core::fmt;

use log::{error, warn};

use crate::error::LinkError;
use crate::protocol::Transport;

/// Scratch buffer per direction per tick.
const RELAY_CHUNK: usize = 64;

/// Byte counters for each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes forwarded device → host.
    pub upstream: u64,
    /// Bytes forwarded host → device.
    pub downstream: u64,
    /// Bytes lost to failed writes (either direction).
    pub dropped: u64,
    /// Reads that failed; the first one takes the relay down.
    pub read_failures: u64,
}

/// Which end of the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Device,
    Host,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::Host => write!(f, "host"),
        }
    }
}

/// The relay is disconnected: `side` failed and nothing more is relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayError {
    pub side: Side,
    pub error: LinkError,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} link: {}", self.side, self.error)
    }
}

impl std::error::Error for RelayError {}

pub struct Relay<D: Transport, H: Transport> {
    device: D,
    host: H,
    stats: RelayStats,
    down: Option<RelayError>,
}

impl<D: Transport, H: Transport> Relay<D, H> {
    pub fn new(device: D, host: H) -> Self {
        Self {
            device,
            host,
            stats: RelayStats::default(),
            down: None,
        }
    }

    /// One scheduler tick: forward both directions until neither side
    /// has bytes waiting.  Returns the number of bytes moved.
    pub fn poll(&mut self) -> Result<usize, RelayError> {
        if let Some(e) = self.down {
            return Err(e);
        }
        let mut moved = 0;
        loop {
            let up = forward(&mut self.device, &mut self.host, Side::Device, &mut self.stats)
                .map_err(|e| self.disconnect(e))?;
            let down = forward(&mut self.host, &mut self.device, Side::Host, &mut self.stats)
                .map_err(|e| self.disconnect(e))?;
            if up == 0 && down == 0 {
                break;
            }
            moved += up + down;
        }
        Ok(moved)
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// `Some` once a link has failed.
    pub fn fault(&self) -> Option<RelayError> {
        self.down
    }

    fn disconnect(&mut self, e: RelayError) -> RelayError {
        error!("LINK | relay disconnected: {}", e);
        self.down = Some(e);
        e
    }
}

/// Move one chunk read from `side` to the other link.  Returns bytes read.
fn forward<A: Transport, B: Transport>(
    from: &mut A,
    to: &mut B,
    side: Side,
    stats: &mut RelayStats,
) -> Result<usize, RelayError> {
    let mut buf = [0u8; RELAY_CHUNK];
    let n = match from.read(&mut buf) {
        Ok(n) => n,
        Err(e) => {
            warn!("relay: read from {} failed: {:?}", side, e);
            stats.read_failures += 1;
            return Err(RelayError {
                side,
                error: LinkError::ReadFailed,
            });
        }
    };
    if n == 0 {
        return Ok(0);
    }

    let written = match to.write(&buf[..n]).and_then(|w| to.flush().map(|()| w)) {
        Ok(w) => w.min(n),
        Err(e) => {
            warn!("relay: write from {} failed, {} bytes dropped: {:?}", side, n, e);
            0
        }
    };
    stats.dropped += (n - written) as u64;
    match side {
        Side::Device => stats.upstream += written as u64,
        Side::Host => stats.downstream += written as u64,
    }
    Ok(n)
}
